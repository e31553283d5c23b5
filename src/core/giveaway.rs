//! Giveaway business logic - Announcements, entries and winner draws.
//!
//! A giveaway is keyed by the Discord message announcing it. Entries are
//! recorded as users react to that message; winners are drawn once the end
//! time has passed.

use crate::{
    entities::{Giveaway, GiveawayEntry, giveaway, giveaway_entry},
    errors::{Error, Result},
};
use rand::{Rng, seq::SliceRandom};
use sea_orm::{
    QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::OnConflict,
};
use tracing::info;

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Records a new giveaway.
///
/// `end_time` is in Unix milliseconds and must be after `now`.
///
/// # Errors
/// [`Error::InvalidInput`] for a blank prize, zero winners or an end time that
/// is not in the future.
pub async fn create_giveaway(
    db: &DatabaseConnection,
    message_id: &str,
    channel_id: &str,
    end_time: i64,
    prize: &str,
    winners: i32,
    now: i64,
) -> Result<giveaway::Model> {
    let prize = prize.trim();
    if prize.is_empty() {
        return Err(Error::invalid_input("Prize cannot be empty"));
    }
    if winners <= 0 {
        return Err(Error::invalid_input("There must be at least one winner"));
    }
    if end_time <= now {
        return Err(Error::invalid_input("Giveaway must end in the future"));
    }

    let giveaway = giveaway::ActiveModel {
        message_id: Set(message_id.to_owned()),
        channel_id: Set(channel_id.to_owned()),
        end_time: Set(end_time),
        prize: Set(prize.to_owned()),
        winners: Set(winners),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        giveaway_id = giveaway.id,
        message_id, end_time, winners, "Created giveaway"
    );
    Ok(giveaway)
}

/// Giveaways still accepting entries at `now`, soonest ending first.
pub async fn active_giveaways(db: &DatabaseConnection, now: i64) -> Result<Vec<giveaway::Model>> {
    Giveaway::find()
        .filter(giveaway::Column::EndTime.gt(now))
        .order_by_asc(giveaway::Column::EndTime)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Giveaways whose end time has passed and that have not been deleted yet.
pub async fn due_giveaways(db: &DatabaseConnection, now: i64) -> Result<Vec<giveaway::Model>> {
    Giveaway::find()
        .filter(giveaway::Column::EndTime.lte(now))
        .order_by_asc(giveaway::Column::EndTime)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn get_giveaway_by_message_id(
    db: &DatabaseConnection,
    message_id: &str,
) -> Result<Option<giveaway::Model>> {
    Giveaway::find()
        .filter(giveaway::Column::MessageId.eq(message_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a giveaway and its entries. Returns whether one existed.
pub async fn delete_giveaway(db: &DatabaseConnection, message_id: &str) -> Result<bool> {
    let txn = db.begin().await?;

    let Some(giveaway) = Giveaway::find()
        .filter(giveaway::Column::MessageId.eq(message_id))
        .one(&txn)
        .await?
    else {
        return Ok(false);
    };

    clear_entries(&txn, giveaway.id).await?;
    Giveaway::delete_by_id(giveaway.id).exec(&txn).await?;

    txn.commit().await?;

    info!(giveaway_id = giveaway.id, message_id, "Deleted giveaway");
    Ok(true)
}

/// Draws the winners of a giveaway and deletes it with its entries.
///
/// Drawing and deleting share one transaction, so when the watcher and an
/// admin finish the same giveaway only one of them gets `Some(winners)`.
/// Returns `None` if the giveaway no longer exists.
pub async fn close_giveaway<R>(
    db: &DatabaseConnection,
    giveaway_id: i64,
    rng: &mut R,
) -> Result<Option<Vec<String>>>
where
    R: Rng + ?Sized,
{
    let txn = db.begin().await?;

    let Some(giveaway) = Giveaway::find_by_id(giveaway_id).one(&txn).await? else {
        return Ok(None);
    };

    let entrants = entries(&txn, giveaway.id).await?;
    let count = usize::try_from(giveaway.winners).unwrap_or(1);
    let winners = draw_winners(&entrants, count, rng);

    clear_entries(&txn, giveaway.id).await?;
    let deleted = Giveaway::delete_by_id(giveaway.id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        return Ok(None);
    }

    txn.commit().await?;

    info!(
        giveaway_id,
        entrants = entrants.len(),
        winners = winners.len(),
        "Closed giveaway"
    );
    Ok(Some(winners))
}

/// Enters a user. Entering twice is a no-op.
pub async fn add_entry(db: &DatabaseConnection, giveaway_id: i64, user_id: &str) -> Result<()> {
    let row = giveaway_entry::ActiveModel {
        giveaway_id: Set(giveaway_id),
        user_id: Set(user_id.to_owned()),
    };
    GiveawayEntry::insert(row)
        .on_conflict(
            OnConflict::columns([
                giveaway_entry::Column::GiveawayId,
                giveaway_entry::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Withdraws a user's entry. Returns whether they were entered.
pub async fn remove_entry(db: &DatabaseConnection, giveaway_id: i64, user_id: &str) -> Result<bool> {
    let result = GiveawayEntry::delete_by_id((giveaway_id, user_id.to_owned()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Entrants' user IDs, in a stable order.
pub async fn entries<C>(db: &C, giveaway_id: i64) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    GiveawayEntry::find()
        .select_only()
        .column(giveaway_entry::Column::UserId)
        .filter(giveaway_entry::Column::GiveawayId.eq(giveaway_id))
        .order_by_asc(giveaway_entry::Column::UserId)
        .into_tuple()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes every entry of a giveaway, returning how many there were.
pub async fn clear_entries<C>(db: &C, giveaway_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = GiveawayEntry::delete_many()
        .filter(giveaway_entry::Column::GiveawayId.eq(giveaway_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Picks up to `count` distinct entrants uniformly at random.
///
/// Duplicate IDs in `entries` count once.
pub fn draw_winners<R>(entries: &[String], count: usize, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut pool: Vec<&String> = entries.iter().collect();
    pool.sort_unstable();
    pool.dedup();

    pool.choose_multiple(rng, count)
        .map(|&id| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    const NOW: i64 = 1_700_000_000_000;

    async fn create(
        db: &DatabaseConnection,
        message_id: &str,
        end_time: i64,
    ) -> Result<giveaway::Model> {
        create_giveaway(db, message_id, "channel", end_time, "A pizza", 1, NOW).await
    }

    #[tokio::test]
    async fn test_create_giveaway_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let blank = create_giveaway(&db, "m", "c", NOW + 1, "  ", 1, NOW).await;
        assert!(matches!(blank, Err(Error::InvalidInput { .. })));

        let no_winners = create_giveaway(&db, "m", "c", NOW + 1, "Prize", 0, NOW).await;
        assert!(matches!(no_winners, Err(Error::InvalidInput { .. })));

        let past = create_giveaway(&db, "m", "c", NOW, "Prize", 1, NOW).await;
        assert!(matches!(past, Err(Error::InvalidInput { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_active_and_due_giveaways() -> Result<()> {
        let db = setup_test_db().await?;
        create(&db, "soon", NOW + 1_000).await?;
        create(&db, "later", NOW + 60_000).await?;

        let active = active_giveaways(&db, NOW + 5_000).await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message_id, "later");

        let due = due_giveaways(&db, NOW + 5_000).await?;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].message_id, "soon");

        Ok(())
    }

    #[tokio::test]
    async fn test_entries_are_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let giveaway = create(&db, "msg", NOW + 1_000).await?;

        add_entry(&db, giveaway.id, "bob").await?;
        add_entry(&db, giveaway.id, "alice").await?;
        add_entry(&db, giveaway.id, "bob").await?;
        assert_eq!(entries(&db, giveaway.id).await?, ["alice", "bob"]);

        assert!(remove_entry(&db, giveaway.id, "bob").await?);
        assert!(!remove_entry(&db, giveaway.id, "bob").await?);
        assert_eq!(entries(&db, giveaway.id).await?, ["alice"]);

        assert_eq!(clear_entries(&db, giveaway.id).await?, 1);
        assert!(entries(&db, giveaway.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_giveaway_removes_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let giveaway = create(&db, "msg", NOW + 1_000).await?;
        add_entry(&db, giveaway.id, "alice").await?;

        assert!(delete_giveaway(&db, "msg").await?);
        assert!(get_giveaway_by_message_id(&db, "msg").await?.is_none());
        assert!(entries(&db, giveaway.id).await?.is_empty());
        assert!(!delete_giveaway(&db, "msg").await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_close_giveaway_draws_once() -> Result<()> {
        let db = setup_test_db().await?;
        let giveaway =
            create_giveaway(&db, "msg", "channel", NOW + 1_000, "Two pizzas", 2, NOW).await?;
        for user in ["alice", "bob", "carol"] {
            add_entry(&db, giveaway.id, user).await?;
        }
        let mut rng = StdRng::seed_from_u64(3);

        let winners = close_giveaway(&db, giveaway.id, &mut rng).await?.unwrap();
        assert_eq!(winners.len(), 2);
        assert!(winners.iter().all(|w| ["alice", "bob", "carol"].contains(&w.as_str())));
        assert!(get_giveaway_by_message_id(&db, "msg").await?.is_none());
        assert!(entries(&db, giveaway.id).await?.is_empty());

        // A second finisher finds nothing to close
        assert!(close_giveaway(&db, giveaway.id, &mut rng).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_close_giveaway_without_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let giveaway = create(&db, "msg", NOW + 1_000).await?;
        let mut rng = StdRng::seed_from_u64(3);

        let winners = close_giveaway(&db, giveaway.id, &mut rng).await?;
        assert_eq!(winners, Some(Vec::new()));

        Ok(())
    }

    #[test]
    fn test_draw_winners_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(9);
        let pool: Vec<String> = ["a", "b", "c", "b"].iter().map(ToString::to_string).collect();

        let winners = draw_winners(&pool, 2, &mut rng);
        assert_eq!(winners.len(), 2);
        let unique: HashSet<_> = winners.iter().collect();
        assert_eq!(unique.len(), 2);

        // More winners than entrants returns everyone once
        let everyone = draw_winners(&pool, 10, &mut rng);
        assert_eq!(everyone.len(), 3);

        assert!(draw_winners(&[], 3, &mut rng).is_empty());
    }
}
