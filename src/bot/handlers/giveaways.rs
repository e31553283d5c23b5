//! Giveaway plumbing between Discord and [`crate::core::giveaway`].
//!
//! Entries are tracked from 🎉 reactions on the announcement message. A
//! background task ends giveaways once their time is up; since giveaways are
//! persisted, pending ones resume after a restart.

use crate::{
    bot::BotData,
    core::giveaway,
    entities::giveaway::Model as GiveawayModel,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use rand::{SeedableRng, rngs::StdRng};
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info};

/// Reaction users add to enter a giveaway.
pub const GIVEAWAY_EMOJI: &str = "🎉";

/// How often the watcher looks for giveaways that have ended.
const WATCH_INTERVAL: Duration = Duration::from_secs(15);

/// Records or withdraws a giveaway entry for a 🎉 reaction.
///
/// Reactions on other messages, other emoji, the bot's own reaction and
/// reactions after the end time are ignored.
pub async fn on_reaction(
    data: &BotData,
    bot_id: serenity::UserId,
    reaction: &serenity::Reaction,
    added: bool,
) -> Result<()> {
    if !reaction.emoji.unicode_eq(GIVEAWAY_EMOJI) {
        return Ok(());
    }
    let Some(user_id) = reaction.user_id.filter(|id| *id != bot_id) else {
        return Ok(());
    };

    let db = &data.database;
    let message_id = reaction.message_id.to_string();
    let Some(giveaway) = giveaway::get_giveaway_by_message_id(db, &message_id).await? else {
        return Ok(());
    };
    if giveaway.end_time <= giveaway::now_millis() {
        return Ok(());
    }

    let user_id = user_id.to_string();
    if added {
        giveaway::add_entry(db, giveaway.id, &user_id).await?;
        debug!(giveaway_id = giveaway.id, user_id, "Giveaway entry added");
    } else {
        giveaway::remove_entry(db, giveaway.id, &user_id).await?;
        debug!(giveaway_id = giveaway.id, user_id, "Giveaway entry removed");
    }
    Ok(())
}

/// Winner announcement for a finished giveaway.
#[must_use]
pub fn announcement(prize: &str, winners: &[String]) -> String {
    if winners.is_empty() {
        return format!("😢 The giveaway for **{prize}** ended with no entries.");
    }
    let mentions: Vec<String> = winners.iter().map(|id| format!("<@{id}>")).collect();
    format!(
        "{GIVEAWAY_EMOJI} Congratulations {}! You won **{prize}**!",
        mentions.join(", ")
    )
}

/// Channel a giveaway's result is announced in.
///
/// # Errors
/// [`Error::InvalidInput`] if the stored channel ID is not a Discord snowflake.
pub fn announcement_channel(giveaway: &GiveawayModel) -> Result<serenity::ChannelId> {
    giveaway
        .channel_id
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(serenity::ChannelId::new)
        .ok_or_else(|| Error::invalid_input(format!("Bad channel ID '{}'", giveaway.channel_id)))
}

/// Draws winners, deletes the giveaway and announces the result in its channel.
///
/// Returns `None` if the giveaway was already finished by someone else. If the
/// announcement cannot be sent, the drawn winners are logged and returned in
/// [`Error::Announcement`] so an admin can still announce them.
pub async fn finish_giveaway(
    http: &serenity::Http,
    db: &DatabaseConnection,
    giveaway: &GiveawayModel,
) -> Result<Option<Vec<String>>> {
    // Nothing is deleted unless there is somewhere to announce the winners
    let channel = announcement_channel(giveaway)?;

    let mut rng = StdRng::from_entropy();
    let Some(winners) = giveaway::close_giveaway(db, giveaway.id, &mut rng).await? else {
        return Ok(None);
    };

    if let Err(e) = channel
        .say(http, announcement(&giveaway.prize, &winners))
        .await
    {
        error!(
            giveaway_id = giveaway.id,
            prize = %giveaway.prize,
            winners = ?winners,
            "Failed to announce giveaway winners: {e}"
        );
        return Err(Error::Announcement {
            prize: giveaway.prize.clone(),
            winners,
            source: Box::new(e),
        });
    }

    info!(
        giveaway_id = giveaway.id,
        winners = winners.len(),
        "Giveaway finished"
    );
    Ok(Some(winners))
}

/// Spawns the task that ends giveaways when their time is up.
pub fn spawn_giveaway_watcher(http: Arc<serenity::Http>, db: DatabaseConnection) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(WATCH_INTERVAL);
        loop {
            interval.tick().await;

            let due = match giveaway::due_giveaways(&db, giveaway::now_millis()).await {
                Ok(due) => due,
                Err(e) => {
                    error!("Failed to load due giveaways: {e}");
                    continue;
                }
            };
            for g in due {
                if let Err(e) = finish_giveaway(&http, &db, &g).await {
                    error!(giveaway_id = g.id, "Failed to finish giveaway: {e}");
                }
            }
        }
    });
}
