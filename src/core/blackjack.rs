//! Blackjack business logic - Dealing, hitting, standing and payouts.
//!
//! A game moves from `active` to exactly one terminal status and is never
//! touched again. The bet is escrowed (debited) when the game starts; standing
//! pays out `2 × bet` on a win, refunds `bet` on a draw and pays nothing on a
//! loss. Each transition, including its wallet effect, is one transaction.

use crate::{
    core::{
        cards::{BLACKJACK, Card, CardSource, Hand},
        ledger,
    },
    entities::{BlackjackGame, GameStatus, blackjack_game},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// The dealer keeps drawing while below this total.
pub const DEALER_STANDS_ON: u32 = 17;

/// Result of [`hit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitOutcome {
    /// Game state after the draw
    pub game: blackjack_game::Model,
    /// The card just drawn
    pub card: Card,
    /// Player total including the new card
    pub total: u32,
}

/// Result of [`stand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandOutcome {
    /// Final game state
    pub game: blackjack_game::Model,
    pub player_total: u32,
    pub dealer_total: u32,
    /// Amount credited to the player's wallet
    pub payout: i64,
}

/// Decides the outcome once the dealer has finished drawing.
///
/// Order: player bust, dealer bust, higher total, tie.
#[must_use]
pub const fn resolve(player_total: u32, dealer_total: u32) -> GameStatus {
    if player_total > BLACKJACK {
        GameStatus::DealerWin
    } else if dealer_total > BLACKJACK || player_total > dealer_total {
        GameStatus::PlayerWin
    } else if player_total < dealer_total {
        GameStatus::DealerWin
    } else {
        GameStatus::Draw
    }
}

/// Amount returned to the player for a finished game.
#[must_use]
pub const fn payout(status: GameStatus, bet: i64) -> i64 {
    match status {
        GameStatus::PlayerWin => bet * 2,
        GameStatus::Draw => bet,
        GameStatus::DealerWin | GameStatus::Active => 0,
    }
}

/// Starts a game: escrows `bet`, deals two cards to the player and one to the
/// dealer.
///
/// # Errors
/// - [`Error::InvalidAmount`] if `bet <= 0`
/// - [`Error::InsufficientFunds`] if the wallet is below `bet`
pub async fn start<D>(
    db: &DatabaseConnection,
    user_id: &str,
    bet: i64,
    deck: &mut D,
) -> Result<blackjack_game::Model>
where
    D: CardSource + ?Sized,
{
    if bet <= 0 {
        return Err(Error::InvalidAmount { amount: bet });
    }

    let txn = db.begin().await?;

    ledger::ensure_account(&txn, user_id).await?;
    ledger::debit_wallet(&txn, user_id, bet).await?;

    let player_hand: Hand = [deck.draw(), deck.draw()].into_iter().collect();
    let dealer_hand: Hand = std::iter::once(deck.draw()).collect();

    let game = blackjack_game::ActiveModel {
        user_id: Set(user_id.to_owned()),
        bet: Set(bet),
        player_hand: Set(player_hand),
        dealer_hand: Set(dealer_hand),
        status: Set(GameStatus::Active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(user_id, game_id = game.id, bet, "Started blackjack game");
    Ok(game)
}

async fn load_active_game<C>(db: &C, game_id: i64) -> Result<blackjack_game::Model>
where
    C: ConnectionTrait,
{
    let game = BlackjackGame::find_by_id(game_id)
        .one(db)
        .await?
        .ok_or(Error::GameNotFound { game_id })?;

    if game.status.is_terminal() {
        return Err(Error::GameNotActive { game_id });
    }
    Ok(game)
}

/// Draws one card for the player. Going over 21 ends the game as a dealer win.
///
/// # Errors
/// [`Error::GameNotFound`] or [`Error::GameNotActive`].
pub async fn hit<D>(db: &DatabaseConnection, game_id: i64, deck: &mut D) -> Result<HitOutcome>
where
    D: CardSource + ?Sized,
{
    let txn = db.begin().await?;

    let game = load_active_game(&txn, game_id).await?;

    let card = deck.draw();
    let mut hand = game.player_hand.clone();
    hand.push(card);
    let total = hand.total();
    let status = if hand.is_bust() {
        GameStatus::DealerWin
    } else {
        GameStatus::Active
    };

    let mut active: blackjack_game::ActiveModel = game.into();
    active.player_hand = Set(hand);
    active.status = Set(status);
    let game = active.update(&txn).await?;

    txn.commit().await?;

    if status.is_terminal() {
        info!(game_id, total, "Player bust");
    }
    Ok(HitOutcome { game, card, total })
}

/// Ends the player's turn: the dealer draws to 17 or more, the game is
/// resolved and the payout credited.
///
/// # Errors
/// [`Error::GameNotFound`] or [`Error::GameNotActive`].
pub async fn stand<D>(db: &DatabaseConnection, game_id: i64, deck: &mut D) -> Result<StandOutcome>
where
    D: CardSource + ?Sized,
{
    let txn = db.begin().await?;

    let game = load_active_game(&txn, game_id).await?;

    let player_total = game.player_hand.total();
    let mut dealer_hand = game.dealer_hand.clone();
    while dealer_hand.total() < DEALER_STANDS_ON {
        dealer_hand.push(deck.draw());
    }
    let dealer_total = dealer_hand.total();

    let status = resolve(player_total, dealer_total);
    let winnings = payout(status, game.bet);
    let user_id = game.user_id.clone();

    let mut active: blackjack_game::ActiveModel = game.into();
    active.dealer_hand = Set(dealer_hand);
    active.status = Set(status);
    let game = active.update(&txn).await?;

    if winnings > 0 {
        ledger::ensure_account(&txn, &user_id).await?;
        ledger::credit_wallet(&txn, &user_id, winnings).await?;
    }

    txn.commit().await?;

    info!(
        game_id,
        player_total,
        dealer_total,
        status = ?status,
        payout = winnings,
        "Blackjack game resolved"
    );
    Ok(StandOutcome {
        game,
        player_total,
        dealer_total,
        payout: winnings,
    })
}

/// Games of `user_id` that are still in play, oldest first.
pub async fn active_games(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<blackjack_game::Model>> {
    BlackjackGame::find()
        .filter(blackjack_game::Column::UserId.eq(user_id))
        .filter(blackjack_game::Column::Status.eq(GameStatus::Active))
        .order_by_asc(blackjack_game::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up a game by ID regardless of status.
pub async fn get_game(
    db: &DatabaseConnection,
    game_id: i64,
) -> Result<Option<blackjack_game::Model>> {
    BlackjackGame::find_by_id(game_id)
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::cards::Rank;
    use crate::test_utils::*;

    #[test]
    fn test_resolution_order() {
        assert_eq!(resolve(22, 25), GameStatus::DealerWin);
        assert_eq!(resolve(15, 22), GameStatus::PlayerWin);
        assert_eq!(resolve(20, 18), GameStatus::PlayerWin);
        assert_eq!(resolve(17, 19), GameStatus::DealerWin);
        assert_eq!(resolve(19, 19), GameStatus::Draw);
    }

    #[test]
    fn test_payouts() {
        assert_eq!(payout(GameStatus::PlayerWin, 40), 80);
        assert_eq!(payout(GameStatus::Draw, 40), 40);
        assert_eq!(payout(GameStatus::DealerWin, 40), 0);
    }

    #[tokio::test]
    async fn test_start_escrows_bet_and_deals() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 100).await?;
        let mut deck = StackedDeck::of(&[Rank::Ten, Rank::Ace, Rank::Six]);

        let game = start(&db, "player", 30, &mut deck).await?;

        assert_eq!(game.status, GameStatus::Active);
        assert_eq!(game.bet, 30);
        assert_eq!(game.player_hand.total(), 21);
        assert_eq!(game.dealer_hand.cards().len(), 1);
        assert_eq!(ledger::get_balances(&db, "player").await?.wallet, 70);

        // Hands survive the JSON round trip through the database
        let stored = get_game(&db, game.id).await?.unwrap();
        assert_eq!(stored.player_hand, game.player_hand);

        Ok(())
    }

    #[tokio::test]
    async fn test_start_requires_funds() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 10).await?;
        let mut deck = StackedDeck::of(&[Rank::Two, Rank::Three, Rank::Four]);

        let result = start(&db, "player", 11, &mut deck).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientFunds {
                available: 10,
                required: 11
            })
        ));
        assert!(active_games(&db, "player").await?.is_empty());
        assert_eq!(ledger::get_balances(&db, "player").await?.wallet, 10);

        let result = start(&db, "player", 0, &mut deck).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: 0 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_hit_bust_ends_game() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 50).await?;
        let mut deck = StackedDeck::of(&[Rank::Ten, Rank::Nine, Rank::Seven, Rank::Five]);
        let game = start(&db, "player", 50, &mut deck).await?;

        let outcome = hit(&db, game.id, &mut deck).await?;
        assert_eq!(outcome.card.value, Rank::Five);
        assert_eq!(outcome.total, 24);
        assert_eq!(outcome.game.status, GameStatus::DealerWin);
        assert_eq!(ledger::get_balances(&db, "player").await?.wallet, 0);

        let again = hit(&db, game.id, &mut deck).await;
        assert!(matches!(again, Err(Error::GameNotActive { .. })));
        let again = stand(&db, game.id, &mut deck).await;
        assert!(matches!(again, Err(Error::GameNotActive { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_hit_below_21_keeps_game_active() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 50).await?;
        let mut deck = StackedDeck::of(&[Rank::Two, Rank::Three, Rank::Seven, Rank::Four]);
        let game = start(&db, "player", 10, &mut deck).await?;

        let outcome = hit(&db, game.id, &mut deck).await?;
        assert_eq!(outcome.total, 9);
        assert_eq!(outcome.game.status, GameStatus::Active);
        assert_eq!(outcome.game.player_hand.cards().len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_game() -> Result<()> {
        let db = setup_test_db().await?;
        let mut deck = StackedDeck::of(&[]);

        let result = hit(&db, 404, &mut deck).await;
        assert!(matches!(result, Err(Error::GameNotFound { game_id: 404 })));
        let result = stand(&db, 404, &mut deck).await;
        assert!(matches!(result, Err(Error::GameNotFound { game_id: 404 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_stand_player_wins_double() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 100).await?;
        // Player 10 + 10, dealer 8 then draws a king to 18
        let mut deck = StackedDeck::of(&[Rank::Ten, Rank::Ten, Rank::Eight, Rank::King]);
        let game = start(&db, "player", 40, &mut deck).await?;

        let outcome = stand(&db, game.id, &mut deck).await?;
        assert_eq!(outcome.player_total, 20);
        assert_eq!(outcome.dealer_total, 18);
        assert_eq!(outcome.game.status, GameStatus::PlayerWin);
        assert_eq!(outcome.payout, 80);
        assert_eq!(ledger::get_balances(&db, "player").await?.wallet, 140);

        Ok(())
    }

    #[tokio::test]
    async fn test_stand_draw_refunds_bet() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 100).await?;
        let mut deck = StackedDeck::of(&[Rank::Ten, Rank::Nine, Rank::Nine, Rank::Queen]);
        let game = start(&db, "player", 25, &mut deck).await?;

        let outcome = stand(&db, game.id, &mut deck).await?;
        assert_eq!(outcome.game.status, GameStatus::Draw);
        assert_eq!(outcome.payout, 25);
        assert_eq!(ledger::get_balances(&db, "player").await?.wallet, 100);

        Ok(())
    }

    #[tokio::test]
    async fn test_stand_dealer_wins_keeps_bet() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 100).await?;
        // Player 12, dealer 6 + 5 + 8 = 19
        let mut deck = StackedDeck::of(&[
            Rank::Ten,
            Rank::Two,
            Rank::Six,
            Rank::Five,
            Rank::Eight,
        ]);
        let game = start(&db, "player", 25, &mut deck).await?;

        let outcome = stand(&db, game.id, &mut deck).await?;
        assert_eq!(outcome.dealer_total, 19);
        assert_eq!(outcome.game.status, GameStatus::DealerWin);
        assert_eq!(outcome.payout, 0);
        assert_eq!(outcome.game.dealer_hand.cards().len(), 3);
        assert_eq!(deck.remaining(), 0);
        assert_eq!(ledger::get_balances(&db, "player").await?.wallet, 75);

        Ok(())
    }

    #[tokio::test]
    async fn test_stand_dealer_bust() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 100).await?;
        // Player 13, dealer 6 + 10 + 9 = 25
        let mut deck = StackedDeck::of(&[
            Rank::Ten,
            Rank::Three,
            Rank::Six,
            Rank::Ten,
            Rank::Nine,
        ]);
        let game = start(&db, "player", 10, &mut deck).await?;

        let outcome = stand(&db, game.id, &mut deck).await?;
        assert_eq!(outcome.dealer_total, 25);
        assert_eq!(outcome.game.status, GameStatus::PlayerWin);
        assert_eq!(ledger::get_balances(&db, "player").await?.wallet, 110);

        Ok(())
    }

    #[tokio::test]
    async fn test_active_games_excludes_finished() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "player", 100).await?;
        let mut deck = StackedDeck::of(&[
            Rank::Ten,
            Rank::Ten,
            Rank::Eight,
            Rank::King,
            Rank::Two,
            Rank::Three,
            Rank::Four,
        ]);
        let finished = start(&db, "player", 10, &mut deck).await?;
        stand(&db, finished.id, &mut deck).await?;
        let open = start(&db, "player", 10, &mut deck).await?;

        let games = active_games(&db, "player").await?;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, open.id);

        Ok(())
    }
}
