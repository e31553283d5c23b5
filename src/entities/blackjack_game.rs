//! Blackjack game entity - One row per dealt game.
//!
//! Hands are stored as JSON arrays of cards (`{"value":"A","suit":"♠"}`).
//! The status only ever moves from `active` to one of the terminal states.

use crate::core::cards::Hand;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a game. Every status except `Active` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum GameStatus {
    /// Player may still hit or stand
    #[sea_orm(string_value = "active")]
    Active,
    /// Player won; paid twice the bet
    #[sea_orm(string_value = "player_win")]
    PlayerWin,
    /// Dealer won, including player busts; bet is kept
    #[sea_orm(string_value = "dealer_win")]
    DealerWin,
    /// Equal totals; bet refunded
    #[sea_orm(string_value = "draw")]
    Draw,
}

impl GameStatus {
    /// Whether no further moves are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Blackjack game database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blackjack_games")]
pub struct Model {
    /// Game identifier shown to players
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the player
    pub user_id: String,
    /// Escrowed bet
    pub bet: i64,
    /// Player cards in draw order
    #[sea_orm(column_type = "Json")]
    pub player_hand: Hand,
    /// Dealer cards in draw order
    #[sea_orm(column_type = "Json")]
    pub dealer_hand: Hand,
    /// Current status
    pub status: GameStatus,
    /// When the game was dealt
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
