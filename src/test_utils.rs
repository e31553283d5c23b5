//! Shared test utilities for the economy bot.
//!
//! This module provides common helper functions for setting up test databases,
//! seeding balances and catalog entries, and dealing predetermined cards.

#![allow(clippy::expect_used, clippy::panic)]

use crate::{
    core::{
        cards::{Card, CardSource, Rank, Suit},
        jobs, ledger, shop,
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::collections::VecDeque;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Gives `user_id` an account with `amount` in the wallet.
pub async fn fund_wallet(db: &DatabaseConnection, user_id: &str, amount: i64) -> Result<()> {
    ledger::adjust_wallet(db, user_id, amount).await?;
    Ok(())
}

/// Creates a shop item with sensible defaults.
///
/// # Defaults
/// * `description`: `"Test item"`
/// * `quantity`: 1
pub async fn create_test_item(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
) -> Result<entities::item::Model> {
    shop::add_item(db, price, name, "Test item", 1).await
}

/// Creates a job with the given description.
pub async fn create_test_job(
    db: &DatabaseConnection,
    description: &str,
) -> Result<entities::job::Model> {
    jobs::add_job(db, description).await
}

/// Deck that deals a fixed sequence of cards, then panics.
///
/// Suits are irrelevant to scoring, so every card is a spade.
pub struct StackedDeck {
    cards: VecDeque<Card>,
}

impl StackedDeck {
    pub fn of(ranks: &[Rank]) -> Self {
        Self {
            cards: ranks.iter().map(|&r| Card::new(r, Suit::Spades)).collect(),
        }
    }

    /// Cards not dealt yet.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl CardSource for StackedDeck {
    fn draw(&mut self) -> Card {
        self.cards
            .pop_front()
            .expect("stacked deck ran out of cards")
    }
}
