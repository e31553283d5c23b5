//! Core business logic, independent of Discord.
//!
//! Every operation takes the database handle explicitly and returns typed
//! results; wording and presentation live in [`crate::bot`].

/// Bot-level admin list
pub mod admin;
/// Blackjack games with escrowed bets
pub mod blackjack;
/// Cards, hands and decks
pub mod cards;
/// Giveaways and their entries
pub mod giveaway;
/// Job definitions, assignment and completion
pub mod jobs;
/// Wallet and bank balances
pub mod ledger;
/// Shop catalog, purchases and inventories
pub mod shop;
