//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Bot admin list management
pub mod admin;

/// Blackjack commands
pub mod blackjack;

/// Balance, payment, banking and robbery commands
pub mod economy;

/// General utility commands
pub mod general;

/// Giveaway commands
pub mod giveaway;

/// Job commands
pub mod jobs;

/// Shop and inventory commands
pub mod shop;

// Export commands
pub use admin::*;
pub use blackjack::*;
pub use economy::*;
pub use general::*;
pub use giveaway::*;
pub use jobs::*;
pub use shop::*;
