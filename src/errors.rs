//! Unified error type for the economy bot.
//!
//! Business-rule failures (insufficient funds, missing jobs, unknown games...) are
//! ordinary variants returned to the caller. Persistence failures collapse into
//! [`Error::Database`] and cause the surrounding transaction to roll back.

use thiserror::Error;

/// All failures produced by the core and the Discord layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Amount was zero, negative, or otherwise unusable
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// Not enough funds in the wallet (or bank, for withdrawals)
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds {
        /// Balance at the time of the check
        available: i64,
        /// Amount the operation needed
        required: i64,
    },

    /// The user holds no job
    #[error("User {user_id} is not assigned to any job")]
    NotAssigned {
        /// Discord user ID
        user_id: String,
    },

    /// Every job is already assigned to the user, or no job exists
    #[error("No jobs available")]
    NoJobsAvailable,

    /// No blackjack game with this ID
    #[error("Blackjack game {game_id} not found")]
    GameNotFound {
        /// Game ID
        game_id: i64,
    },

    /// The blackjack game already reached a terminal status
    #[error("Blackjack game {game_id} is no longer active")]
    GameNotActive {
        /// Game ID
        game_id: i64,
    },

    /// Shop item missing or unavailable
    #[error("Item '{name}' not found")]
    ItemNotFound {
        /// Item name as requested
        name: String,
    },

    /// The user has none of this item
    #[error("Item '{name}' is not owned")]
    NotOwned {
        /// Item name as requested
        name: String,
    },

    /// Malformed or semantically invalid input
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Underlying store failure
    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),

    /// Giveaway winners were drawn but posting them to Discord failed
    #[error("Failed to announce winners {winners:?} of '{prize}': {source}")]
    Announcement {
        /// Prize of the closed giveaway
        prize: String,
        /// Drawn winners' user IDs
        winners: Vec<String>,
        /// Why the message could not be sent
        source: Box<poise::serenity_prelude::Error>,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether this is an expected business outcome rather than a failure.
    ///
    /// The Discord layer shows these to the user and logs everything else.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::InsufficientFunds { .. }
                | Self::NotAssigned { .. }
                | Self::NoJobsAvailable
                | Self::GameNotFound { .. }
                | Self::GameNotActive { .. }
                | Self::ItemNotFound { .. }
                | Self::NotOwned { .. }
                | Self::InvalidInput { .. }
        )
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_are_user_errors() {
        assert!(Error::NoJobsAvailable.is_user_error());
        assert!(Error::InvalidAmount { amount: 0 }.is_user_error());
        assert!(
            Error::InsufficientFunds {
                available: 1,
                required: 2
            }
            .is_user_error()
        );
        assert!(Error::invalid_input("bad").is_user_error());
    }

    #[test]
    fn test_store_errors_are_not_user_errors() {
        let err: Error = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, Error::Database(_)));
        assert!(!err.is_user_error());
    }
}
