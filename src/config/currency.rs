//! Currency display settings loaded from environment variables.
//!
//! Balances are plain integers in the core; this module only decides how they
//! are shown in Discord messages.

use std::fmt;

/// Currency name used when `POINTS_NAME` is not set.
pub const DEFAULT_NAME: &str = "pizza";
/// Currency symbol used when `POINTS_SYMBOL` is not set.
pub const DEFAULT_SYMBOL: &str = "🍕";

/// How amounts are displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    /// Singular name, e.g. "pizza"
    pub name: String,
    /// Emoji or short symbol, e.g. "🍕"
    pub symbol: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
        }
    }
}

impl Currency {
    /// Reads `POINTS_NAME` and `POINTS_SYMBOL`, falling back to the defaults
    /// for unset or blank values.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |key: &str, fallback: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            name: read("POINTS_NAME", DEFAULT_NAME),
            symbol: read("POINTS_SYMBOL", DEFAULT_SYMBOL),
        }
    }

    /// Formats an amount for display, e.g. `150 🍕`.
    #[must_use]
    pub fn format(&self, amount: i64) -> Amount<'_> {
        Amount {
            currency: self,
            amount,
        }
    }
}

/// An amount paired with its currency, for use in `format!`.
pub struct Amount<'a> {
    currency: &'a Currency,
    amount: i64,
}

impl fmt::Display for Amount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency.symbol)
    }
}
