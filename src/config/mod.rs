/// Database configuration and connection management
pub mod database;

/// Currency display settings from environment variables
pub mod currency;

/// Job and shop seeding from config.toml
pub mod seed;

/// Prefix for text commands when `BOT_PREFIX` is not set.
pub const DEFAULT_PREFIX: &str = "$";

/// Gets the prefix for text commands from `BOT_PREFIX`, falling back to
/// [`DEFAULT_PREFIX`]. Blank values count as unset.
#[must_use]
pub fn bot_prefix() -> String {
    std::env::var("BOT_PREFIX")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string())
}
