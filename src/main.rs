use dotenvy::dotenv;
use economy_bot::{
    bot,
    config::{self, currency::Currency},
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    if dotenv().is_err() {
        warn!("No .env file loaded, using process environment only");
    }

    // 3. Connect and make sure every table exists
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 4. Seed jobs and shop items from config.toml, if present
    match config::seed::load_default_config()? {
        Some(seed) => {
            config::seed::seed_database(&db, &seed)
                .await
                .inspect_err(|e| error!("Failed to seed database: {e}"))?;
        }
        None => info!("No config.toml found, skipping seeding"),
    }

    // 5. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, db, Currency::from_env(), config::bot_prefix()).await
}
