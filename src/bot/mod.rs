//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the economy bot, including all
//! slash/prefix commands, event handlers, and the shared bot context. Every
//! command is registered for both surfaces and calls straight into
//! [`crate::core`]; all user-facing wording lives here.

/// Admin permission checks used by privileged commands
pub mod checks;
/// Discord command implementations (economy, jobs, shop, blackjack, giveaway, admin, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, reactions, etc.)
pub mod handlers;
/// Reply wording for business errors
pub mod replies;

use crate::{
    config::currency::Currency,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and any other global state
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// How amounts are displayed
    pub currency: Currency,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, currency: Currency) -> Self {
        Self { database, currency }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Every command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        // Economy
        commands::balance(),
        commands::pay(),
        commands::deposit(),
        commands::withdraw(),
        commands::rob(),
        commands::leaderboard(),
        commands::give(),
        // Jobs
        commands::addjob(),
        commands::joblist(),
        commands::work(),
        commands::completejob(),
        // Shop
        commands::shop(),
        commands::buy(),
        commands::inventory(),
        commands::redeem(),
        commands::additem(),
        commands::removeitem(),
        // Blackjack
        commands::blackjack(),
        commands::hit(),
        commands::stand(),
        // Giveaways
        commands::giveaway(),
        commands::endgiveaway(),
        commands::cancelgiveaway(),
        // Admin and general
        commands::admin(),
        commands::ping(),
        commands::help(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_user_error() {
                replies::user_message(&error, &ctx.data().currency)
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
                "❌ Something went wrong. Please try again later.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            if let Some(e) = error {
                error!("Check failed in `{}`: {:?}", ctx.command().name, e);
            }
            if let Err(e) = ctx.say("🚫 Only admins can use this command.").await {
                error!("Failed to send error message: {}", e);
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error handling {} event: {:?}", event.snake_case_name(), error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the framework and runs the Discord client until it stops.
#[instrument(skip_all, fields(prefix = %prefix))]
pub async fn run_bot(
    token: String,
    database: DatabaseConnection,
    currency: Currency,
    prefix: String,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let data = BotData::new(database, currency);
                handlers::giveaways::spawn_giveaway_watcher(
                    ctx.http.clone(),
                    data.database.clone(),
                );
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client.start().await.inspect_err(|e| warn!("Client stopped: {:?}", e))?;
    Ok(())
}
