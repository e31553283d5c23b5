//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions that are not commands:
//! autocomplete, gateway events such as reactions, and background tasks.

/// Autocomplete handlers for item names
pub mod autocomplete;
/// Giveaway announcement, entry tracking and winner draws
pub mod giveaways;

use crate::{bot::BotData, errors::Error};
use poise::serenity_prelude as serenity;

/// Routes gateway events the bot cares about.
pub async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            giveaways::on_reaction(data, framework.bot_id, add_reaction, true).await
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            giveaways::on_reaction(data, framework.bot_id, removed_reaction, false).await
        }
        _ => Ok(()),
    }
}
