//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests valid shop item names as the user types.

use crate::{
    bot::BotData,
    core::shop,
    errors::Error,
};

/// Matches `candidates` against the user's partial input, case-insensitively,
/// sorted and capped at Discord's limit of 25 suggestions.
fn filter_names(candidates: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = candidates
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();

    matching.sort();
    matching.truncate(25);
    matching
}

/// Provides autocomplete suggestions for items currently in the shop.
pub async fn autocomplete_item_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(items) = shop::list_items(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_names(items.into_iter().map(|item| item.name), partial)
}

/// Provides autocomplete suggestions for items the author owns.
pub async fn autocomplete_owned_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let user_id = ctx.author().id.to_string();
    let Ok(owned) = shop::inventory(&ctx.data().database, &user_id).await else {
        return Vec::new();
    };
    filter_names(
        owned
            .into_iter()
            .filter(|(item, _)| item.is_available)
            .map(|(item, _)| item.name),
        partial,
    )
}
