//! Shop Discord commands - browsing, buying, inventories and redemption.
//!
//! Item management (`additem`, `removeitem`) is restricted to admins.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, checks, handlers::autocomplete, replies},
        core::shop,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Lists everything for sale.
    #[poise::command(slash_command, prefix_command)]
    pub async fn shop(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let items = shop::list_items(&data.database).await?;

        if items.is_empty() {
            ctx.say("🛒 The shop is empty right now.").await?;
            return Ok(());
        }

        let lines: Vec<String> = items
            .into_iter()
            .map(|item| {
                let units = if item.quantity > 1 {
                    format!(" (x{})", item.quantity)
                } else {
                    String::new()
                };
                format!(
                    "**{}**{units} - {}\n{}",
                    item.name,
                    data.currency.format(item.price),
                    item.description
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("🛒 Shop")
            .color(0x002E_CC71)
            .description(replies::bounded_lines(&lines, replies::EMBED_DESCRIPTION_LIMIT))
            .footer(serenity::CreateEmbedFooter::new("Use `buy <item>` to purchase"));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Buys an item from the shop.
    #[poise::command(slash_command, prefix_command)]
    pub async fn buy(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to buy"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        item: String,
        #[description = "How many to buy (defaults to 1)"] count: Option<i64>,
    ) -> Result<()> {
        let data = ctx.data();
        let purchase = shop::purchase(
            &data.database,
            &ctx.author().id.to_string(),
            &item,
            count.unwrap_or(1),
        )
        .await?;

        ctx.say(format!(
            "🛍️ Bought {} x **{}** for {}. Wallet: {}",
            purchase.units,
            purchase.item.name,
            data.currency.format(purchase.cost),
            data.currency.format(purchase.wallet)
        ))
        .await?;
        Ok(())
    }

    /// Shows the items someone owns.
    #[poise::command(slash_command, prefix_command)]
    pub async fn inventory(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Whose inventory to show (defaults to you)"] user: Option<
            serenity::User,
        >,
    ) -> Result<()> {
        let user = user.as_ref().unwrap_or_else(|| ctx.author());
        let owned = shop::inventory(&ctx.data().database, &user.id.to_string()).await?;

        if owned.is_empty() {
            ctx.say(format!("🎒 {}'s inventory is empty.", user.name))
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = owned
            .iter()
            .map(|(item, quantity)| format!("**{}** x{quantity}", item.name))
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title(format!("🎒 {}'s inventory", user.name))
            .color(0x002E_CC71)
            .description(replies::bounded_lines(&lines, replies::EMBED_DESCRIPTION_LIMIT));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Uses one of your items.
    #[poise::command(slash_command, prefix_command)]
    pub async fn redeem(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to use"]
        #[autocomplete = "autocomplete::autocomplete_owned_item"]
        #[rest]
        item: String,
    ) -> Result<()> {
        let redemption =
            shop::redeem(&ctx.data().database, &ctx.author().id.to_string(), &item).await?;

        let message = if redemption.was_last() {
            format!(
                "✨ <@{}> redeemed their last **{}**!",
                ctx.author().id,
                redemption.item.name
            )
        } else {
            format!(
                "✨ <@{}> redeemed a **{}**. {} left.",
                ctx.author().id,
                redemption.item.name,
                redemption.remaining
            )
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Puts a new item up for sale. Admin only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin")]
    pub async fn additem(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Price per purchase"] price: i64,
        #[description = "Item name"] name: String,
        #[description = "What the item is"] description: String,
        #[description = "Units granted per purchase (defaults to 1)"] quantity: Option<i64>,
    ) -> Result<()> {
        let data = ctx.data();
        let item = shop::add_item(
            &data.database,
            price,
            &name,
            &description,
            quantity.unwrap_or(1),
        )
        .await?;

        ctx.say(format!(
            "✅ Added **{}** to the shop for {}.",
            item.name,
            data.currency.format(item.price)
        ))
        .await?;
        Ok(())
    }

    /// Takes an item off sale. Owners keep what they have. Admin only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin")]
    pub async fn removeitem(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to remove"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        #[rest]
        name: String,
    ) -> Result<()> {
        let item = shop::remove_item(&ctx.data().database, &name).await?;
        ctx.say(format!("🗑️ Removed **{}** from the shop.", item.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
