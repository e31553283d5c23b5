//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let name = &ctx.data().currency.name;
        let help_text = format!(
            "**Economy Bot Help**\n\
        Every command works as a slash command or with the text prefix.\n\n\
        **Money**\n\
        • `/balance [user]` - Shows wallet and bank balances.\n\
        • `/pay <user> <amount>` - Sends {name} from your wallet.\n\
        • `/deposit <amount>` / `/withdraw <amount>` - Moves {name} between wallet and bank.\n\
        • `/rob <user>` - Try to steal from a wallet. Getting caught costs you.\n\
        • `/leaderboard` - The richest members.\n\n\
        **Jobs**\n\
        • `/joblist` - All jobs and who is working them.\n\
        • `/work` - Get assigned a random job.\n\n\
        **Shop**\n\
        • `/shop` - What's for sale.\n\
        • `/buy <item> [count]` - Buy an item.\n\
        • `/inventory [user]` - What someone owns.\n\
        • `/redeem <item>` - Use one of your items.\n\n\
        **Blackjack**\n\
        • `/blackjack <bet>` - Start a game.\n\
        • `/hit [game]` / `/stand [game]` - Play your current game.\n\n\
        **Admin**\n\
        • `/give <user> <amount>` - Adjust a wallet.\n\
        • `/addjob <description>` / `/completejob <user> <reward>` - Manage jobs.\n\
        • `/additem <price> <name> <description> [quantity]` / `/removeitem <name>` - Manage the shop.\n\
        • `/giveaway <minutes> <winners> <prize>` / `/endgiveaway <message_id>` / `/cancelgiveaway <message_id>` - Run giveaways.\n\
        • `/admin add|remove|list` - Manage bot admins.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message."
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
