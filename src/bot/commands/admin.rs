//! Admin Discord commands - managing the bot's own admin list.
//!
//! Users with the Discord Administrator permission are always admins; this list
//! grants the same rights to members without it.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, checks},
        core::admin as admins,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Parent command for managing bot admins.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("admin_add", "admin_remove", "admin_list"),
        check = "checks::is_admin"
    )]
    pub async fn admin(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Admin management command. Available subcommands:\n\
            `admin add <user>` - Grant bot admin rights\n\
            `admin remove <user>` - Revoke bot admin rights\n\
            `admin list` - Show bot admins";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Grants bot admin rights to a user.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "add",
        check = "checks::is_admin"
    )]
    pub async fn admin_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to make an admin"] user: serenity::User,
    ) -> Result<()> {
        admins::add_admin(&ctx.data().database, &user.id.to_string()).await?;
        ctx.say(format!("✅ <@{}> is now a bot admin.", user.id))
            .await?;
        Ok(())
    }

    /// Revokes bot admin rights from a user.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "remove",
        check = "checks::is_admin"
    )]
    pub async fn admin_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to remove"] user: serenity::User,
    ) -> Result<()> {
        let removed = admins::remove_admin(&ctx.data().database, &user.id.to_string()).await?;
        let reply = if removed {
            format!("✅ <@{}> is no longer a bot admin.", user.id)
        } else {
            format!("<@{}> wasn't a bot admin.", user.id)
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Lists bot admins.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "list",
        check = "checks::is_admin"
    )]
    pub async fn admin_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let ids = admins::list_admins(&ctx.data().database).await?;
        let reply = if ids.is_empty() {
            "No bot admins yet. Server administrators always have access.".to_string()
        } else {
            let mentions: Vec<String> = ids.iter().map(|id| format!("<@{id}>")).collect();
            format!("👑 Bot admins: {}", mentions.join(", "))
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
