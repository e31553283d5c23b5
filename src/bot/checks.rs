//! Admin permission checks.
//!
//! A user counts as an admin if they hold the Discord Administrator permission
//! in the guild the command was used in, or appear in the bot's own admin list.

use crate::{
    bot::BotData,
    core::admin,
    errors::{Error, Result},
};

/// Poise `check` for privileged commands.
pub async fn is_admin(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let user_id = ctx.author().id.to_string();
    if admin::is_admin(&ctx.data().database, &user_id).await? {
        return Ok(true);
    }

    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    // Interactions carry resolved permissions; prefix commands need the guild cache
    if let Some(permissions) = member.permissions {
        return Ok(permissions.administrator());
    }
    Ok(ctx
        .guild()
        .is_some_and(|guild| guild.member_permissions(&member).administrator()))
}
