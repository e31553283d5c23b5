//! Giveaway Discord commands - `giveaway`, `endgiveaway` and `cancelgiveaway`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, checks,
            handlers::giveaways::{self, GIVEAWAY_EMOJI},
            replies,
        },
        core::giveaway,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    const MILLIS_PER_MINUTE: i64 = 60_000;

    /// Starts a giveaway in this channel. Members enter by reacting with 🎉. Admin only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin")]
    pub async fn giveaway(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How long it runs, in minutes"] minutes: i64,
        #[description = "Number of winners"] winners: i32,
        #[description = "What's being given away"]
        #[rest]
        prize: String,
    ) -> Result<()> {
        if minutes <= 0 {
            return Err(Error::invalid_input("Duration must be at least one minute"));
        }

        let now = giveaway::now_millis();
        let end_time = minutes
            .checked_mul(MILLIS_PER_MINUTE)
            .and_then(|ms| now.checked_add(ms))
            .ok_or_else(|| Error::invalid_input("Duration is too long"))?;

        let embed = serenity::CreateEmbed::default()
            .title(format!("{GIVEAWAY_EMOJI} Giveaway: {}", prize.trim()))
            .color(0x00E9_1E63)
            .description(format!(
                "React with {GIVEAWAY_EMOJI} to enter!\nWinners: **{winners}**\nEnds <t:{}:R>",
                end_time / 1000
            ));

        let handle = ctx.send(poise::CreateReply::default().embed(embed)).await?;
        let message = handle.message().await?;

        let created = giveaway::create_giveaway(
            &ctx.data().database,
            &message.id.to_string(),
            &ctx.channel_id().to_string(),
            end_time,
            &prize,
            winners,
            now,
        )
        .await;

        match created {
            Ok(_) => {
                message
                    .react(
                        ctx.http(),
                        serenity::ReactionType::Unicode(GIVEAWAY_EMOJI.to_string()),
                    )
                    .await?;
                Ok(())
            }
            Err(e) => {
                // Don't leave an announcement nobody can win
                handle.delete(ctx).await?;
                Err(e)
            }
        }
    }

    /// Ends a giveaway now and announces the winners. Admin only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin")]
    pub async fn endgiveaway(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Message ID of the giveaway announcement"] message_id: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let message_id = message_id.trim();

        let Some(found) = giveaway::get_giveaway_by_message_id(db, message_id).await? else {
            ctx.say(format!("❌ No running giveaway with message ID `{message_id}`."))
                .await?;
            return Ok(());
        };

        let reply = match giveaways::finish_giveaway(ctx.http(), db, &found).await {
            Ok(Some(_)) => format!("✅ Ended the giveaway for **{}**.", found.prize),
            Ok(None) => "That giveaway has already ended.".to_string(),
            // Already logged; the admin still needs the winners
            Err(e @ Error::Announcement { .. }) => replies::user_message(&e, &ctx.data().currency),
            Err(e) => return Err(e),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Cancels a giveaway without drawing winners. Admin only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin")]
    pub async fn cancelgiveaway(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Message ID of the giveaway announcement"] message_id: String,
    ) -> Result<()> {
        let message_id = message_id.trim();
        let reply = if giveaway::delete_giveaway(&ctx.data().database, message_id).await? {
            format!("🗑️ Cancelled giveaway `{message_id}`. No winners were drawn.")
        } else {
            format!("❌ No running giveaway with message ID `{message_id}`.")
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
