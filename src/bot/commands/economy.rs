//! Economy Discord commands - balances, payments, banking and robbery.
//!
//! Business failures (bad amounts, insufficient funds, self-transfers) bubble
//! up as errors and are rendered by the framework's `on_error` hook.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, checks},
        core::ledger::{self, RobResult},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use rand::{SeedableRng, rngs::StdRng};

    const LEADERBOARD_SIZE: u64 = 10;

    /// Shows wallet and bank balances.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Whose balance to show (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let user = user.as_ref().unwrap_or_else(|| ctx.author());
        let data = ctx.data();
        let balances = ledger::get_balances(&data.database, &user.id.to_string()).await?;

        let embed = serenity::CreateEmbed::default()
            .title(format!("{}'s balance", user.name))
            .color(0x00F1_C40F)
            .field("Wallet", data.currency.format(balances.wallet).to_string(), true)
            .field("Bank", data.currency.format(balances.bank).to_string(), true)
            .field("Total", data.currency.format(balances.total()).to_string(), true);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Pays another user from your wallet.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Who to pay"] user: serenity::User,
        #[description = "Amount to send"] amount: i64,
    ) -> Result<()> {
        if user.bot {
            ctx.say("🤖 Bots don't need money.").await?;
            return Ok(());
        }

        let data = ctx.data();
        let receipt = ledger::transfer(
            &data.database,
            &ctx.author().id.to_string(),
            &user.id.to_string(),
            amount,
        )
        .await?;

        ctx.say(format!(
            "✅ Sent {} to <@{}>. Your wallet: {}",
            data.currency.format(amount),
            user.id,
            data.currency.format(receipt.from.wallet)
        ))
        .await?;
        Ok(())
    }

    /// Moves money from your wallet into the bank.
    #[poise::command(slash_command, prefix_command)]
    pub async fn deposit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount to deposit"] amount: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let balances =
            ledger::deposit(&data.database, &ctx.author().id.to_string(), amount).await?;

        ctx.say(format!(
            "🏦 Deposited {}. Wallet: {} | Bank: {}",
            data.currency.format(amount),
            data.currency.format(balances.wallet),
            data.currency.format(balances.bank)
        ))
        .await?;
        Ok(())
    }

    /// Moves money from the bank into your wallet.
    #[poise::command(slash_command, prefix_command)]
    pub async fn withdraw(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount to withdraw"] amount: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let balances =
            ledger::withdraw(&data.database, &ctx.author().id.to_string(), amount).await?;

        ctx.say(format!(
            "💸 Withdrew {}. Wallet: {} | Bank: {}",
            data.currency.format(amount),
            data.currency.format(balances.wallet),
            data.currency.format(balances.bank)
        ))
        .await?;
        Ok(())
    }

    /// Tries to steal from someone's wallet. Getting caught costs you a fine.
    #[poise::command(slash_command, prefix_command)]
    pub async fn rob(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Who to rob"] user: serenity::User,
    ) -> Result<()> {
        if user.bot {
            ctx.say("🤖 You can't rob a bot.").await?;
            return Ok(());
        }

        let data = ctx.data();
        let mut rng = StdRng::from_entropy();
        let outcome = ledger::rob(
            &data.database,
            &ctx.author().id.to_string(),
            &user.id.to_string(),
            &mut rng,
        )
        .await?;

        let message = match outcome.result {
            RobResult::NothingToSteal => {
                format!("🙄 <@{}> has nothing in their wallet to steal.", user.id)
            }
            RobResult::Stolen { amount } => format!(
                "🦹 You stole {} from <@{}>!",
                data.currency.format(amount),
                user.id
            ),
            RobResult::Caught { penalty } => format!(
                "🚓 You got caught and paid <@{}> a fine of {}.",
                user.id,
                data.currency.format(penalty)
            ),
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Shows the richest users by wallet plus bank.
    #[poise::command(slash_command, prefix_command)]
    pub async fn leaderboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let top = ledger::leaderboard(&data.database, LEADERBOARD_SIZE).await?;

        if top.is_empty() {
            ctx.say("Nobody has any money yet.").await?;
            return Ok(());
        }

        let lines: Vec<String> = top
            .iter()
            .enumerate()
            .map(|(i, account)| {
                format!(
                    "**{}.** <@{}> - {}",
                    i + 1,
                    account.user_id,
                    data.currency.format(account.wallet + account.bank)
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("🏆 Leaderboard")
            .color(0x00F1_C40F)
            .description(lines.join("\n"));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Adds money to (or, with a negative amount, removes it from) a wallet. Admin only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin")]
    pub async fn give(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Who receives the money"] user: serenity::User,
        #[description = "Amount to add; negative to take away"] amount: i64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(Error::InvalidAmount { amount });
        }

        let data = ctx.data();
        let balances = ledger::adjust_wallet(&data.database, &user.id.to_string(), amount).await?;

        ctx.say(format!(
            "✅ Adjusted <@{}>'s wallet by {}. New wallet: {}",
            user.id,
            data.currency.format(amount),
            data.currency.format(balances.wallet)
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
