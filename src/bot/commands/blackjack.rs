//! Blackjack Discord commands - `blackjack`, `hit` and `stand`.
//!
//! `hit` and `stand` act on the author's oldest active game unless a game ID
//! is given. Games belonging to other users are reported as not found.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        config::currency::Currency,
        core::{
            blackjack,
            cards::{Hand, RandomDeck},
        },
        entities::{GameStatus, blackjack_game},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Picks the game a `hit`/`stand` applies to.
    async fn resolve_game(
        ctx: poise::Context<'_, BotData, Error>,
        game: Option<i64>,
    ) -> Result<Option<i64>> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        match game {
            Some(game_id) => match blackjack::get_game(db, game_id).await? {
                Some(g) if g.user_id == user_id => Ok(Some(game_id)),
                _ => Err(Error::GameNotFound { game_id }),
            },
            None => Ok(blackjack::active_games(db, &user_id)
                .await?
                .first()
                .map(|g| g.id)),
        }
    }

    /// Footer prompt while the player is still deciding.
    fn active_prompt(hand: &Hand) -> &'static str {
        if hand.is_blackjack() {
            "Blackjack! `stand` to collect"
        } else {
            "Your move: `hit` or `stand`"
        }
    }

    fn game_embed(game: &blackjack_game::Model, currency: &Currency) -> serenity::CreateEmbed {
        let (status, color) = match game.status {
            GameStatus::Active => (active_prompt(&game.player_hand).to_string(), 0x0058_65F2),
            GameStatus::PlayerWin => (
                format!("You win {}!", currency.format(blackjack::payout(game.status, game.bet))),
                0x002E_CC71,
            ),
            GameStatus::DealerWin => ("Dealer wins.".to_string(), 0x00E7_4C3C),
            GameStatus::Draw => ("Push. Your bet is returned.".to_string(), 0x0095_A5A6),
        };

        serenity::CreateEmbed::default()
            .title(format!("🃏 Blackjack #{}", game.id))
            .color(color)
            .field(
                "Your hand",
                format!("{} ({})", game.player_hand, game.player_hand.total()),
                true,
            )
            .field(
                "Dealer",
                format!("{} ({})", game.dealer_hand, game.dealer_hand.total()),
                true,
            )
            .field("Bet", currency.format(game.bet).to_string(), true)
            .footer(serenity::CreateEmbedFooter::new(status))
    }

    /// Starts a blackjack game. Your bet is held until the game ends.
    #[poise::command(slash_command, prefix_command)]
    pub async fn blackjack(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount to bet"] bet: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let mut deck = RandomDeck::from_entropy();
        let game =
            blackjack::start(&data.database, &ctx.author().id.to_string(), bet, &mut deck).await?;

        ctx.send(poise::CreateReply::default().embed(game_embed(&game, &data.currency)))
            .await?;
        Ok(())
    }

    /// Draws another card.
    #[poise::command(slash_command, prefix_command)]
    pub async fn hit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Game ID (defaults to your current game)"] game: Option<i64>,
    ) -> Result<()> {
        let Some(game_id) = resolve_game(ctx, game).await? else {
            ctx.say("🃏 You have no game in progress. Start one with `blackjack <bet>`.")
                .await?;
            return Ok(());
        };

        let data = ctx.data();
        let mut deck = RandomDeck::from_entropy();
        let outcome = blackjack::hit(&data.database, game_id, &mut deck).await?;

        let reply = poise::CreateReply::default()
            .content(format!("You drew {}.", outcome.card))
            .embed(game_embed(&outcome.game, &data.currency));
        ctx.send(reply).await?;
        Ok(())
    }

    /// Ends your turn and lets the dealer play.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stand(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Game ID (defaults to your current game)"] game: Option<i64>,
    ) -> Result<()> {
        let Some(game_id) = resolve_game(ctx, game).await? else {
            ctx.say("🃏 You have no game in progress. Start one with `blackjack <bet>`.")
                .await?;
            return Ok(());
        };

        let data = ctx.data();
        let mut deck = RandomDeck::from_entropy();
        let outcome = blackjack::stand(&data.database, game_id, &mut deck).await?;

        ctx.send(poise::CreateReply::default().embed(game_embed(&outcome.game, &data.currency)))
            .await?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core::cards::{Card, Rank, Suit};

        #[test]
        fn test_active_prompt_calls_out_natural_blackjack() {
            let natural: Hand = [
                Card::new(Rank::Ace, Suit::Spades),
                Card::new(Rank::King, Suit::Hearts),
            ]
            .into_iter()
            .collect();
            assert!(active_prompt(&natural).starts_with("Blackjack!"));

            let twenty_one: Hand = [
                Card::new(Rank::Seven, Suit::Spades),
                Card::new(Rank::Seven, Suit::Hearts),
                Card::new(Rank::Seven, Suit::Clubs),
            ]
            .into_iter()
            .collect();
            assert_eq!(active_prompt(&twenty_one), "Your move: `hit` or `stand`");
        }
    }
}

// Re-export all commands
pub use inner::*;
