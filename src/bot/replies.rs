//! Wording for business errors shown to Discord users, plus sizing of long
//! embed listings.

use crate::{config::currency::Currency, errors::Error};

/// Discord's limit on an embed description, in characters.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Room kept for the "…and N more" note.
const MORE_NOTE_RESERVE: usize = 32;

/// Joins listing lines for an embed description of at most `limit` characters.
///
/// Lines that don't fit are dropped whole and counted in a trailing note.
#[must_use]
pub fn bounded_lines(lines: &[String], limit: usize) -> String {
    let joined = lines.join("\n");
    if joined.chars().count() <= limit {
        return joined;
    }

    let budget = limit.saturating_sub(MORE_NOTE_RESERVE);
    let mut out = String::new();
    let mut used = 0;
    let mut shown = 0;
    for line in lines {
        let len = line.chars().count() + usize::from(shown > 0);
        if used + len > budget {
            break;
        }
        if shown > 0 {
            out.push('\n');
        }
        out.push_str(line);
        used += len;
        shown += 1;
    }

    if shown > 0 {
        out.push('\n');
    }
    out.push_str(&format!("…and {} more", lines.len() - shown));
    out
}

/// Turns an expected business outcome into a reply.
///
/// Meaningful for errors where [`Error::is_user_error`] is true and for
/// [`Error::Announcement`], which carries winners an admin must see. Anything
/// else gets a generic message.
#[must_use]
pub fn user_message(error: &Error, currency: &Currency) -> String {
    match error {
        Error::InvalidAmount { .. } => "❌ Amount must be greater than zero.".to_string(),
        Error::InsufficientFunds {
            available,
            required,
        } => format!(
            "❌ Not enough {}! You have {} but need {}.",
            currency.name,
            currency.format(*available),
            currency.format(*required)
        ),
        Error::NotAssigned { user_id } => {
            format!("❌ <@{user_id}> is not assigned to any job.")
        }
        Error::NoJobsAvailable => {
            "🚫 No jobs available for you right now. Check `joblist` later!".to_string()
        }
        Error::GameNotFound { game_id } => format!("❌ Blackjack game #{game_id} not found."),
        Error::GameNotActive { game_id } => {
            format!("❌ Blackjack game #{game_id} is already over.")
        }
        Error::ItemNotFound { name } => format!("❌ There is no item named '{name}' in the shop."),
        Error::NotOwned { name } => format!("❌ You don't have any '{name}'."),
        Error::InvalidInput { message } => format!("❌ {message}."),
        Error::Announcement { prize, winners, .. } if winners.is_empty() => {
            format!(
                "⚠️ The giveaway for **{prize}** ended with no entries, but I couldn't post that in its channel."
            )
        }
        Error::Announcement { prize, winners, .. } => {
            let mentions: Vec<String> = winners.iter().map(|id| format!("<@{id}>")).collect();
            format!(
                "⚠️ I couldn't post the results for **{prize}**. The winners are {}.",
                mentions.join(", ")
            )
        }
        _ => "❌ Something went wrong. Please try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_uses_currency() {
        let message = user_message(
            &Error::InsufficientFunds {
                available: 5,
                required: 20,
            },
            &Currency::default(),
        );
        assert_eq!(message, "❌ Not enough pizza! You have 5 🍕 but need 20 🍕.");
    }

    #[test]
    fn test_overflow_is_not_reported_as_non_positive() {
        let message = user_message(&Error::invalid_input("Quantity too large"), &Currency::default());
        assert_eq!(message, "❌ Quantity too large.");
    }

    #[test]
    fn test_failed_announcement_keeps_winners() {
        let error = Error::Announcement {
            prize: "A pizza".to_string(),
            winners: vec!["1".to_string(), "2".to_string()],
            source: Box::new(poise::serenity_prelude::Error::Other("missing access")),
        };
        assert!(error.to_string().contains("[\"1\", \"2\"]"));

        let message = user_message(&error, &Currency::default());
        assert!(message.contains("<@1>, <@2>"));
        assert!(message.contains("A pizza"));
    }

    #[test]
    fn test_bounded_lines_keeps_short_listings() {
        let lines: Vec<String> = (1..=30)
            .map(|i| format!("**#{i}** Job {i} - Unassigned"))
            .collect();
        let text = bounded_lines(&lines, EMBED_DESCRIPTION_LIMIT);
        assert_eq!(text.lines().count(), 30);
        assert!(!text.contains("more"));
    }

    #[test]
    fn test_bounded_lines_truncates_long_listings() {
        let lines: Vec<String> = (1..=200)
            .map(|i| format!("**#{i}** {}", "x".repeat(60)))
            .collect();
        let text = bounded_lines(&lines, EMBED_DESCRIPTION_LIMIT);

        assert!(text.chars().count() <= EMBED_DESCRIPTION_LIMIT);
        assert!(text.starts_with("**#1** "));
        let shown = text.lines().count() - 1;
        assert!(text.ends_with(&format!("…and {} more", 200 - shown)));
    }

    #[test]
    fn test_failures_stay_generic() {
        let message = user_message(&Error::Database("disk full".to_string()), &Currency::default());
        assert!(!message.contains("disk full"));
    }
}
