//! Job Discord commands - `addjob`, `joblist`, `work` and `completejob`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, checks, replies},
        core::jobs,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use rand::{SeedableRng, rngs::StdRng};

    /// Adds a job to the job list. Admin only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin")]
    pub async fn addjob(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What the job involves"]
        #[rest]
        description: String,
    ) -> Result<()> {
        let job = jobs::add_job(&ctx.data().database, &description).await?;
        ctx.say(format!("✅ Added job #{}: \"{}\"", job.id, job.description))
            .await?;
        Ok(())
    }

    fn job_line(listing: &jobs::JobListing) -> String {
        let assignees = if listing.assignees.is_empty() {
            "Unassigned".to_string()
        } else {
            listing
                .assignees
                .iter()
                .map(|id| format!("<@{id}>"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "**#{}** {} - {assignees}",
            listing.job.id, listing.job.description
        )
    }

    /// Lists every job and who is working on it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn joblist(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let listings = jobs::list_jobs(&ctx.data().database).await?;

        if listings.is_empty() {
            ctx.say("🚫 No jobs available.").await?;
            return Ok(());
        }

        let lines: Vec<String> = listings.iter().map(job_line).collect();

        let embed = serenity::CreateEmbed::default()
            .title("📋 Job List")
            .color(0x0058_65F2)
            .description(replies::bounded_lines(&lines, replies::EMBED_DESCRIPTION_LIMIT));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Assigns you a random job you aren't already doing.
    #[poise::command(slash_command, prefix_command)]
    pub async fn work(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let mut rng = StdRng::from_entropy();
        let job =
            jobs::assign_random_job(&ctx.data().database, &ctx.author().id.to_string(), &mut rng)
                .await?;

        ctx.say(format!(
            "💼 You've been assigned job #{}: \"{}\". An admin will pay you once it's done.",
            job.id, job.description
        ))
        .await?;
        Ok(())
    }

    /// Marks a user's work as done and pays them. Admin only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin")]
    pub async fn completejob(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Who finished their job"] user: serenity::User,
        #[description = "Reward to pay"] reward: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let done = jobs::complete_job(&data.database, &user.id.to_string(), reward).await?;

        let titles: Vec<String> = done
            .jobs
            .iter()
            .map(|job| format!("\"{}\"", job.description))
            .collect();
        ctx.say(format!(
            "✅ <@{}> completed {} and earned {}. Wallet: {}",
            user.id,
            titles.join(", "),
            data.currency.format(done.reward),
            data.currency.format(done.wallet)
        ))
        .await?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::entities::job;

        fn listing(id: i64, assignees: &[&str]) -> jobs::JobListing {
            jobs::JobListing {
                job: job::Model {
                    id,
                    description: format!("Job {id}"),
                },
                assignees: assignees.iter().map(ToString::to_string).collect(),
            }
        }

        #[test]
        fn test_job_line() {
            assert_eq!(job_line(&listing(3, &[])), "**#3** Job 3 - Unassigned");
            assert_eq!(
                job_line(&listing(1, &["10", "20"])),
                "**#1** Job 1 - <@10>, <@20>"
            );
        }

        #[test]
        fn test_many_jobs_fit_one_embed() {
            let lines: Vec<String> = (1..=300)
                .map(|id| job_line(&listing(id, &["123456789012345678"])))
                .collect();
            let text = replies::bounded_lines(&lines, replies::EMBED_DESCRIPTION_LIMIT);
            assert!(text.chars().count() <= replies::EMBED_DESCRIPTION_LIMIT);
            assert!(text.ends_with("more"));
        }
    }
}

// Re-export all commands
pub use inner::*;
