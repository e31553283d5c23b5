//! Job and shop seeding from config.toml
//!
//! This module loads an optional TOML file listing starter jobs and shop items.
//! Each list is only applied to an empty table, so restarting the bot never
//! duplicates entries or resurrects ones an admin removed.

use crate::{
    core::{jobs, shop},
    entities::{Item, Job},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use std::{collections::HashSet, path::Path};
use tracing::info;

/// Default location of the seed file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Jobs to create on first run
    #[serde(default)]
    pub jobs: Vec<JobSeed>,
    /// Shop items to create on first run
    #[serde(default)]
    pub items: Vec<ItemSeed>,
}

/// A starter job
#[derive(Debug, Deserialize, Clone)]
pub struct JobSeed {
    pub description: String,
}

/// A starter shop item
#[derive(Debug, Deserialize, Clone)]
pub struct ItemSeed {
    pub name: String,
    pub description: String,
    pub price: i64,
    /// Units granted per purchase
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

impl SeedConfig {
    /// Checks every entry before anything is written.
    ///
    /// # Errors
    /// [`Error::Config`] naming the first blank job, invalid item or repeated
    /// item name.
    pub fn validate(&self) -> Result<()> {
        for (i, seed) in self.jobs.iter().enumerate() {
            if seed.description.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("Job #{} has an empty description", i + 1),
                });
            }
        }

        let mut names = HashSet::new();
        for seed in &self.items {
            shop::validate_item(seed.price, &seed.name, &seed.description, seed.quantity).map_err(
                |e| Error::Config {
                    message: format!("Item '{}': {e}", seed.name.trim()),
                },
            )?;
            if !names.insert(seed.name.trim()) {
                return Err(Error::Config {
                    message: format!("Item '{}' is listed more than once", seed.name.trim()),
                });
            }
        }
        Ok(())
    }
}

/// How many rows [`seed_database`] created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub jobs: usize,
    pub items: usize,
}

/// Parses seed configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads ./config.toml if it exists. A missing file is not an error.
pub fn load_default_config() -> Result<Option<SeedConfig>> {
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if !path.exists() {
        return Ok(None);
    }
    load_config(path).map(Some)
}

/// Creates the configured jobs and items in whichever of their tables is empty.
///
/// The whole config is validated first, so an invalid entry fails the seed
/// without leaving a partly filled table behind.
pub async fn seed_database(db: &DatabaseConnection, config: &SeedConfig) -> Result<SeedSummary> {
    config.validate()?;
    let mut summary = SeedSummary::default();

    if !config.jobs.is_empty() && Job::find().count(db).await? == 0 {
        for seed in &config.jobs {
            jobs::add_job(db, &seed.description).await?;
        }
        summary.jobs = config.jobs.len();
    }

    if !config.items.is_empty() && Item::find().count(db).await? == 0 {
        for seed in &config.items {
            shop::add_item(db, seed.price, &seed.name, &seed.description, seed.quantity).await?;
        }
        summary.items = config.items.len();
    }

    info!(jobs = summary.jobs, items = summary.items, "Seeded database");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const SAMPLE: &str = r#"
        [[jobs]]
        description = "Deliver pizzas"

        [[jobs]]
        description = "Fold boxes"

        [[items]]
        name = "Slice"
        description = "A single slice"
        price = 5

        [[items]]
        name = "Party pack"
        description = "Ten slices"
        price = 40
        quantity = 10
    "#;

    #[test]
    fn test_parse_seed_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.jobs[1].description, "Fold boxes");
        assert_eq!(config.items[0].quantity, 1);
        assert_eq!(config.items[1].quantity, 10);
        assert_eq!(config.items[1].price, 40);
    }

    #[test]
    fn test_parse_partial_and_invalid_config() {
        let config = parse_config("[[jobs]]\ndescription = \"Only jobs\"").unwrap();
        assert_eq!(config.jobs.len(), 1);
        assert!(config.items.is_empty());

        let result = parse_config("[[items]]\nname = \"No price\"");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_seed_only_fills_empty_tables() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_job(&db, "Existing job").await?;
        let config = parse_config(SAMPLE)?;

        let summary = seed_database(&db, &config).await?;
        assert_eq!(summary, SeedSummary { jobs: 0, items: 2 });
        assert_eq!(jobs::list_jobs(&db).await?.len(), 1);
        assert_eq!(shop::list_items(&db).await?.len(), 2);

        // Second run changes nothing
        let again = seed_database(&db, &config).await?;
        assert_eq!(again, SeedSummary::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_seed_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let config = parse_config(
            r#"
            [[jobs]]
            description = "Deliver pizzas"

            [[items]]
            name = "Slice"
            description = "A single slice"
            price = 5

            [[items]]
            name = "Free lunch"
            description = "Costs nothing"
            price = 0
        "#,
        )?;

        let result = seed_database(&db, &config).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        assert!(jobs::list_jobs(&db).await?.is_empty());
        assert!(shop::list_items(&db).await?.is_empty());

        // Fixing the entry lets a later run seed everything
        let fixed = parse_config(SAMPLE)?;
        let summary = seed_database(&db, &fixed).await?;
        assert_eq!(summary, SeedSummary { jobs: 2, items: 2 });

        Ok(())
    }

    #[test]
    fn test_validate_rejects_blank_job_and_repeated_item() {
        let blank_job = parse_config("[[jobs]]\ndescription = \"  \"").unwrap();
        assert!(matches!(blank_job.validate(), Err(Error::Config { .. })));

        let repeated = parse_config(
            r#"
            [[items]]
            name = "Slice"
            description = "One"
            price = 5

            [[items]]
            name = " Slice "
            description = "Two"
            price = 6
        "#,
        )
        .unwrap();
        assert!(matches!(repeated.validate(), Err(Error::Config { .. })));

        assert!(parse_config(SAMPLE).unwrap().validate().is_ok());
    }
}
