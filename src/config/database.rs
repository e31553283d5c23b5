//! Database configuration module for the economy bot.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. Creation is `IF NOT EXISTS`, making startup
//! against an existing database file a no-op.

use crate::entities::{
    Account, Admin, BlackjackGame, Giveaway, GiveawayEntry, Inventory, Item, Job, JobAssignee,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::debug;

/// Database used when `DATABASE_URL` is not set. `mode=rwc` creates the file
/// on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/economy.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// When the URL points at a local `SQLite` file, its parent directory is
/// created first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();

    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory holding the database file of a `sqlite://` URL, if any.
fn sqlite_parent_dir(url: &str) -> Option<&str> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    path.rsplit_once('/')
        .map(|(dir, _)| dir)
        .filter(|dir| !dir.is_empty())
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    debug!(table = entity.table_name(), "Ensured table exists");
    Ok(())
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Parent tables are created before the tables holding foreign keys to them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Account).await?;
    create_table(db, &schema, Admin).await?;
    create_table(db, &schema, Job).await?;
    create_table(db, &schema, JobAssignee).await?;
    create_table(db, &schema, Item).await?;
    create_table(db, &schema, Inventory).await?;
    create_table(db, &schema, BlackjackGame).await?;
    create_table(db, &schema, Giveaway).await?;
    create_table(db, &schema, GiveawayEntry).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AccountModel, BlackjackGameModel, GiveawayEntryModel, ItemModel};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<AccountModel> = Account::find().limit(1).all(&db).await?;
        let _: Vec<ItemModel> = Item::find().limit(1).all(&db).await?;
        let _: Vec<BlackjackGameModel> = BlackjackGame::find().limit(1).all(&db).await?;
        let _: Vec<GiveawayEntryModel> = GiveawayEntry::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(sqlite_parent_dir(DEFAULT_DATABASE_URL), Some("data"));
        assert_eq!(sqlite_parent_dir("sqlite://economy.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("sqlite://:memory:"), None);
        assert_eq!(
            sqlite_parent_dir("sqlite://var/lib/bot/db.sqlite?mode=rwc"),
            Some("var/lib/bot")
        );
    }
}
