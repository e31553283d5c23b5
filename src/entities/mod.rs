//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod admin;
pub mod blackjack_game;
pub mod giveaway;
pub mod giveaway_entry;
pub mod inventory;
pub mod item;
pub mod job;
pub mod job_assignee;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use admin::{Column as AdminColumn, Entity as Admin, Model as AdminModel};
pub use blackjack_game::{
    Column as BlackjackGameColumn, Entity as BlackjackGame, GameStatus,
    Model as BlackjackGameModel,
};
pub use giveaway::{Column as GiveawayColumn, Entity as Giveaway, Model as GiveawayModel};
pub use giveaway_entry::{
    Column as GiveawayEntryColumn, Entity as GiveawayEntry, Model as GiveawayEntryModel,
};
pub use inventory::{Column as InventoryColumn, Entity as Inventory, Model as InventoryModel};
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use job::{Column as JobColumn, Entity as Job, Model as JobModel};
pub use job_assignee::{
    Column as JobAssigneeColumn, Entity as JobAssignee, Model as JobAssigneeModel,
};
