//! Shop item entity - Catalog entries users can buy with wallet funds.
//!
//! Items are never hard-deleted. Removing an item from the shop flips
//! `is_available` so inventories that still reference it stay intact.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shop item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique among available items
    pub name: String,
    /// Short description shown in the shop
    pub description: String,
    /// Price per purchase
    pub price: i64,
    /// Units granted to the buyer per purchase
    pub quantity: i64,
    /// Soft delete flag - false once the item is removed from the shop
    pub is_available: bool,
}

/// Defines relationships between Item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One item appears in many inventories
    #[sea_orm(has_many = "super::inventory::Entity")]
    Inventory,
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
