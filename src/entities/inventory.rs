//! Inventory entity - How many units of an item a user owns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    /// Discord user ID of the owner
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Owned item
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: i64,
    /// Units owned; the row is removed when this reaches zero
    pub quantity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each inventory row refers to one item
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
