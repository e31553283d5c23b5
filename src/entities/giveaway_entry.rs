//! Giveaway entry entity - One row per user entered in a giveaway.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "giveaway_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub giveaway_id: i64,
    /// Discord user ID of the entrant
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Entries disappear with their giveaway
    #[sea_orm(
        belongs_to = "super::giveaway::Entity",
        from = "Column::GiveawayId",
        to = "super::giveaway::Column::Id",
        on_delete = "Cascade"
    )]
    Giveaway,
}

impl Related<super::giveaway::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Giveaway.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
