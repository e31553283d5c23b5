//! Giveaway entity - A prize draw announced in a channel message.
//!
//! Users enter by reacting to the announcement message; see
//! [`super::giveaway_entry`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Giveaway database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "giveaways")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord message ID of the announcement
    pub message_id: String,
    /// Channel the announcement was posted in
    pub channel_id: String,
    /// Unix timestamp in milliseconds when entries close
    pub end_time: i64,
    /// Prize description
    pub prize: String,
    /// Number of winners to draw
    pub winners: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One giveaway has many entries
    #[sea_orm(has_many = "super::giveaway_entry::Entity")]
    Entries,
}

impl Related<super::giveaway_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
