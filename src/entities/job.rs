//! Job entity - Tasks users can be assigned to via `/work`.
//!
//! Job IDs are kept dense (`1..=count`) so admins can refer to them by number;
//! see [`crate::core::jobs::add_job`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Job database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "joblist")]
pub struct Model {
    /// Dense job number
    #[sea_orm(primary_key)]
    pub id: i64,
    /// What the job is about
    pub description: String,
}

/// Defines relationships between Job and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One job can be held by many users
    #[sea_orm(has_many = "super::job_assignee::Entity")]
    Assignees,
}

impl Related<super::job_assignee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
