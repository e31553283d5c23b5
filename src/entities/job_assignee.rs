//! Job assignment entity - Links a user to a job they are currently working.
//!
//! The foreign key cascades on update so that renumbering job IDs carries
//! existing assignments along.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Job assignment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_assignees")]
pub struct Model {
    /// Assigned job
    #[sea_orm(primary_key, auto_increment = false)]
    pub job_id: i64,
    /// Discord user ID of the worker
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assignment belongs to one job
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Job,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
