//! Account entity - One row per Discord user holding wallet and bank balances.
//!
//! Rows are created lazily the first time a user is referenced by any ledger
//! operation and are never deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "economy")]
pub struct Model {
    /// Discord user ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Spendable balance
    pub wallet: i64,
    /// Protected balance, only reachable through deposit/withdraw
    pub bank: i64,
}

/// `Account` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
