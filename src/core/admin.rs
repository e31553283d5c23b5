//! Bot-level admin list.

use crate::{
    entities::{Admin, admin},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::OnConflict};
use tracing::info;

/// Grants admin rights. Adding an existing admin is a no-op.
pub async fn add_admin(db: &DatabaseConnection, user_id: &str) -> Result<()> {
    let row = admin::ActiveModel {
        user_id: Set(user_id.to_owned()),
    };
    Admin::insert(row)
        .on_conflict(
            OnConflict::column(admin::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!(user_id, "Added admin");
    Ok(())
}

/// Revokes admin rights. Returns whether the user was an admin.
pub async fn remove_admin(db: &DatabaseConnection, user_id: &str) -> Result<bool> {
    let result = Admin::delete_by_id(user_id.to_owned()).exec(db).await?;
    let removed = result.rows_affected > 0;
    if removed {
        info!(user_id, "Removed admin");
    }
    Ok(removed)
}

pub async fn list_admins(db: &DatabaseConnection) -> Result<Vec<String>> {
    let admins = Admin::find()
        .order_by_asc(admin::Column::UserId)
        .all(db)
        .await?;
    Ok(admins.into_iter().map(|a| a.user_id).collect())
}

pub async fn is_admin(db: &DatabaseConnection, user_id: &str) -> Result<bool> {
    Ok(Admin::find_by_id(user_id.to_owned())
        .one(db)
        .await?
        .is_some())
}
