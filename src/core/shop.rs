//! Shop business logic - Catalog, purchases, inventories and redemption.
//!
//! Items are soft-deleted: removing one from the shop hides it from the
//! catalog and from purchase/redeem lookups, but inventory rows referencing it
//! are left alone. All lookups by name only consider available items.

use crate::{
    core::ledger,
    entities::{Inventory, Item, inventory, item},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::info;

/// Result of [`purchase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub item: item::Model,
    /// Units added to the buyer's inventory
    pub units: i64,
    /// Total charged to the wallet
    pub cost: i64,
    /// Wallet after the charge
    pub wallet: i64,
}

/// Result of [`redeem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    pub item: item::Model,
    /// Units left after this use; zero means the last one was used and the
    /// inventory row removed
    pub remaining: i64,
}

impl Redemption {
    #[must_use]
    pub const fn was_last(&self) -> bool {
        self.remaining == 0
    }
}

/// Finds an available item by exact name.
pub async fn get_item_by_name<C>(db: &C, name: &str) -> Result<Option<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find()
        .filter(item::Column::Name.eq(name.trim()))
        .filter(item::Column::IsAvailable.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_item<C>(db: &C, name: &str) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    get_item_by_name(db, name)
        .await?
        .ok_or_else(|| Error::ItemNotFound {
            name: name.trim().to_owned(),
        })
}

/// All available items, cheapest first.
pub async fn list_items(db: &DatabaseConnection) -> Result<Vec<item::Model>> {
    Item::find()
        .filter(item::Column::IsAvailable.eq(true))
        .order_by_asc(item::Column::Price)
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Checks the fields of a new item without touching the database.
///
/// # Errors
/// [`Error::InvalidInput`] if the price or quantity is not positive, or the
/// name or description is blank.
pub fn validate_item(price: i64, name: &str, description: &str, quantity: i64) -> Result<()> {
    if price <= 0 {
        return Err(Error::invalid_input("Price must be greater than zero"));
    }
    if quantity <= 0 {
        return Err(Error::invalid_input("Quantity must be greater than zero"));
    }
    if name.trim().is_empty() || description.trim().is_empty() {
        return Err(Error::invalid_input("Name and description are required"));
    }
    Ok(())
}

/// Adds an item to the shop.
///
/// `quantity` is the number of units a single purchase grants.
///
/// # Errors
/// [`Error::InvalidInput`] if the price or quantity is not positive, the name or
/// description is blank, or an available item already uses the name.
pub async fn add_item(
    db: &DatabaseConnection,
    price: i64,
    name: &str,
    description: &str,
    quantity: i64,
) -> Result<item::Model> {
    let name = name.trim();
    let description = description.trim();
    validate_item(price, name, description, quantity)?;

    let txn = db.begin().await?;

    if get_item_by_name(&txn, name).await?.is_some() {
        return Err(Error::invalid_input(format!(
            "An item named '{name}' is already in the shop"
        )));
    }

    let item = item::ActiveModel {
        name: Set(name.to_owned()),
        description: Set(description.to_owned()),
        price: Set(price),
        quantity: Set(quantity),
        is_available: Set(true),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(item_id = item.id, name, price, "Added shop item");
    Ok(item)
}

/// Takes an item off the shelf. Existing inventories keep their units.
///
/// # Errors
/// [`Error::ItemNotFound`] if no available item has this name.
pub async fn remove_item(db: &DatabaseConnection, name: &str) -> Result<item::Model> {
    let item = require_item(db, name).await?;

    let mut active: item::ActiveModel = item.into();
    active.is_available = Set(false);
    let item = active.update(db).await?;

    info!(item_id = item.id, name = item.name, "Removed shop item");
    Ok(item)
}

/// Adds `quantity` units of an item to a user's inventory, summing with any
/// units already owned. A single upsert statement.
pub async fn add_item_to_inventory<C>(
    db: &C,
    user_id: &str,
    item_id: i64,
    quantity: i64,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidAmount { amount: quantity });
    }

    let row = inventory::ActiveModel {
        user_id: Set(user_id.to_owned()),
        item_id: Set(item_id),
        quantity: Set(quantity),
    };

    Inventory::insert(row)
        .on_conflict(
            OnConflict::columns([inventory::Column::UserId, inventory::Column::ItemId])
                .value(
                    inventory::Column::Quantity,
                    Expr::col(inventory::Column::Quantity).add(quantity),
                )
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Buys `count` purchases of an item: charges `price × count` and grants
/// `quantity × count` units, atomically.
///
/// # Errors
/// - [`Error::InvalidAmount`] if `count <= 0` or the cost overflows
/// - [`Error::ItemNotFound`] if the item is missing or unavailable
/// - [`Error::InsufficientFunds`] if the wallet cannot cover the cost
pub async fn purchase(
    db: &DatabaseConnection,
    user_id: &str,
    item_name: &str,
    count: i64,
) -> Result<Purchase> {
    if count <= 0 {
        return Err(Error::InvalidAmount { amount: count });
    }

    let txn = db.begin().await?;

    let item = require_item(&txn, item_name).await?;
    let cost = item
        .price
        .checked_mul(count)
        .ok_or_else(|| Error::invalid_input("Quantity too large"))?;
    let units = item
        .quantity
        .checked_mul(count)
        .ok_or_else(|| Error::invalid_input("Quantity too large"))?;

    ledger::ensure_account(&txn, user_id).await?;
    ledger::debit_wallet(&txn, user_id, cost).await?;
    add_item_to_inventory(&txn, user_id, item.id, units).await?;
    let wallet = ledger::fetch_balances(&txn, user_id).await?.wallet;

    txn.commit().await?;

    info!(user_id, item_id = item.id, units, cost, "Purchase completed");
    Ok(Purchase {
        item,
        units,
        cost,
        wallet,
    })
}

/// Uses one unit of an owned item.
///
/// # Errors
/// - [`Error::ItemNotFound`] if the item is missing or unavailable
/// - [`Error::NotOwned`] if the user has no units of it
pub async fn redeem(db: &DatabaseConnection, user_id: &str, item_name: &str) -> Result<Redemption> {
    let txn = db.begin().await?;

    let item = require_item(&txn, item_name).await?;

    let owned = Inventory::find_by_id((user_id.to_owned(), item.id))
        .one(&txn)
        .await?
        .filter(|row| row.quantity > 0)
        .ok_or_else(|| Error::NotOwned {
            name: item.name.clone(),
        })?;

    let remaining = owned.quantity - 1;
    if remaining == 0 {
        owned.delete(&txn).await?;
    } else {
        Inventory::update_many()
            .col_expr(
                inventory::Column::Quantity,
                Expr::col(inventory::Column::Quantity).sub(1),
            )
            .filter(inventory::Column::UserId.eq(user_id))
            .filter(inventory::Column::ItemId.eq(item.id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    info!(user_id, item_id = item.id, remaining, "Redeemed item");
    Ok(Redemption { item, remaining })
}

/// Everything `user_id` owns, with unit counts, by item ID.
///
/// Includes items that have since been removed from the shop.
pub async fn inventory(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<(item::Model, i64)>> {
    let rows = Inventory::find()
        .filter(inventory::Column::UserId.eq(user_id))
        .order_by_asc(inventory::Column::ItemId)
        .find_also_related(Item)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(row, item)| item.map(|item| (item, row.quantity)))
        .collect())
}
