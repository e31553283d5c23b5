//! Ledger business logic - Wallet and bank balances for every user.
//!
//! Every operation that touches more than one balance runs inside a single
//! database transaction, and every debit is a guarded
//! `UPDATE ... WHERE wallet >= amount` so a concurrent spend can never push a
//! balance below what the check saw. Accounts are created lazily with an
//! `INSERT ... ON CONFLICT DO NOTHING`, which makes concurrent first touches of
//! the same user harmless.

use crate::{
    entities::{Account, account},
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::{
    QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info};

/// Most a successful robbery can take.
pub const ROB_MAX_STEAL: i64 = 100;
/// Paid by a robber who gets caught, to the intended victim.
pub const ROB_PENALTY: i64 = 50;
/// Probability that a robbery succeeds.
pub const ROB_SUCCESS_CHANCE: f64 = 0.5;

/// Snapshot of one user's balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balances {
    /// Spendable balance
    pub wallet: i64,
    /// Protected balance
    pub bank: i64,
}

impl Balances {
    #[must_use]
    pub const fn total(self) -> i64 {
        self.wallet + self.bank
    }
}

impl From<account::Model> for Balances {
    fn from(model: account::Model) -> Self {
        Self {
            wallet: model.wallet,
            bank: model.bank,
        }
    }
}

/// Balances of both parties after a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    /// Sender balances after the debit
    pub from: Balances,
    /// Recipient balances after the credit
    pub to: Balances,
}

/// What happened during a robbery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobResult {
    /// Target's wallet was empty; nothing changed
    NothingToSteal,
    /// Robber took `amount` from the target
    Stolen {
        /// Amount moved from target to robber
        amount: i64,
    },
    /// Robber was caught and paid `penalty` to the target
    Caught {
        /// Amount moved from robber to target
        penalty: i64,
    },
}

/// Result of [`rob`], with both parties' balances afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobOutcome {
    pub result: RobResult,
    pub robber: Balances,
    pub target: Balances,
}

impl RobOutcome {
    /// Whether a robbery was attempted at all. Caught attempts count; only an
    /// empty target wallet yields `false`.
    #[must_use]
    pub const fn success(&self) -> bool {
        !matches!(self.result, RobResult::NothingToSteal)
    }
}

/// Creates the account with zero balances if it does not exist yet.
///
/// Idempotent and safe to race: a concurrent insert of the same user is
/// absorbed by the conflict clause instead of failing on the primary key.
pub async fn ensure_account<C>(db: &C, user_id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let row = account::ActiveModel {
        user_id: Set(user_id.to_owned()),
        wallet: Set(0),
        bank: Set(0),
    };

    Account::insert(row)
        .on_conflict(
            OnConflict::column(account::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Reads balances of an account that is known to exist.
pub(crate) async fn fetch_balances<C>(db: &C, user_id: &str) -> Result<Balances>
where
    C: ConnectionTrait,
{
    Account::find_by_id(user_id.to_owned())
        .one(db)
        .await?
        .map(Balances::from)
        .ok_or_else(|| Error::Database(format!("account {user_id} missing after creation")))
}

/// Adds `delta` to the wallet with a single `wallet = wallet + delta` statement.
/// No floor is applied.
pub(crate) async fn credit_wallet<C>(db: &C, user_id: &str, delta: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Account::update_many()
        .col_expr(
            account::Column::Wallet,
            Expr::col(account::Column::Wallet).add(delta),
        )
        .filter(account::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Removes `amount` from the wallet only if the wallet covers it.
pub(crate) async fn debit_wallet<C>(db: &C, user_id: &str, amount: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Account::update_many()
        .col_expr(
            account::Column::Wallet,
            Expr::col(account::Column::Wallet).sub(amount),
        )
        .filter(account::Column::UserId.eq(user_id))
        .filter(account::Column::Wallet.gte(amount))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let current = fetch_balances(db, user_id).await?;
        return Err(Error::InsufficientFunds {
            available: current.wallet,
            required: amount,
        });
    }
    Ok(())
}

fn require_positive(amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Returns the user's balances, creating the account on first use.
pub async fn get_balances(db: &DatabaseConnection, user_id: &str) -> Result<Balances> {
    ensure_account(db, user_id).await?;
    fetch_balances(db, user_id).await
}

/// Adds a signed amount to a wallet (admin grants and fines).
///
/// The wallet may go negative when `delta` is negative.
pub async fn adjust_wallet(db: &DatabaseConnection, user_id: &str, delta: i64) -> Result<Balances> {
    let txn = db.begin().await?;

    ensure_account(&txn, user_id).await?;
    credit_wallet(&txn, user_id, delta).await?;
    let balances = fetch_balances(&txn, user_id).await?;

    txn.commit().await?;

    debug!(user_id, delta, wallet = balances.wallet, "Adjusted wallet");
    Ok(balances)
}

/// Moves `amount` from one wallet to another.
///
/// Debit and credit commit together. On any failure neither balance changes.
///
/// # Errors
/// - [`Error::InvalidAmount`] if `amount <= 0`
/// - [`Error::InvalidInput`] if sender and recipient are the same user
/// - [`Error::InsufficientFunds`] if the sender's wallet is below `amount`
pub async fn transfer(
    db: &DatabaseConnection,
    from_user: &str,
    to_user: &str,
    amount: i64,
) -> Result<TransferReceipt> {
    require_positive(amount)?;
    if from_user == to_user {
        return Err(Error::invalid_input("Cannot transfer to yourself"));
    }

    let txn = db.begin().await?;

    ensure_account(&txn, from_user).await?;
    ensure_account(&txn, to_user).await?;
    debit_wallet(&txn, from_user, amount).await?;
    credit_wallet(&txn, to_user, amount).await?;

    let receipt = TransferReceipt {
        from: fetch_balances(&txn, from_user).await?,
        to: fetch_balances(&txn, to_user).await?,
    };

    txn.commit().await?;

    info!(from_user, to_user, amount, "Transfer completed");
    Ok(receipt)
}

/// Moves `amount` from the wallet into the bank.
pub async fn deposit(db: &DatabaseConnection, user_id: &str, amount: i64) -> Result<Balances> {
    require_positive(amount)?;

    let txn = db.begin().await?;
    ensure_account(&txn, user_id).await?;

    let result = Account::update_many()
        .col_expr(
            account::Column::Wallet,
            Expr::col(account::Column::Wallet).sub(amount),
        )
        .col_expr(
            account::Column::Bank,
            Expr::col(account::Column::Bank).add(amount),
        )
        .filter(account::Column::UserId.eq(user_id))
        .filter(account::Column::Wallet.gte(amount))
        .exec(&txn)
        .await?;

    let balances = fetch_balances(&txn, user_id).await?;
    if result.rows_affected == 0 {
        return Err(Error::InsufficientFunds {
            available: balances.wallet,
            required: amount,
        });
    }

    txn.commit().await?;
    Ok(balances)
}

/// Moves `amount` from the bank back into the wallet.
pub async fn withdraw(db: &DatabaseConnection, user_id: &str, amount: i64) -> Result<Balances> {
    require_positive(amount)?;

    let txn = db.begin().await?;
    ensure_account(&txn, user_id).await?;

    let result = Account::update_many()
        .col_expr(
            account::Column::Bank,
            Expr::col(account::Column::Bank).sub(amount),
        )
        .col_expr(
            account::Column::Wallet,
            Expr::col(account::Column::Wallet).add(amount),
        )
        .filter(account::Column::UserId.eq(user_id))
        .filter(account::Column::Bank.gte(amount))
        .exec(&txn)
        .await?;

    let balances = fetch_balances(&txn, user_id).await?;
    if result.rows_affected == 0 {
        return Err(Error::InsufficientFunds {
            available: balances.bank,
            required: amount,
        });
    }

    txn.commit().await?;
    Ok(balances)
}

/// Attempts to rob `target_id`, flipping a fair coin with `rng`.
///
/// See [`rob_with`] for the rules.
pub async fn rob<R>(
    db: &DatabaseConnection,
    robber_id: &str,
    target_id: &str,
    rng: &mut R,
) -> Result<RobOutcome>
where
    R: Rng + ?Sized,
{
    rob_with(db, robber_id, target_id, || rng.gen_bool(ROB_SUCCESS_CHANCE)).await
}

/// Robbery with an explicit coin.
///
/// An empty (or negative) target wallet ends the attempt with
/// [`RobResult::NothingToSteal`] before the coin is flipped. Otherwise a
/// successful flip moves `min(target_wallet, ROB_MAX_STEAL)` to the robber, and
/// a failed one moves [`ROB_PENALTY`] from the robber to the target. The
/// penalty has no floor, so the robber can end up negative.
pub async fn rob_with<F>(
    db: &DatabaseConnection,
    robber_id: &str,
    target_id: &str,
    coin: F,
) -> Result<RobOutcome>
where
    F: FnOnce() -> bool,
{
    if robber_id == target_id {
        return Err(Error::invalid_input("Cannot rob yourself"));
    }

    let txn = db.begin().await?;

    ensure_account(&txn, robber_id).await?;
    ensure_account(&txn, target_id).await?;

    let target_wallet = fetch_balances(&txn, target_id).await?.wallet;
    let result = if target_wallet <= 0 {
        RobResult::NothingToSteal
    } else if coin() {
        let amount = target_wallet.min(ROB_MAX_STEAL);
        credit_wallet(&txn, target_id, -amount).await?;
        credit_wallet(&txn, robber_id, amount).await?;
        RobResult::Stolen { amount }
    } else {
        credit_wallet(&txn, robber_id, -ROB_PENALTY).await?;
        credit_wallet(&txn, target_id, ROB_PENALTY).await?;
        RobResult::Caught {
            penalty: ROB_PENALTY,
        }
    };

    let outcome = RobOutcome {
        result,
        robber: fetch_balances(&txn, robber_id).await?,
        target: fetch_balances(&txn, target_id).await?,
    };

    txn.commit().await?;

    info!(robber_id, target_id, result = ?outcome.result, "Robbery resolved");
    Ok(outcome)
}

/// Richest accounts by wallet plus bank, richest first.
pub async fn leaderboard(db: &DatabaseConnection, limit: u64) -> Result<Vec<account::Model>> {
    Account::find()
        .order_by_desc(Expr::col(account::Column::Wallet).add(Expr::col(account::Column::Bank)))
        .order_by_asc(account::Column::UserId)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[tokio::test]
    async fn test_amount_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = transfer(&db, "a", "b", 0).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: 0 })));

        let result = deposit(&db, "a", -5).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -5 })));

        let result = withdraw(&db, "a", 0).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: 0 })));

        // Rejected before any account is created
        assert!(leaderboard(&db, 10).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_balances_creates_account_lazily() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(Account::find_by_id("new_user").one(&db).await?.is_none());
        let balances = get_balances(&db, "new_user").await?;
        assert_eq!(balances, Balances::default());

        // A second lookup must not trip over the existing row
        let again = get_balances(&db, "new_user").await?;
        assert_eq!(again, Balances::default());
        assert_eq!(Account::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_moves_exact_amount_and_conserves_total() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "alice", 300).await?;
        fund_wallet(&db, "bob", 20).await?;

        let receipt = transfer(&db, "alice", "bob", 120).await?;
        assert_eq!(receipt.from.wallet, 180);
        assert_eq!(receipt.to.wallet, 140);
        assert_eq!(receipt.from.wallet + receipt.to.wallet, 320);

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds_changes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "alice", 50).await?;

        let result = transfer(&db, "alice", "bob", 51).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientFunds {
                available: 50,
                required: 51
            })
        ));

        assert_eq!(get_balances(&db, "alice").await?.wallet, 50);
        assert_eq!(get_balances(&db, "bob").await?.wallet, 0);

        let result = transfer(&db, "alice", "bob", -10).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -10 })));
        assert_eq!(get_balances(&db, "alice").await?.wallet, 50);

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_to_self_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "alice", 50).await?;

        let result = transfer(&db, "alice", "alice", 10).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_then_withdraw_round_trips() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "alice", 200).await?;
        let before = get_balances(&db, "alice").await?;

        let after_deposit = deposit(&db, "alice", 75).await?;
        assert_eq!(after_deposit, Balances { wallet: 125, bank: 75 });

        let after_withdraw = withdraw(&db, "alice", 75).await?;
        assert_eq!(after_withdraw, before);

        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_and_withdraw_check_the_right_balance() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "alice", 10).await?;

        let result = deposit(&db, "alice", 11).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientFunds {
                available: 10,
                required: 11
            })
        ));

        deposit(&db, "alice", 10).await?;
        let result = withdraw(&db, "alice", 11).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientFunds {
                available: 10,
                required: 11
            })
        ));
        assert_eq!(get_balances(&db, "alice").await?, Balances { wallet: 0, bank: 10 });

        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_wallet_allows_negative() -> Result<()> {
        let db = setup_test_db().await?;

        let balances = adjust_wallet(&db, "alice", -30).await?;
        assert_eq!(balances.wallet, -30);

        Ok(())
    }

    #[tokio::test]
    async fn test_rob_empty_target_mutates_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "robber", 40).await?;

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = rob(&db, "robber", "target", &mut rng).await?;

        assert!(!outcome.success());
        assert_eq!(outcome.result, RobResult::NothingToSteal);
        assert_eq!(get_balances(&db, "robber").await?.wallet, 40);
        assert_eq!(get_balances(&db, "target").await?.wallet, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_rob_success_takes_at_most_cap() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "target", 250).await?;

        let outcome = rob_with(&db, "robber", "target", || true).await?;
        assert!(outcome.success());
        assert_eq!(outcome.result, RobResult::Stolen { amount: 100 });
        assert_eq!(outcome.robber.wallet, 100);
        assert_eq!(outcome.target.wallet, 150);

        Ok(())
    }

    #[tokio::test]
    async fn test_rob_success_takes_whole_small_wallet() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "target", 30).await?;

        let outcome = rob_with(&db, "robber", "target", || true).await?;
        assert_eq!(outcome.result, RobResult::Stolen { amount: 30 });
        assert_eq!(outcome.target.wallet, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_rob_failure_pays_penalty_even_into_negative() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "target", 30).await?;
        fund_wallet(&db, "robber", 10).await?;

        let outcome = rob_with(&db, "robber", "target", || false).await?;
        assert!(outcome.success());
        assert_eq!(outcome.result, RobResult::Caught { penalty: 50 });
        assert_eq!(outcome.robber.wallet, -40);
        assert_eq!(outcome.target.wallet, 80);

        Ok(())
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_total() -> Result<()> {
        let db = setup_test_db().await?;
        fund_wallet(&db, "poor", 5).await?;
        fund_wallet(&db, "rich", 100).await?;
        fund_wallet(&db, "saver", 60).await?;
        deposit(&db, "saver", 60).await?;
        fund_wallet(&db, "saver", 50).await?;

        let board = leaderboard(&db, 2).await?;
        let ids: Vec<_> = board.iter().map(|a| a.user_id.as_str()).collect();
        assert_eq!(ids, ["saver", "rich"]);

        Ok(())
    }
}
