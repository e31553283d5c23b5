//! Job business logic - Job definitions, random assignment and completion.
//!
//! Job IDs are renumbered to `1..=count` every time a job is added so that
//! admins can refer to jobs by small, gap-free numbers. The renumbering runs in
//! the same transaction as the insert; assignments follow through the
//! cascading foreign key on `job_assignees.job_id`.

use crate::{
    core::ledger,
    entities::{Job, JobAssignee, job, job_assignee},
    errors::{Error, Result},
};
use rand::{Rng, seq::SliceRandom};
use sea_orm::{
    JoinType, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use tracing::{debug, info};

/// A job together with the users currently holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub job: job::Model,
    /// Discord user IDs, in assignment-table order
    pub assignees: Vec<String>,
}

/// Result of [`complete_job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedWork {
    /// Jobs the user was released from
    pub jobs: Vec<job::Model>,
    /// Amount credited
    pub reward: i64,
    /// Wallet after the credit
    pub wallet: i64,
}

/// Renumbers all jobs to `1..=count` ordered by their current ID.
///
/// Returns `(old_id, new_id)` pairs for every job, in order. Walking the IDs in
/// ascending order guarantees each target ID is already free when it is
/// written.
async fn renumber_jobs<C>(db: &C) -> Result<Vec<(i64, i64)>>
where
    C: ConnectionTrait,
{
    let ids: Vec<i64> = Job::find()
        .select_only()
        .column(job::Column::Id)
        .order_by_asc(job::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    let mut mapping = Vec::with_capacity(ids.len());
    for (new_id, old_id) in (1_i64..).zip(ids) {
        if old_id != new_id {
            Job::update_many()
                .col_expr(job::Column::Id, Expr::value(new_id))
                .filter(job::Column::Id.eq(old_id))
                .exec(db)
                .await?;
            debug!(old_id, new_id, "Renumbered job");
        }
        mapping.push((old_id, new_id));
    }
    Ok(mapping)
}

/// Adds a job and compacts job IDs, returning the job under its final ID.
///
/// # Errors
/// [`Error::InvalidInput`] if the description is blank.
pub async fn add_job(db: &DatabaseConnection, description: &str) -> Result<job::Model> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Error::invalid_input("Job description cannot be empty"));
    }

    let txn = db.begin().await?;

    let inserted = job::ActiveModel {
        description: Set(description.to_owned()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mapping = renumber_jobs(&txn).await?;
    let id = mapping
        .iter()
        .find(|(old_id, _)| *old_id == inserted.id)
        .map_or(inserted.id, |&(_, new_id)| new_id);

    txn.commit().await?;

    info!(job_id = id, "Added job");
    Ok(job::Model {
        id,
        description: inserted.description,
    })
}

/// Lists every job with its assignees, ordered by job ID.
pub async fn list_jobs(db: &DatabaseConnection) -> Result<Vec<JobListing>> {
    let rows = Job::find()
        .order_by_asc(job::Column::Id)
        .find_with_related(JobAssignee)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(job, assignees)| JobListing {
            job,
            assignees: assignees.into_iter().map(|a| a.user_id).collect(),
        })
        .collect())
}

/// Jobs currently held by `user_id`.
pub async fn jobs_for_user<C>(db: &C, user_id: &str) -> Result<Vec<job::Model>>
where
    C: ConnectionTrait,
{
    Job::find()
        .join(JoinType::InnerJoin, job::Relation::Assignees.def())
        .filter(job_assignee::Column::UserId.eq(user_id))
        .order_by_asc(job::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Assigns `user_id` a job chosen uniformly among those they do not hold yet.
///
/// Other users holding a job does not exclude it. Candidate selection and the
/// insert share one transaction.
///
/// # Errors
/// [`Error::NoJobsAvailable`] when there are no jobs, or the user holds all of them.
pub async fn assign_random_job<R>(
    db: &DatabaseConnection,
    user_id: &str,
    rng: &mut R,
) -> Result<job::Model>
where
    R: Rng + ?Sized,
{
    let txn = db.begin().await?;

    let held: Vec<i64> = JobAssignee::find()
        .select_only()
        .column(job_assignee::Column::JobId)
        .filter(job_assignee::Column::UserId.eq(user_id))
        .into_tuple()
        .all(&txn)
        .await?;

    let candidates = Job::find()
        .filter(job::Column::Id.is_not_in(held))
        .order_by_asc(job::Column::Id)
        .all(&txn)
        .await?;

    let job = candidates
        .choose(rng)
        .cloned()
        .ok_or(Error::NoJobsAvailable)?;

    job_assignee::ActiveModel {
        job_id: Set(job.id),
        user_id: Set(user_id.to_owned()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(user_id, job_id = job.id, "Assigned job");
    Ok(job)
}

/// Releases `user_id` from their job(s) and pays `reward` into their wallet.
///
/// # Errors
/// - [`Error::InvalidAmount`] if `reward <= 0`
/// - [`Error::NotAssigned`] if the user holds no job; the wallet is untouched
pub async fn complete_job(
    db: &DatabaseConnection,
    user_id: &str,
    reward: i64,
) -> Result<CompletedWork> {
    if reward <= 0 {
        return Err(Error::InvalidAmount { amount: reward });
    }

    let txn = db.begin().await?;

    let jobs = jobs_for_user(&txn, user_id).await?;
    if jobs.is_empty() {
        return Err(Error::NotAssigned {
            user_id: user_id.to_owned(),
        });
    }

    JobAssignee::delete_many()
        .filter(job_assignee::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    ledger::ensure_account(&txn, user_id).await?;
    ledger::credit_wallet(&txn, user_id, reward).await?;
    let wallet = ledger::fetch_balances(&txn, user_id).await?.wallet;

    txn.commit().await?;

    info!(user_id, reward, "Completed job");
    Ok(CompletedWork {
        jobs,
        reward,
        wallet,
    })
}
