//! Repository for the `estimates` table.
//!
//! Status transitions are conditional writes: the approval UPDATE only
//! succeeds while the row is not already approved, so two racing approve
//! calls cannot both win. The loser sees `None` and reports a conflict.

use foamline_core::estimate::EstimateStatus;
use foamline_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::estimate::Estimate;

/// Column list for `estimates` queries.
const COLUMNS: &str = "\
    id, job_id, estimate_number, status_id, subtotal, markup_percent, \
    total_amount, locks_measurements, created_by, approved_by, approved_at, \
    created_at, updated_at";

/// Provides CRUD and transition operations for estimates.
pub struct EstimateRepo;

impl EstimateRepo {
    /// Insert a new draft estimate with zeroed totals.
    pub async fn create(
        pool: &PgPool,
        job_id: DbId,
        user_id: DbId,
        estimate_number: &str,
    ) -> Result<Estimate, sqlx::Error> {
        let query = format!(
            "INSERT INTO estimates (job_id, estimate_number, status_id, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(job_id)
            .bind(estimate_number)
            .bind(EstimateStatus::Draft.id())
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Next per-job sequence number for estimate numbering.
    pub async fn next_sequence(pool: &PgPool, job_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM estimates WHERE job_id = $1")
                .bind(job_id)
                .fetch_one(pool)
                .await?;
        Ok(count + 1)
    }

    /// Find an estimate by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Estimate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM estimates WHERE id = $1");
        sqlx::query_as::<_, Estimate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all estimates for a job, newest first.
    pub async fn list_for_job(pool: &PgPool, job_id: DbId) -> Result<Vec<Estimate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM estimates WHERE job_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// List the estimates of a job whose totals still track measurement
    /// changes (everything except approved; approved totals are frozen).
    pub async fn list_open_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<Estimate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM estimates
             WHERE job_id = $1 AND status_id <> $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(job_id)
            .bind(EstimateStatus::Approved.id())
            .fetch_all(pool)
            .await
    }

    /// Persist recomputed totals. Part of the recalculation transaction.
    pub async fn update_totals(
        conn: &mut PgConnection,
        id: DbId,
        subtotal: f64,
        total_amount: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE estimates
             SET subtotal = $2, total_amount = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(subtotal)
        .bind(total_amount)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Update the stored markup percentage.
    pub async fn set_markup(
        pool: &PgPool,
        id: DbId,
        markup_percent: f64,
    ) -> Result<Option<Estimate>, sqlx::Error> {
        let query = format!(
            "UPDATE estimates SET markup_percent = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(id)
            .bind(markup_percent)
            .fetch_optional(pool)
            .await
    }

    /// Move a draft to pending approval. Conditional on the current
    /// status; `None` means the estimate was not a draft (or is gone).
    pub async fn submit(pool: &PgPool, id: DbId) -> Result<Option<Estimate>, sqlx::Error> {
        let query = format!(
            "UPDATE estimates SET status_id = $2, updated_at = NOW()
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(id)
            .bind(EstimateStatus::PendingApproval.id())
            .bind(EstimateStatus::Draft.id())
            .fetch_optional(pool)
            .await
    }

    /// Approve: conditional on not already being approved, so concurrent
    /// approvals cannot race past the status check. Part of the approval
    /// transaction (the measurement lock stamp follows in the same tx).
    pub async fn approve(
        conn: &mut PgConnection,
        id: DbId,
        approver_id: DbId,
    ) -> Result<Option<Estimate>, sqlx::Error> {
        let query = format!(
            "UPDATE estimates
             SET status_id = $2, approved_by = $3, approved_at = NOW(),
                 locks_measurements = TRUE, updated_at = NOW()
             WHERE id = $1 AND status_id <> $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(id)
            .bind(EstimateStatus::Approved.id())
            .bind(approver_id)
            .fetch_optional(conn)
            .await
    }

    /// Drop the lock-holder flag from every other estimate of the job.
    /// Part of the approval transaction: at most one estimate per job may
    /// hold `locks_measurements` at a time, and the measurements are
    /// restamped to the newly approved estimate in the same transaction.
    pub async fn release_lock_flags_for_job(
        conn: &mut PgConnection,
        job_id: DbId,
        except_estimate_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE estimates
             SET locks_measurements = FALSE, updated_at = NOW()
             WHERE job_id = $1 AND id <> $2 AND locks_measurements = TRUE",
        )
        .bind(job_id)
        .bind(except_estimate_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Reject: allowed from any state. Part of the rejection transaction
    /// (the measurement unlock follows in the same tx).
    pub async fn reject(
        conn: &mut PgConnection,
        id: DbId,
        approver_id: DbId,
    ) -> Result<Option<Estimate>, sqlx::Error> {
        let query = format!(
            "UPDATE estimates
             SET status_id = $2, approved_by = $3, approved_at = NOW(),
                 locks_measurements = FALSE, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(id)
            .bind(EstimateStatus::Rejected.id())
            .bind(approver_id)
            .fetch_optional(conn)
            .await
    }
}
