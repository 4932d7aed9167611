//! Repository for the `measurements` table.
//!
//! Lock stamping and bulk repricing take `&mut PgConnection` so the
//! approval and recalculation flows can run them inside one transaction
//! with the estimate-side writes (all-or-nothing).

use foamline_core::types::DbId;
use sqlx::{PgConnection, PgPool, QueryBuilder};

use crate::models::measurement::{Measurement, MeasurementRecord, RepricedLine};

/// Column list for `measurements` queries.
const COLUMNS: &str = "\
    id, job_id, room_name, surface_type, height_ft, width_ft, area_sqft, \
    insulation_type, thickness_in, closed_cell_in, open_cell_in, r_value, \
    unit_price, line_cost, price_override, price_override_at, \
    is_locked, locked_by_estimate_id, locked_at, created_at, updated_at";

/// Provides CRUD and lock operations for measurements.
pub struct MeasurementRepo;

impl MeasurementRepo {
    /// Insert a validated, priced measurement, returning the created row.
    pub async fn create(
        pool: &PgPool,
        job_id: DbId,
        record: &MeasurementRecord,
    ) -> Result<Measurement, sqlx::Error> {
        let query = format!(
            "INSERT INTO measurements
                (job_id, room_name, surface_type, height_ft, width_ft, area_sqft,
                 insulation_type, thickness_in, closed_cell_in, open_cell_in,
                 r_value, unit_price, line_cost)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(job_id)
            .bind(&record.room_name)
            .bind(&record.surface_type)
            .bind(record.height_ft)
            .bind(record.width_ft)
            .bind(record.area_sqft)
            .bind(&record.insulation_type)
            .bind(record.thickness_in)
            .bind(record.closed_cell_in)
            .bind(record.open_cell_in)
            .bind(&record.r_value)
            .bind(record.unit_price)
            .bind(record.line_cost)
            .fetch_one(pool)
            .await
    }

    /// Replace the survey fields and pricing snapshot of a measurement.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        record: &MeasurementRecord,
    ) -> Result<Option<Measurement>, sqlx::Error> {
        let query = format!(
            "UPDATE measurements SET
                room_name = $2, surface_type = $3, height_ft = $4, width_ft = $5,
                area_sqft = $6, insulation_type = $7, thickness_in = $8,
                closed_cell_in = $9, open_cell_in = $10, r_value = $11,
                unit_price = $12, line_cost = $13, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(id)
            .bind(&record.room_name)
            .bind(&record.surface_type)
            .bind(record.height_ft)
            .bind(record.width_ft)
            .bind(record.area_sqft)
            .bind(&record.insulation_type)
            .bind(record.thickness_in)
            .bind(record.closed_cell_in)
            .bind(record.open_cell_in)
            .bind(&record.r_value)
            .bind(record.unit_price)
            .bind(record.line_cost)
            .fetch_optional(pool)
            .await
    }

    /// Find a measurement by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Measurement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM measurements WHERE id = $1");
        sqlx::query_as::<_, Measurement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all measurements for a job, oldest first (survey entry order).
    pub async fn list_for_job(pool: &PgPool, job_id: DbId) -> Result<Vec<Measurement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM measurements WHERE job_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// List the priceable measurements for a job (positive area).
    pub async fn list_priceable_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<Measurement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM measurements
             WHERE job_id = $1 AND area_sqft > 0
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// Set or clear the manager price override. The pricing snapshot is
    /// refreshed by the recalculation that follows.
    pub async fn set_price_override(
        pool: &PgPool,
        id: DbId,
        price_override: Option<f64>,
    ) -> Result<Option<Measurement>, sqlx::Error> {
        let query = format!(
            "UPDATE measurements SET
                price_override = $2,
                price_override_at = CASE WHEN $2 IS NULL THEN NULL ELSE NOW() END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measurement>(&query)
            .bind(id)
            .bind(price_override)
            .fetch_optional(pool)
            .await
    }

    /// Delete a measurement. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM measurements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The estimate currently holding a lock on this job's measurements,
    /// if any.
    pub async fn find_active_lock(pool: &PgPool, job_id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let locked: Option<(DbId,)> = sqlx::query_as(
            "SELECT locked_by_estimate_id FROM measurements
             WHERE job_id = $1 AND locked_by_estimate_id IS NOT NULL
             LIMIT 1",
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
        Ok(locked.map(|(id,)| id))
    }

    /// Stamp the lock on every measurement of a job. Part of the approval
    /// transaction.
    pub async fn lock_all_for_job(
        conn: &mut PgConnection,
        job_id: DbId,
        estimate_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE measurements
             SET is_locked = TRUE, locked_by_estimate_id = $2, locked_at = NOW(),
                 updated_at = NOW()
             WHERE job_id = $1",
        )
        .bind(job_id)
        .bind(estimate_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear the lock on measurements held by this estimate and no others.
    /// Part of the rejection transaction.
    pub async fn unlock_for_estimate(
        conn: &mut PgConnection,
        estimate_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE measurements
             SET is_locked = FALSE, locked_by_estimate_id = NULL, locked_at = NULL,
                 updated_at = NOW()
             WHERE locked_by_estimate_id = $1",
        )
        .bind(estimate_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Write the pricing snapshot for a batch of lines in one statement.
    /// Part of the recalculation transaction; no per-row round trips.
    pub async fn reprice_all(
        conn: &mut PgConnection,
        lines: &[RepricedLine],
    ) -> Result<(), sqlx::Error> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "UPDATE measurements AS m
             SET unit_price = v.unit_price, line_cost = v.line_cost,
                 r_value = v.r_value, updated_at = NOW()
             FROM (",
        );
        builder.push_values(lines, |mut row, line| {
            row.push_bind(line.id)
                .push_bind(line.unit_price)
                .push_bind(line.line_cost)
                .push_bind(&line.r_value);
        });
        builder.push(") AS v(id, unit_price, line_cost, r_value) WHERE m.id = v.id");

        builder.build().execute(conn).await?;
        Ok(())
    }
}
