//! Estimate recalculation engine.
//!
//! The only place pricing totals are derived: reads the job's
//! measurements and the rate catalog, prices every line through
//! `foamline_core::pricing`, and persists line snapshots plus estimate
//! totals in one transaction. UI layers never recompute independently.

use foamline_core::error::CoreError;
use foamline_core::estimate::{subtotal_of, total_with_markup};
use foamline_core::insulation::r_value_label;
use foamline_core::measurement::system_from_fields;
use foamline_core::pricing::{price_line, LinePrice, LineSpec};
use foamline_core::rates::RateTable;
use foamline_core::types::DbId;
use foamline_db::models::estimate::Estimate;
use foamline_db::models::measurement::{Measurement, RepricedLine};
use foamline_db::models::rate::build_rate_table;
use foamline_db::repositories::{EstimateRepo, JobRepo, MeasurementRepo, RateRepo};
use foamline_db::DbPool;

use crate::error::AppResult;

/// Load the current rate-table snapshot from the catalog (falling back to
/// the built-in defaults when the catalog is empty).
pub async fn load_rate_table(pool: &DbPool) -> AppResult<RateTable> {
    let rows = RateRepo::list_all(pool).await?;
    Ok(build_rate_table(&rows))
}

/// Price one stored measurement row against a rate snapshot.
pub fn price_measurement(rates: &RateTable, row: &Measurement) -> Result<LinePrice, CoreError> {
    let system = system_from_fields(
        &row.insulation_type,
        row.thickness_in,
        row.closed_cell_in,
        row.open_cell_in,
    )?;
    Ok(price_line(
        rates,
        &LineSpec {
            area_sqft: row.area_sqft,
            system,
            override_unit_price: row.price_override,
        },
    ))
}

/// Price every measurement of a job, returning the per-line snapshot
/// writes and the rounded subtotal.
async fn priced_lines(pool: &DbPool, job_id: DbId) -> AppResult<(Vec<RepricedLine>, f64)> {
    let rows = MeasurementRepo::list_priceable_for_job(pool, job_id).await?;
    let rates = load_rate_table(pool).await?;

    let mut lines = Vec::with_capacity(rows.len());
    let mut line_costs = Vec::with_capacity(rows.len());

    for row in &rows {
        let priced = price_measurement(&rates, row)?;
        if priced.unit_price == 0.0 && !priced.overridden {
            // Preserved source behavior: a bracket miss prices at zero
            // instead of failing. Logged so the hole is visible.
            tracing::warn!(
                measurement_id = row.id,
                job_id,
                insulation_type = %row.insulation_type,
                r_value = priced.r_value,
                "No rate bracket matched; line priced at zero"
            );
        }
        line_costs.push(priced.line_cost);
        lines.push(RepricedLine {
            id: row.id,
            unit_price: priced.unit_price,
            line_cost: priced.line_cost,
            r_value: r_value_label(priced.r_value),
        });
    }

    Ok((lines, subtotal_of(&line_costs)))
}

/// Reprice a job after a measurement change: refresh every line snapshot
/// and the totals of every estimate still tracking the measurement set
/// (approved estimates keep their frozen totals).
///
/// All writes happen in one transaction; a failure leaves prior snapshots
/// and totals untouched.
pub async fn reprice_job(pool: &DbPool, job_id: DbId) -> AppResult<()> {
    let (lines, subtotal) = priced_lines(pool, job_id).await?;
    let estimates = EstimateRepo::list_open_for_job(pool, job_id).await?;

    let mut tx = pool.begin().await?;
    MeasurementRepo::reprice_all(&mut *tx, &lines).await?;
    for estimate in &estimates {
        let total = total_with_markup(subtotal, estimate.markup_percent);
        EstimateRepo::update_totals(&mut *tx, estimate.id, subtotal, total).await?;
    }
    tx.commit().await?;

    tracing::debug!(
        job_id,
        measurement_count = lines.len(),
        estimate_count = estimates.len(),
        subtotal,
        "Job repriced"
    );
    Ok(())
}

/// Recompute one estimate's totals (and the job's line snapshots).
///
/// Fails with an aggregation error, leaving stored totals untouched, when
/// the estimate's job cannot be resolved.
pub async fn recalculate_estimate(pool: &DbPool, estimate: &Estimate) -> AppResult<Estimate> {
    if JobRepo::find_by_id(pool, estimate.job_id).await?.is_none() {
        return Err(CoreError::Aggregation(format!(
            "could not locate job {} for estimate {}",
            estimate.job_id, estimate.id
        ))
        .into());
    }

    let (lines, subtotal) = priced_lines(pool, estimate.job_id).await?;
    let total = total_with_markup(subtotal, estimate.markup_percent);

    let mut tx = pool.begin().await?;
    MeasurementRepo::reprice_all(&mut *tx, &lines).await?;
    EstimateRepo::update_totals(&mut *tx, estimate.id, subtotal, total).await?;
    tx.commit().await?;

    tracing::info!(
        estimate_id = estimate.id,
        job_id = estimate.job_id,
        subtotal,
        total,
        "Estimate totals recalculated"
    );

    EstimateRepo::find_by_id(pool, estimate.id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Estimate",
                id: estimate.id,
            }
            .into()
        })
}
