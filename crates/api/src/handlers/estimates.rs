//! Handlers for estimates and the approval workflow.
//!
//! Approve and reject are manager-only and transactional: the status
//! transition and the measurement lock stamp commit together or not at
//! all. The approve status change is a conditional write, so two racing
//! approvals cannot both succeed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foamline_core::error::CoreError;
use foamline_core::estimate::{
    check_approve, check_editable, check_reject, check_submit, validate_markup, EstimateStatus,
};
use foamline_core::types::DbId;
use foamline_db::models::estimate::{Estimate, UpdateMarkup};
use foamline_db::repositories::{EstimateRepo, JobRepo, MeasurementRepo};

use crate::engine::recalc;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_estimate(state: &AppState, id: DbId) -> AppResult<Estimate> {
    EstimateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Estimate",
                id,
            })
        })
}

/// Decode the stored status id, surfacing a data bug instead of panicking.
fn status_of(estimate: &Estimate) -> AppResult<EstimateStatus> {
    estimate.status().ok_or_else(|| {
        AppError::Core(CoreError::Internal(format!(
            "estimate {} has unknown status id {}",
            estimate.id, estimate.status_id
        )))
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /jobs/{job_id}/estimates
///
/// Create a draft estimate for a job and aggregate its totals from the
/// job's current measurements.
pub async fn create_estimate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    let sequence = EstimateRepo::next_sequence(&state.pool, job_id).await?;
    let estimate_number = format!("EST-{job_id}-{sequence:02}");

    let estimate =
        EstimateRepo::create(&state.pool, job_id, auth.user_id, &estimate_number).await?;
    let estimate = recalc::recalculate_estimate(&state.pool, &estimate).await?;

    tracing::info!(
        user_id = auth.user_id,
        job_id,
        estimate_id = estimate.id,
        estimate_number = %estimate.estimate_number,
        subtotal = estimate.subtotal,
        "Estimate created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: estimate })))
}

/// GET /estimates/{id}
///
/// Get a single estimate by ID.
pub async fn get_estimate(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let estimate = find_estimate(&state, id).await?;
    Ok(Json(DataResponse { data: estimate }))
}

/// GET /jobs/{job_id}/estimates
///
/// List all estimates for a job, newest first.
pub async fn list_estimates(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    let estimates = EstimateRepo::list_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: estimates }))
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// POST /estimates/{id}/recalculate
///
/// Re-aggregate subtotal/total from the job's current measurements.
/// Pending or approved estimates can only be recalculated by a manager.
pub async fn recalculate_estimate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let estimate = find_estimate(&state, id).await?;
    check_editable(status_of(&estimate)?, &auth.role)?;

    let estimate = recalc::recalculate_estimate(&state.pool, &estimate).await?;
    Ok(Json(DataResponse { data: estimate }))
}

/// PUT /estimates/{id}/markup
///
/// Update the stored markup percentage and re-aggregate. Gated like any
/// other estimate edit.
pub async fn update_markup(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMarkup>,
) -> AppResult<impl IntoResponse> {
    let estimate = find_estimate(&state, id).await?;
    check_editable(status_of(&estimate)?, &auth.role)?;
    validate_markup(input.markup_percent)?;

    let estimate = EstimateRepo::set_markup(&state.pool, id, input.markup_percent)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Estimate",
                id,
            })
        })?;
    let estimate = recalc::recalculate_estimate(&state.pool, &estimate).await?;

    tracing::info!(
        user_id = auth.user_id,
        estimate_id = id,
        markup_percent = input.markup_percent,
        "Estimate markup updated"
    );

    Ok(Json(DataResponse { data: estimate }))
}

// ---------------------------------------------------------------------------
// Workflow transitions
// ---------------------------------------------------------------------------

/// POST /estimates/{id}/submit
///
/// Send a draft estimate for review (draft -> pending_approval).
pub async fn submit_estimate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let estimate = find_estimate(&state, id).await?;
    check_submit(status_of(&estimate)?)?;

    // Conditional write: only a draft row transitions, so a concurrent
    // submit/approve cannot double-fire.
    let estimate = EstimateRepo::submit(&state.pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Estimate is no longer a draft".into(),
        ))
    })?;

    tracing::info!(
        user_id = auth.user_id,
        estimate_id = id,
        "Estimate submitted for approval"
    );

    Ok(Json(DataResponse { data: estimate }))
}

/// POST /estimates/{id}/approve
///
/// Approve an estimate (manager only). Locks every measurement of the
/// job under this estimate; status write and lock stamp commit together.
pub async fn approve_estimate(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let estimate = find_estimate(&state, id).await?;
    check_approve(status_of(&estimate)?)?;

    let mut tx = state.pool.begin().await?;
    let approved = EstimateRepo::approve(&mut *tx, id, user.user_id)
        .await?
        .ok_or_else(|| {
            // Lost the race against a concurrent approval.
            AppError::Core(CoreError::Conflict("Estimate is already approved".into()))
        })?;
    let locked = MeasurementRepo::lock_all_for_job(&mut *tx, approved.job_id, approved.id).await?;
    // A job has at most one lock-holding estimate; a previously approved
    // estimate hands the lock over to this one.
    EstimateRepo::release_lock_flags_for_job(&mut *tx, approved.job_id, approved.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = user.user_id,
        estimate_id = id,
        job_id = approved.job_id,
        locked_measurements = locked,
        "Estimate approved; measurements locked"
    );

    Ok(Json(DataResponse { data: approved }))
}

/// POST /estimates/{id}/reject
///
/// Reject an estimate (manager only). Releases only the measurement
/// locks this estimate holds; locks held by other estimates are left
/// untouched.
pub async fn reject_estimate(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let estimate = find_estimate(&state, id).await?;
    check_reject(status_of(&estimate)?)?;

    let mut tx = state.pool.begin().await?;
    let rejected = EstimateRepo::reject(&mut *tx, id, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Estimate",
                id,
            })
        })?;
    let unlocked = MeasurementRepo::unlock_for_estimate(&mut *tx, rejected.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = user.user_id,
        estimate_id = id,
        job_id = estimate.job_id,
        unlocked_measurements = unlocked,
        "Estimate rejected; measurement locks released"
    );

    Ok(Json(DataResponse { data: rejected }))
}
