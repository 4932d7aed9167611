//! Handlers for field measurements.
//!
//! Every mutation consults the lock guard first, then validates through
//! `foamline_core::measurement`, prices the line, persists, and reprices
//! the job's open estimates. The stored pricing snapshot is never written
//! from anywhere else.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foamline_core::error::CoreError;
use foamline_core::insulation::{r_value_label, FramingSize};
use foamline_core::measurement::{
    system_from_fields, validate_dimensions, validate_override, validate_room_name,
    validate_surface_type, validate_system,
};
use foamline_core::pricing::{price_line, LineSpec};
use foamline_core::types::DbId;
use foamline_db::models::job::Job;
use foamline_db::models::measurement::{
    CreateMeasurement, Measurement, MeasurementRecord, SetPriceOverride, UpdateMeasurement,
};
use foamline_db::repositories::{JobRepo, MeasurementRepo};

use crate::engine::recalc;
use crate::error::{AppError, AppResult};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared validation + pricing
// ---------------------------------------------------------------------------

/// Validate survey fields and produce the fully-priced record to persist.
async fn build_record(
    state: &AppState,
    job: &Job,
    room_name: String,
    surface_type: String,
    height_ft: f64,
    width_ft: f64,
    insulation_type: String,
    thickness_in: Option<f64>,
    closed_cell_in: Option<f64>,
    open_cell_in: Option<f64>,
    price_override: Option<f64>,
) -> AppResult<MeasurementRecord> {
    validate_room_name(&room_name)?;
    validate_surface_type(&surface_type)?;
    let area_sqft = validate_dimensions(height_ft, width_ft)?;

    let framing = FramingSize::parse(&job.framing_size)?;
    let system = system_from_fields(
        &insulation_type,
        thickness_in,
        closed_cell_in,
        open_cell_in,
    )?;
    validate_system(system, framing)?;

    let rates = recalc::load_rate_table(&state.pool).await?;
    let priced = price_line(
        &rates,
        &LineSpec {
            area_sqft,
            system,
            override_unit_price: price_override,
        },
    );

    Ok(MeasurementRecord {
        room_name,
        surface_type,
        height_ft,
        width_ft,
        area_sqft,
        insulation_type,
        thickness_in,
        closed_cell_in,
        open_cell_in,
        r_value: r_value_label(priced.r_value),
        unit_price: priced.unit_price,
        line_cost: priced.line_cost,
    })
}

async fn find_job(state: &AppState, job_id: DbId) -> AppResult<Job> {
    JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Job",
                id: job_id,
            })
        })
}

async fn find_measurement(state: &AppState, id: DbId) -> AppResult<Measurement> {
    MeasurementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Measurement",
                id,
            })
        })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /jobs/{job_id}/measurements
///
/// List all measurements for a job in survey-entry order.
pub async fn list_measurements(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_job(&state, job_id).await?;
    let measurements = MeasurementRepo::list_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: measurements }))
}

/// POST /jobs/{job_id}/measurements
///
/// Enter a new field measurement. Denied while the job's measurements are
/// locked, unless the caller is a manager.
pub async fn create_measurement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<CreateMeasurement>,
) -> AppResult<impl IntoResponse> {
    let job = find_job(&state, job_id).await?;
    guard::ensure_job_mutable(&state.pool, job_id, &auth).await?;

    let record = build_record(
        &state,
        &job,
        input.room_name,
        input.surface_type,
        input.height_ft,
        input.width_ft,
        input.insulation_type,
        input.thickness_in,
        input.closed_cell_in,
        input.open_cell_in,
        None,
    )
    .await?;

    let measurement = MeasurementRepo::create(&state.pool, job_id, &record).await?;
    recalc::reprice_job(&state.pool, job_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        job_id,
        measurement_id = measurement.id,
        insulation_type = %measurement.insulation_type,
        area_sqft = measurement.area_sqft,
        "Measurement created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: measurement })))
}

/// PUT /measurements/{id}
///
/// Edit a measurement's survey fields. Absent fields keep their stored
/// value. Denied while locked, unless the caller is a manager.
pub async fn update_measurement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMeasurement>,
) -> AppResult<impl IntoResponse> {
    let existing = find_measurement(&state, id).await?;
    let job = find_job(&state, existing.job_id).await?;
    guard::ensure_job_mutable(&state.pool, existing.job_id, &auth).await?;

    // Patch semantics: fall back to the stored value per field. When the
    // insulation type changes, depth fields not supplied fall back too --
    // system_from_fields picks out the ones that matter.
    let record = build_record(
        &state,
        &job,
        input.room_name.unwrap_or(existing.room_name),
        input.surface_type.unwrap_or(existing.surface_type),
        input.height_ft.unwrap_or(existing.height_ft),
        input.width_ft.unwrap_or(existing.width_ft),
        input.insulation_type.unwrap_or(existing.insulation_type),
        input.thickness_in.or(existing.thickness_in),
        input.closed_cell_in.or(existing.closed_cell_in),
        input.open_cell_in.or(existing.open_cell_in),
        existing.price_override,
    )
    .await?;

    let measurement = MeasurementRepo::update(&state.pool, id, &record)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Measurement",
                id,
            })
        })?;
    recalc::reprice_job(&state.pool, measurement.job_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        measurement_id = id,
        job_id = measurement.job_id,
        "Measurement updated"
    );

    Ok(Json(DataResponse { data: measurement }))
}

/// PUT /measurements/{id}/price-override
///
/// Set or clear the manual unit-price override (manager only). The
/// override always wins over the rate table until cleared.
pub async fn set_price_override(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetPriceOverride>,
) -> AppResult<impl IntoResponse> {
    let existing = find_measurement(&state, id).await?;

    if let Some(price) = input.price_override {
        validate_override(price)?;
    }

    MeasurementRepo::set_price_override(&state.pool, id, input.price_override)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Measurement",
                id,
            })
        })?;
    recalc::reprice_job(&state.pool, existing.job_id).await?;

    // Re-read so the response carries the repriced snapshot.
    let measurement = find_measurement(&state, id).await?;

    tracing::info!(
        user_id = user.user_id,
        measurement_id = id,
        job_id = measurement.job_id,
        price_override = ?input.price_override,
        "Measurement price override set"
    );

    Ok(Json(DataResponse { data: measurement }))
}

/// DELETE /measurements/{id}
///
/// Remove a measurement. Locked measurements back an approved estimate
/// and cannot be deleted by anyone until that estimate is rejected.
pub async fn delete_measurement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = find_measurement(&state, id).await?;
    guard::ensure_job_mutable(&state.pool, existing.job_id, &auth).await?;
    guard::ensure_deletable(existing.locked_by_estimate_id)?;

    MeasurementRepo::delete(&state.pool, id).await?;
    recalc::reprice_job(&state.pool, existing.job_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        measurement_id = id,
        job_id = existing.job_id,
        "Measurement deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
