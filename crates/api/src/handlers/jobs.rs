//! Handlers for job CRUD.
//!
//! Jobs are thin scaffolding around the pricing core: the framing size
//! recorded here fixes the cavity depth that hybrid measurements are
//! validated against.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foamline_core::error::CoreError;
use foamline_core::insulation::FramingSize;
use foamline_core::types::DbId;
use foamline_db::models::job::CreateJob;
use foamline_db::repositories::JobRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 50;

/// Pagination query parameters.
#[derive(Debug, serde::Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /jobs
///
/// Create a new job.
pub async fn create_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<impl IntoResponse> {
    if input.customer_name.trim().is_empty() {
        return Err(AppError::BadRequest("customer_name must not be empty".into()));
    }
    FramingSize::parse(&input.framing_size)?;

    let job = JobRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        job_id = job.id,
        framing_size = %job.framing_size,
        "Job created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /jobs?limit=&offset=
///
/// List jobs, newest first.
pub async fn list_jobs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let jobs = JobRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /jobs/{job_id}
///
/// Get a single job by ID.
pub async fn get_job(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    Ok(Json(DataResponse { data: job }))
}
