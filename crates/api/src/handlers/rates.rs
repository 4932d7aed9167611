//! Handler for the rate-table catalog.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use foamline_db::repositories::RateRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /rates
///
/// List the rate catalog: bracket rows per insulation type.
pub async fn list_rates(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rates = RateRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: rates }))
}
