//! Route definitions, one module per resource group.

pub mod estimates;
pub mod health;
pub mod jobs;
pub mod measurements;
pub mod rates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /jobs                                    list, create
/// /jobs/{job_id}                           get
/// /jobs/{job_id}/measurements              list, create
/// /jobs/{job_id}/estimates                 list, create
///
/// /measurements/{id}                       update, delete
/// /measurements/{id}/price-override        set/clear override (manager)
///
/// /estimates/{id}                          get
/// /estimates/{id}/recalculate              re-aggregate totals
/// /estimates/{id}/markup                   update markup percent
/// /estimates/{id}/submit                   draft -> pending_approval
/// /estimates/{id}/approve                  approve + lock (manager)
/// /estimates/{id}/reject                   reject + unlock (manager)
///
/// /rates                                   list rate catalog
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .nest("/measurements", measurements::router())
        .nest("/estimates", estimates::router())
        .nest("/rates", rates::router())
}
