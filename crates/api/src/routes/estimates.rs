//! Route definitions for the estimate workflow.
//!
//! Creation and listing are job-scoped and live under `/jobs`.
//!
//! ```text
//! GET    /{id}                     get_estimate
//! POST   /{id}/recalculate         recalculate_estimate
//! PUT    /{id}/markup              update_markup
//! POST   /{id}/submit              submit_estimate
//! POST   /{id}/approve             approve_estimate (manager)
//! POST   /{id}/reject              reject_estimate (manager)
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::estimates;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(estimates::get_estimate))
        .route("/{id}/recalculate", post(estimates::recalculate_estimate))
        .route("/{id}/markup", put(estimates::update_markup))
        .route("/{id}/submit", post(estimates::submit_estimate))
        .route("/{id}/approve", post(estimates::approve_estimate))
        .route("/{id}/reject", post(estimates::reject_estimate))
}
