//! Route definitions for jobs and their nested resources.
//!
//! ```text
//! GET    /                          list_jobs
//! POST   /                          create_job
//! GET    /{job_id}                  get_job
//! GET    /{job_id}/measurements     list_measurements
//! POST   /{job_id}/measurements     create_measurement
//! GET    /{job_id}/estimates        list_estimates
//! POST   /{job_id}/estimates        create_estimate
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::{estimates, jobs, measurements};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route("/{job_id}", get(jobs::get_job))
        .route(
            "/{job_id}/measurements",
            get(measurements::list_measurements).post(measurements::create_measurement),
        )
        .route(
            "/{job_id}/estimates",
            get(estimates::list_estimates).post(estimates::create_estimate),
        )
}
