//! Route definitions for measurement mutations.
//!
//! Creation and listing are job-scoped and live under `/jobs`.
//!
//! ```text
//! PUT    /{id}                     update_measurement
//! DELETE /{id}                     delete_measurement
//! PUT    /{id}/price-override      set_price_override (manager)
//! ```

use axum::routing::put;
use axum::Router;

use crate::handlers::measurements;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            put(measurements::update_measurement).delete(measurements::delete_measurement),
        )
        .route(
            "/{id}/price-override",
            put(measurements::set_price_override),
        )
}
