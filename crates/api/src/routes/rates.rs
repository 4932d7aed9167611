//! Route definition for the rate catalog.
//!
//! ```text
//! GET    /                         list_rates
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::rates;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(rates::list_rates))
}
