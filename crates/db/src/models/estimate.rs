//! Estimate models and DTOs.

use foamline_core::estimate::EstimateStatus;
use foamline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `estimates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Estimate {
    pub id: DbId,
    pub job_id: DbId,
    pub estimate_number: String,
    pub status_id: i16,
    pub subtotal: f64,
    /// Stored separately from the totals; currently always 0 but kept
    /// updatable for future pricing policies.
    pub markup_percent: f64,
    pub total_amount: f64,
    /// Whether this estimate currently holds the measurement lock for its
    /// job. At most one estimate per job holds it.
    pub locks_measurements: bool,
    pub created_by: DbId,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Estimate {
    /// Decode the status id column. `None` only if the row predates a
    /// status the code knows about, which is a data bug worth surfacing.
    pub fn status(&self) -> Option<EstimateStatus> {
        EstimateStatus::from_id(self.status_id)
    }
}

/// Request body for updating the markup percentage.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMarkup {
    pub markup_percent: f64,
}
