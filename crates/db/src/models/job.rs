//! Job models.

use foamline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub customer_name: String,
    pub site_address: Option<String>,
    /// Wall framing lumber size (`2x4` .. `2x12`); fixes the insulation
    /// cavity depth for hybrid validation.
    pub framing_size: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new job.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub customer_name: String,
    pub site_address: Option<String>,
    pub framing_size: String,
}
