//! Measurement models and DTOs.

use foamline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `measurements` table.
///
/// `unit_price`, `line_cost`, and `r_value` are the stored pricing
/// snapshot, written only by the pricing engine. The lock triple
/// (`is_locked`, `locked_by_estimate_id`, `locked_at`) is stamped by the
/// approval transition.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Measurement {
    pub id: DbId,
    pub job_id: DbId,
    pub room_name: String,
    pub surface_type: String,
    pub height_ft: f64,
    pub width_ft: f64,
    pub area_sqft: f64,
    pub insulation_type: String,
    pub thickness_in: Option<f64>,
    pub closed_cell_in: Option<f64>,
    pub open_cell_in: Option<f64>,
    /// Display label (`R-21`); derived, never authoritative.
    pub r_value: Option<String>,
    pub unit_price: f64,
    pub line_cost: f64,
    pub price_override: Option<f64>,
    pub price_override_at: Option<Timestamp>,
    pub is_locked: bool,
    pub locked_by_estimate_id: Option<DbId>,
    pub locked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a measurement (job id comes from the route path).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeasurement {
    pub room_name: String,
    pub surface_type: String,
    pub height_ft: f64,
    pub width_ft: f64,
    pub insulation_type: String,
    pub thickness_in: Option<f64>,
    pub closed_cell_in: Option<f64>,
    pub open_cell_in: Option<f64>,
}

/// DTO for patching a measurement. Absent fields keep their stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMeasurement {
    pub room_name: Option<String>,
    pub surface_type: Option<String>,
    pub height_ft: Option<f64>,
    pub width_ft: Option<f64>,
    pub insulation_type: Option<String>,
    pub thickness_in: Option<f64>,
    pub closed_cell_in: Option<f64>,
    pub open_cell_in: Option<f64>,
}

/// Request body for the manager price-override endpoint. `None` clears the
/// override and reverts the line to rate-table pricing.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPriceOverride {
    pub price_override: Option<f64>,
}

/// Validated, fully-priced field set handed to the repository for insert
/// or full update. Built by the api layer after core validation/pricing;
/// never deserialized from a request.
#[derive(Debug, Clone)]
pub struct MeasurementRecord {
    pub room_name: String,
    pub surface_type: String,
    pub height_ft: f64,
    pub width_ft: f64,
    pub area_sqft: f64,
    pub insulation_type: String,
    pub thickness_in: Option<f64>,
    pub closed_cell_in: Option<f64>,
    pub open_cell_in: Option<f64>,
    pub r_value: String,
    pub unit_price: f64,
    pub line_cost: f64,
}

/// One repriced line in a bulk pricing write.
#[derive(Debug, Clone)]
pub struct RepricedLine {
    pub id: DbId,
    pub unit_price: f64,
    pub line_cost: f64,
    pub r_value: String,
}
