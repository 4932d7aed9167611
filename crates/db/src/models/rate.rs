//! Rate-table catalog models.

use foamline_core::insulation::InsulationType;
use foamline_core::rates::{RateEntry, RateTable};
use foamline_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `rate_table_entries` catalog table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RateTableEntry {
    pub id: DbId,
    pub insulation_type: String,
    pub min_r_value: f64,
    pub max_r_value: f64,
    pub price_per_sqft: f64,
    pub thickness_label: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Build the pricing snapshot from catalog rows.
///
/// Rows whose insulation type the code does not know are skipped with a
/// warning rather than failing the whole snapshot; an empty catalog falls
/// back to the built-in defaults so pricing works against a fixed
/// in-memory table or a populated catalog alike.
pub fn build_rate_table(rows: &[RateTableEntry]) -> RateTable {
    if rows.is_empty() {
        return RateTable::default_catalog();
    }

    let entries = rows
        .iter()
        .filter_map(|row| match InsulationType::parse(&row.insulation_type) {
            Ok(insulation) => Some(RateEntry {
                insulation,
                min_r: row.min_r_value,
                max_r: row.max_r_value,
                price_per_sqft: row.price_per_sqft,
                thickness_label: row.thickness_label.clone(),
            }),
            Err(_) => {
                tracing::warn!(
                    rate_entry_id = row.id,
                    insulation_type = %row.insulation_type,
                    "Skipping rate table row with unknown insulation type"
                );
                None
            }
        })
        .collect();

    RateTable::new(entries)
}
