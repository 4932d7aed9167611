//! Repository for the `rate_table_entries` catalog table.
//!
//! Read-only at pricing time; catalog changes arrive via migrations or an
//! administrative tool outside this service.

use sqlx::PgPool;

use crate::models::rate::RateTableEntry;

/// Column list for `rate_table_entries` queries.
const COLUMNS: &str = "\
    id, insulation_type, min_r_value, max_r_value, price_per_sqft, \
    thickness_label, created_at, updated_at";

/// Provides read operations for the rate catalog.
pub struct RateRepo;

impl RateRepo {
    /// List the full catalog, grouped by insulation type, cheapest
    /// bracket first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<RateTableEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rate_table_entries
             ORDER BY insulation_type ASC, min_r_value ASC"
        );
        sqlx::query_as::<_, RateTableEntry>(&query)
            .fetch_all(pool)
            .await
    }
}
