//! Rate table component: the single source of truth for pricing data.
//!
//! Two kinds of rate live here and nowhere else (PRD-18):
//!
//! - **Bracket rows** keyed by `[min_r, max_r]` R-value ranges, used to
//!   price single-system closed-cell and open-cell lines. The R-value key
//!   is derived from installed depth times the system's R-per-inch
//!   constant, so lookup keys on R-value with thickness as the input.
//! - **Per-inch rates** used for hybrid assemblies (each layer priced
//!   independently and summed) and for the linear batt / blown-in systems.
//!
//! The built-in default catalog mirrors the database seed; callers can
//! inject a table loaded from the catalog instead. The table is immutable
//! at calculation time.

use crate::insulation::InsulationType;
use crate::pricing::round_cents;

// ---------------------------------------------------------------------------
// Per-inch installed rates (currency per inch of depth per ft²)
// ---------------------------------------------------------------------------

/// Closed-cell spray foam, per inch per ft².
pub const CLOSED_CELL_RATE_PER_INCH: f64 = 1.243;
/// Open-cell spray foam, per inch per ft².
pub const OPEN_CELL_RATE_PER_INCH: f64 = 0.471;
/// Fiberglass batt, per inch per ft².
pub const BATT_RATE_PER_INCH: f64 = 0.35;
/// Blown-in (loose fill), per inch per ft².
pub const BLOWN_IN_RATE_PER_INCH: f64 = 0.18;

// ---------------------------------------------------------------------------
// Bracket rows
// ---------------------------------------------------------------------------

/// Tolerance for matching a computed R-value against bracket bounds.
/// R-values are products of user-entered depths and the per-inch constants,
/// so exact float comparison against stored bounds is not reliable.
const R_EPSILON: f64 = 1e-6;

/// One rate-table row: a price per ft² for an R-value bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub insulation: InsulationType,
    pub min_r: f64,
    pub max_r: f64,
    pub price_per_sqft: f64,
    /// Optional display label for the depth this bracket corresponds to.
    pub thickness_label: Option<String>,
}

/// An immutable snapshot of the rate catalog.
#[derive(Debug, Clone)]
pub struct RateTable {
    entries: Vec<RateEntry>,
}

impl RateTable {
    pub fn new(entries: Vec<RateEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    /// Price per ft² for the bracket whose `[min_r, max_r]` range contains
    /// the resolved R-value. Returns `None` when no bracket matches.
    pub fn bracket_price(&self, insulation: InsulationType, r_value: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| {
                e.insulation == insulation
                    && r_value >= e.min_r - R_EPSILON
                    && r_value <= e.max_r + R_EPSILON
            })
            .map(|e| e.price_per_sqft)
    }

    /// The built-in catalog, identical to the database seed.
    ///
    /// Bracket prices are generated from the per-inch constants at whole
    /// (closed-cell) and stocked (open-cell) depths, so bracket pricing and
    /// per-inch pricing cannot drift apart.
    pub fn default_catalog() -> Self {
        let mut entries = Vec::new();

        // Closed cell: 1" through 7", R-7 per inch.
        for inches in 1..=7 {
            let depth = f64::from(inches);
            entries.push(RateEntry {
                insulation: InsulationType::ClosedCell,
                min_r: if inches == 1 { 0.0 } else { (depth - 1.0) * 7.0 + 0.01 },
                max_r: depth * 7.0,
                price_per_sqft: round_cents(depth * CLOSED_CELL_RATE_PER_INCH),
                thickness_label: Some(format!("{inches}\"")),
            });
        }

        // Open cell: stocked depths up to the 13" ceiling, R-3.8 per inch.
        let open_depths: [f64; 6] = [3.5, 5.5, 7.0, 9.0, 11.0, 13.0];
        let mut prev_max = 0.0;
        for depth in open_depths {
            let max_r = (depth * 3.8 * 10.0).round() / 10.0;
            entries.push(RateEntry {
                insulation: InsulationType::OpenCell,
                min_r: if prev_max == 0.0 { 0.0 } else { prev_max + 0.01 },
                max_r,
                price_per_sqft: round_cents(depth * OPEN_CELL_RATE_PER_INCH),
                thickness_label: Some(format!("{depth}\"")),
            });
            prev_max = max_r;
        }

        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_cell_bracket_prices_follow_per_inch_rate() {
        let table = RateTable::default_catalog();

        // 2" closed cell resolves to R-14 and the 2" bracket.
        assert_eq!(
            table.bracket_price(InsulationType::ClosedCell, 14.0),
            Some(2.49)
        );
        // 3" -> R-21.
        assert_eq!(
            table.bracket_price(InsulationType::ClosedCell, 21.0),
            Some(3.73)
        );
        // 7" -> R-49 is the deepest bracket.
        assert_eq!(
            table.bracket_price(InsulationType::ClosedCell, 49.0),
            Some(8.7)
        );
    }

    #[test]
    fn open_cell_bracket_prices_follow_per_inch_rate() {
        let table = RateTable::default_catalog();

        // 3.5" open cell resolves to R-13.3.
        assert_eq!(
            table.bracket_price(InsulationType::OpenCell, 13.3),
            Some(1.65)
        );
        // 13" -> R-49.4.
        assert_eq!(
            table.bracket_price(InsulationType::OpenCell, 49.4),
            Some(6.12)
        );
    }

    #[test]
    fn intermediate_r_values_land_in_the_enclosing_bracket() {
        let table = RateTable::default_catalog();

        // 2.5" closed cell -> R-17.5 sits in the 3" bracket.
        assert_eq!(
            table.bracket_price(InsulationType::ClosedCell, 17.5),
            Some(3.73)
        );
    }

    #[test]
    fn out_of_range_r_value_has_no_bracket() {
        let table = RateTable::default_catalog();

        assert_eq!(table.bracket_price(InsulationType::ClosedCell, 120.0), None);
        assert_eq!(table.bracket_price(InsulationType::OpenCell, 55.0), None);
    }

    #[test]
    fn batt_and_blown_in_have_no_brackets() {
        let table = RateTable::default_catalog();

        assert_eq!(table.bracket_price(InsulationType::Batt, 13.0), None);
        assert_eq!(table.bracket_price(InsulationType::BlownIn, 30.0), None);
    }

    #[test]
    fn empty_table_matches_nothing() {
        let table = RateTable::new(vec![]);
        assert!(table.is_empty());
        assert_eq!(table.bracket_price(InsulationType::ClosedCell, 14.0), None);
    }
}
