//! Pricing engine: unit price and line cost for one measurement.
//!
//! Pure computation over the line's inputs plus a [`RateTable`] snapshot.
//! Every price-bearing call site (single-line pricing on create/update and
//! whole-estimate recalculation) goes through [`price_line`], so the two
//! paths cannot disagree.

use crate::insulation::{
    InsulationType, BATT_R_PER_INCH, BLOWN_IN_R_PER_INCH, CLOSED_CELL_R_PER_INCH,
    OPEN_CELL_R_PER_INCH,
};
use crate::rates::{
    RateTable, BATT_RATE_PER_INCH, BLOWN_IN_RATE_PER_INCH, CLOSED_CELL_RATE_PER_INCH,
    OPEN_CELL_RATE_PER_INCH,
};

/// Round a currency amount to whole cents.
///
/// Applied at every write boundary; intermediate math stays unrounded.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Line inputs
// ---------------------------------------------------------------------------

/// Type-specific depth inputs for one measurement line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SystemSpec {
    ClosedCell { thickness_in: f64 },
    OpenCell { thickness_in: f64 },
    Batt { thickness_in: f64 },
    BlownIn { thickness_in: f64 },
    Hybrid { closed_in: f64, open_in: f64 },
}

impl SystemSpec {
    pub fn insulation(self) -> InsulationType {
        match self {
            Self::ClosedCell { .. } => InsulationType::ClosedCell,
            Self::OpenCell { .. } => InsulationType::OpenCell,
            Self::Batt { .. } => InsulationType::Batt,
            Self::BlownIn { .. } => InsulationType::BlownIn,
            Self::Hybrid { .. } => InsulationType::Hybrid,
        }
    }

    /// Resolved R-value: installed depth times the system's R-per-inch.
    /// A hybrid assembly contributes the sum of both layers.
    pub fn r_value(self) -> f64 {
        match self {
            Self::ClosedCell { thickness_in } => thickness_in * CLOSED_CELL_R_PER_INCH,
            Self::OpenCell { thickness_in } => thickness_in * OPEN_CELL_R_PER_INCH,
            Self::Batt { thickness_in } => thickness_in * BATT_R_PER_INCH,
            Self::BlownIn { thickness_in } => thickness_in * BLOWN_IN_R_PER_INCH,
            Self::Hybrid { closed_in, open_in } => {
                closed_in * CLOSED_CELL_R_PER_INCH + open_in * OPEN_CELL_R_PER_INCH
            }
        }
    }
}

/// One measurement line as the pricing engine sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    /// Surface area in ft², already validated positive.
    pub area_sqft: f64,
    pub system: SystemSpec,
    /// Manager-set unit price override (currency per ft²). Always wins.
    pub override_unit_price: Option<f64>,
}

/// The priced result for one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrice {
    /// Unit price per ft², rounded to cents for storage/display.
    pub unit_price: f64,
    /// `unit price × area`, computed from the unrounded unit price and
    /// then rounded to cents.
    pub line_cost: f64,
    /// Resolved numeric R-value for the assembly.
    pub r_value: f64,
    /// Whether the manual override supplied the price.
    pub overridden: bool,
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Compute unit price and line cost for one measurement line.
///
/// Resolution order:
/// 1. Manual override, when present -- bypasses the rate table entirely.
/// 2. Closed/open cell single systems -- R-value bracket lookup.
/// 3. Hybrid -- closed and open layers priced independently from their
///    per-inch rates and summed; no extra multiplier.
/// 4. Batt / blown-in -- linear per-inch rates.
///
/// A missing bracket yields a unit price of 0.0 rather than an error; the
/// recalculation engine logs each zero-priced line so the hole is visible.
pub fn price_line(rates: &RateTable, line: &LineSpec) -> LinePrice {
    let r_value = line.system.r_value();

    if let Some(override_price) = line.override_unit_price {
        return LinePrice {
            unit_price: round_cents(override_price),
            line_cost: round_cents(override_price * line.area_sqft),
            r_value,
            overridden: true,
        };
    }

    let raw_unit = match line.system {
        SystemSpec::ClosedCell { .. } | SystemSpec::OpenCell { .. } => rates
            .bracket_price(line.system.insulation(), r_value)
            .unwrap_or(0.0),
        SystemSpec::Batt { thickness_in } => thickness_in * BATT_RATE_PER_INCH,
        SystemSpec::BlownIn { thickness_in } => thickness_in * BLOWN_IN_RATE_PER_INCH,
        SystemSpec::Hybrid { closed_in, open_in } => {
            closed_in * CLOSED_CELL_RATE_PER_INCH + open_in * OPEN_CELL_RATE_PER_INCH
        }
    };

    LinePrice {
        unit_price: round_cents(raw_unit),
        line_cost: round_cents(raw_unit * line.area_sqft),
        r_value,
        overridden: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
        RateTable::default_catalog()
    }

    // -- round_cents --

    #[test]
    fn rounds_to_whole_cents() {
        assert_eq!(round_cents(3.899), 3.9);
        assert_eq!(round_cents(311.919_999), 311.92);
        assert_eq!(round_cents(0.004), 0.0);
        assert_eq!(round_cents(0.005), 0.01);
    }

    // -- bracket-keyed single systems --

    #[test]
    fn closed_cell_prices_by_r_value_bracket() {
        let line = LineSpec {
            area_sqft: 100.0,
            system: SystemSpec::ClosedCell { thickness_in: 2.0 },
            override_unit_price: None,
        };
        let priced = price_line(&table(), &line);

        assert_eq!(priced.unit_price, 2.49);
        assert_eq!(priced.line_cost, 249.0);
        assert_eq!(priced.r_value, 14.0);
        assert!(!priced.overridden);
    }

    #[test]
    fn open_cell_prices_by_r_value_bracket() {
        let line = LineSpec {
            area_sqft: 80.0,
            system: SystemSpec::OpenCell { thickness_in: 5.5 },
            override_unit_price: None,
        };
        let priced = price_line(&table(), &line);

        assert_eq!(priced.unit_price, 2.59);
        assert_eq!(priced.line_cost, 207.2);
    }

    // -- hybrid --

    #[test]
    fn hybrid_sums_independent_per_inch_contributions() {
        // The worked contract example: 2" closed + 3" open on a 10x8 wall.
        // 2 x 1.243 + 3 x 0.471 = 3.899/ft²; 80 ft² -> 311.92.
        let line = LineSpec {
            area_sqft: 80.0,
            system: SystemSpec::Hybrid {
                closed_in: 2.0,
                open_in: 3.0,
            },
            override_unit_price: None,
        };
        let priced = price_line(&table(), &line);

        assert_eq!(priced.unit_price, 3.9);
        assert_eq!(priced.line_cost, 311.92);
        assert!((priced.r_value - 25.4).abs() < 1e-9);
    }

    #[test]
    fn hybrid_r_value_sums_both_layers() {
        let spec = SystemSpec::Hybrid {
            closed_in: 2.0,
            open_in: 3.0,
        };
        // 2 x 7.0 + 3 x 3.8 = 25.4.
        assert!((spec.r_value() - 25.4).abs() < 1e-9);
    }

    #[test]
    fn hybrid_applies_no_extra_multiplier() {
        let closed_only = price_line(
            &table(),
            &LineSpec {
                area_sqft: 1.0,
                system: SystemSpec::Hybrid {
                    closed_in: 4.0,
                    open_in: 0.0,
                },
                override_unit_price: None,
            },
        );
        // Pure closed-cell hybrid equals 4 x 1.243 with nothing added.
        assert_eq!(closed_only.unit_price, 4.97);
    }

    // -- linear systems --

    #[test]
    fn batt_prices_linearly_per_inch() {
        let line = LineSpec {
            area_sqft: 50.0,
            system: SystemSpec::Batt { thickness_in: 6.0 },
            override_unit_price: None,
        };
        let priced = price_line(&table(), &line);

        // 6 x 0.35 = 2.10/ft²; 50 ft² of the unrounded rate.
        assert_eq!(priced.unit_price, 2.1);
        assert_eq!(priced.line_cost, 105.0);
    }

    #[test]
    fn blown_in_prices_linearly_per_inch() {
        let line = LineSpec {
            area_sqft: 100.0,
            system: SystemSpec::BlownIn { thickness_in: 10.0 },
            override_unit_price: None,
        };
        let priced = price_line(&table(), &line);

        assert_eq!(priced.unit_price, 1.8);
        assert_eq!(priced.line_cost, 180.0);
    }

    // -- override precedence --

    #[test]
    fn override_wins_over_bracket_lookup() {
        // 100 ft² at a $5.00 override -> exactly $500.00.
        let line = LineSpec {
            area_sqft: 100.0,
            system: SystemSpec::ClosedCell { thickness_in: 2.0 },
            override_unit_price: Some(5.0),
        };
        let priced = price_line(&table(), &line);

        assert_eq!(priced.unit_price, 5.0);
        assert_eq!(priced.line_cost, 500.0);
        assert!(priced.overridden);
    }

    #[test]
    fn override_wins_for_every_insulation_type() {
        for system in [
            SystemSpec::ClosedCell { thickness_in: 3.0 },
            SystemSpec::OpenCell { thickness_in: 5.5 },
            SystemSpec::Batt { thickness_in: 3.5 },
            SystemSpec::BlownIn { thickness_in: 8.0 },
            SystemSpec::Hybrid {
                closed_in: 2.0,
                open_in: 3.0,
            },
        ] {
            let priced = price_line(
                &table(),
                &LineSpec {
                    area_sqft: 10.0,
                    system,
                    override_unit_price: Some(2.5),
                },
            );
            assert_eq!(priced.unit_price, 2.5);
            assert_eq!(priced.line_cost, 25.0);
            assert!(priced.overridden);
        }
    }

    #[test]
    fn override_still_reports_resolved_r_value() {
        let priced = price_line(
            &table(),
            &LineSpec {
                area_sqft: 10.0,
                system: SystemSpec::ClosedCell { thickness_in: 3.0 },
                override_unit_price: Some(9.99),
            },
        );
        assert_eq!(priced.r_value, 21.0);
    }

    // -- bracket miss --

    #[test]
    fn bracket_miss_yields_zero_price_silently() {
        // 7" is the deepest closed-cell bracket; an empty table has none.
        let priced = price_line(
            &RateTable::new(vec![]),
            &LineSpec {
                area_sqft: 100.0,
                system: SystemSpec::ClosedCell { thickness_in: 2.0 },
                override_unit_price: None,
            },
        );
        assert_eq!(priced.unit_price, 0.0);
        assert_eq!(priced.line_cost, 0.0);
    }

    #[test]
    fn override_applies_even_when_no_bracket_matches() {
        let priced = price_line(
            &RateTable::new(vec![]),
            &LineSpec {
                area_sqft: 10.0,
                system: SystemSpec::OpenCell { thickness_in: 5.5 },
                override_unit_price: Some(3.0),
            },
        );
        assert_eq!(priced.line_cost, 30.0);
    }
}
