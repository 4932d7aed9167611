//! Insulation catalog: system types, R-value constants, framing sizes.
//!
//! The catalog is fixed (PRD-12): closed-cell foam, open-cell foam,
//! fiberglass batt, blown-in, and the hybrid closed+open assembly. Adding
//! a system type means touching this module, the rate table seed, and
//! nothing else.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// R-value per inch of installed depth
// ---------------------------------------------------------------------------

/// Closed-cell spray foam R-value per inch.
pub const CLOSED_CELL_R_PER_INCH: f64 = 7.0;
/// Open-cell spray foam R-value per inch.
pub const OPEN_CELL_R_PER_INCH: f64 = 3.8;
/// Fiberglass batt R-value per inch.
pub const BATT_R_PER_INCH: f64 = 3.2;
/// Blown-in (loose fill) R-value per inch.
pub const BLOWN_IN_R_PER_INCH: f64 = 3.7;

// ---------------------------------------------------------------------------
// Installed-depth ceilings
// ---------------------------------------------------------------------------

/// Maximum closed-cell depth a rig can install in one assembly.
pub const MAX_CLOSED_CELL_IN: f64 = 7.0;
/// Maximum open-cell depth a rig can install in one assembly.
pub const MAX_OPEN_CELL_IN: f64 = 13.0;
/// Sanity ceiling for batt / blown-in depth.
pub const MAX_LOOSE_FILL_IN: f64 = 24.0;

// ---------------------------------------------------------------------------
// Insulation system types
// ---------------------------------------------------------------------------

/// The fixed catalog of insulation systems a measurement can be priced as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsulationType {
    ClosedCell,
    OpenCell,
    Batt,
    BlownIn,
    Hybrid,
}

impl InsulationType {
    /// The wire / database representation (snake_case).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClosedCell => "closed_cell",
            Self::OpenCell => "open_cell",
            Self::Batt => "batt",
            Self::BlownIn => "blown_in",
            Self::Hybrid => "hybrid",
        }
    }

    /// Parse the wire / database representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "closed_cell" => Ok(Self::ClosedCell),
            "open_cell" => Ok(Self::OpenCell),
            "batt" => Ok(Self::Batt),
            "blown_in" => Ok(Self::BlownIn),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(CoreError::Validation(format!(
                "Unknown insulation type '{other}'. Must be one of: \
                 closed_cell, open_cell, batt, blown_in, hybrid"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Framing sizes and cavity depths
// ---------------------------------------------------------------------------

/// Wall framing lumber size, which fixes the usable insulation cavity depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FramingSize {
    #[serde(rename = "2x4")]
    F2x4,
    #[serde(rename = "2x6")]
    F2x6,
    #[serde(rename = "2x8")]
    F2x8,
    #[serde(rename = "2x10")]
    F2x10,
    #[serde(rename = "2x12")]
    F2x12,
}

impl FramingSize {
    /// Usable cavity depth in inches (nominal lumber actual depth).
    pub fn cavity_depth_in(self) -> f64 {
        match self {
            Self::F2x4 => 3.5,
            Self::F2x6 => 5.5,
            Self::F2x8 => 7.25,
            Self::F2x10 => 9.25,
            Self::F2x12 => 11.25,
        }
    }

    /// The wire / database representation (`"2x6"` etc.).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::F2x4 => "2x4",
            Self::F2x6 => "2x6",
            Self::F2x8 => "2x8",
            Self::F2x10 => "2x10",
            Self::F2x12 => "2x12",
        }
    }

    /// Parse the wire / database representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "2x4" => Ok(Self::F2x4),
            "2x6" => Ok(Self::F2x6),
            "2x8" => Ok(Self::F2x8),
            "2x10" => Ok(Self::F2x10),
            "2x12" => Ok(Self::F2x12),
            other => Err(CoreError::Validation(format!(
                "Unknown framing size '{other}'. Must be one of: 2x4, 2x6, 2x8, 2x10, 2x12"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// R-value display labels
// ---------------------------------------------------------------------------

/// Format a numeric R-value as its display label, e.g. `R-21` or `R-25.4`.
///
/// The label is derived from the numeric value and is display-only; callers
/// needing the number must re-derive it from thickness, never parse this.
pub fn r_value_label(r_value: f64) -> String {
    let rounded = (r_value * 10.0).round() / 10.0;
    if (rounded - rounded.trunc()).abs() < f64::EPSILON {
        format!("R-{}", rounded.trunc() as i64)
    } else {
        format!("R-{rounded:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insulation_type_round_trips() {
        for kind in [
            InsulationType::ClosedCell,
            InsulationType::OpenCell,
            InsulationType::Batt,
            InsulationType::BlownIn,
            InsulationType::Hybrid,
        ] {
            assert_eq!(InsulationType::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_insulation_type_rejected() {
        let err = InsulationType::parse("cellulose").unwrap_err();
        assert!(err.to_string().contains("Unknown insulation type"));
    }

    #[test]
    fn cavity_depths_match_lumber_sizes() {
        assert_eq!(FramingSize::F2x4.cavity_depth_in(), 3.5);
        assert_eq!(FramingSize::F2x6.cavity_depth_in(), 5.5);
        assert_eq!(FramingSize::F2x8.cavity_depth_in(), 7.25);
        assert_eq!(FramingSize::F2x10.cavity_depth_in(), 9.25);
        assert_eq!(FramingSize::F2x12.cavity_depth_in(), 11.25);
    }

    #[test]
    fn framing_size_round_trips() {
        for framing in [
            FramingSize::F2x4,
            FramingSize::F2x6,
            FramingSize::F2x8,
            FramingSize::F2x10,
            FramingSize::F2x12,
        ] {
            assert_eq!(FramingSize::parse(framing.as_str()).unwrap(), framing);
        }
    }

    #[test]
    fn unknown_framing_size_rejected() {
        assert!(FramingSize::parse("2x14").is_err());
    }

    #[test]
    fn whole_r_values_label_without_decimals() {
        assert_eq!(r_value_label(21.0), "R-21");
        assert_eq!(r_value_label(49.0), "R-49");
    }

    #[test]
    fn fractional_r_values_label_with_one_decimal() {
        // Hybrid 2" closed + 3" open: 14.0 + 11.4 = 25.4.
        assert_eq!(r_value_label(25.4), "R-25.4");
        assert_eq!(r_value_label(13.3), "R-13.3");
    }
}
