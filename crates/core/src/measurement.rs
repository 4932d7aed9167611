//! Measurement validation: geometry bounds, surface types, and installed
//! depth rules (including the hybrid cavity-depth check).
//!
//! All checks run before any store write and name the offending field in
//! the error message.

use crate::error::CoreError;
use crate::insulation::{
    FramingSize, InsulationType, MAX_CLOSED_CELL_IN, MAX_LOOSE_FILL_IN, MAX_OPEN_CELL_IN,
};
use crate::pricing::SystemSpec;

// ---------------------------------------------------------------------------
// Geometry bounds
// ---------------------------------------------------------------------------

/// Smallest accepted wall/ceiling dimension in feet.
pub const MIN_DIMENSION_FT: f64 = 0.5;
/// Largest accepted wall/ceiling dimension in feet.
pub const MAX_DIMENSION_FT: f64 = 200.0;
/// Smallest accepted surface area in ft².
pub const MIN_AREA_SQFT: f64 = 1.0;
/// Largest accepted surface area in ft².
pub const MAX_AREA_SQFT: f64 = 10_000.0;

/// Maximum room name length in characters.
pub const MAX_ROOM_NAME_LEN: usize = 120;

// ---------------------------------------------------------------------------
// Surface types
// ---------------------------------------------------------------------------

pub const SURFACE_WALL: &str = "wall";
pub const SURFACE_CEILING: &str = "ceiling";

/// All valid surface type values.
pub const VALID_SURFACE_TYPES: &[&str] = &[SURFACE_WALL, SURFACE_CEILING];

/// Validate that a surface type string is one of the accepted values.
pub fn validate_surface_type(surface_type: &str) -> Result<(), CoreError> {
    if VALID_SURFACE_TYPES.contains(&surface_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid surface_type '{surface_type}'. Must be one of: {}",
            VALID_SURFACE_TYPES.join(", ")
        )))
    }
}

/// Validate the room name: non-empty after trimming, bounded length.
pub fn validate_room_name(room_name: &str) -> Result<(), CoreError> {
    let trimmed = room_name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("room_name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_ROOM_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "room_name must be at most {MAX_ROOM_NAME_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Validate height and width and return the derived area in ft².
///
/// Area is always `height × width`; it is derived here and nowhere else so
/// the invariant cannot drift.
pub fn validate_dimensions(height_ft: f64, width_ft: f64) -> Result<f64, CoreError> {
    for (name, value) in [("height_ft", height_ft), ("width_ft", width_ft)] {
        if !value.is_finite() {
            return Err(CoreError::Validation(format!("{name} must be a number")));
        }
        if !(MIN_DIMENSION_FT..=MAX_DIMENSION_FT).contains(&value) {
            return Err(CoreError::Validation(format!(
                "{name} must be between {MIN_DIMENSION_FT} and {MAX_DIMENSION_FT} feet, got {value}"
            )));
        }
    }

    let area = height_ft * width_ft;
    if !(MIN_AREA_SQFT..=MAX_AREA_SQFT).contains(&area) {
        return Err(CoreError::Validation(format!(
            "area must be between {MIN_AREA_SQFT} and {MAX_AREA_SQFT} ft², got {area:.2}"
        )));
    }
    Ok(area)
}

// ---------------------------------------------------------------------------
// Installed depth
// ---------------------------------------------------------------------------

/// Validate the type-specific depth fields against material ceilings and,
/// for hybrid assemblies, the cavity depth implied by the job's framing.
pub fn validate_system(system: SystemSpec, framing: FramingSize) -> Result<(), CoreError> {
    match system {
        SystemSpec::ClosedCell { thickness_in } => {
            validate_depth("thickness_in", thickness_in, MAX_CLOSED_CELL_IN)
        }
        SystemSpec::OpenCell { thickness_in } => {
            validate_depth("thickness_in", thickness_in, MAX_OPEN_CELL_IN)
        }
        SystemSpec::Batt { thickness_in } | SystemSpec::BlownIn { thickness_in } => {
            validate_depth("thickness_in", thickness_in, MAX_LOOSE_FILL_IN)
        }
        SystemSpec::Hybrid { closed_in, open_in } => {
            validate_depth("closed_cell_in", closed_in, MAX_CLOSED_CELL_IN)?;
            validate_depth("open_cell_in", open_in, MAX_OPEN_CELL_IN)?;

            let cavity = framing.cavity_depth_in();
            let combined = closed_in + open_in;
            if combined > cavity {
                return Err(CoreError::Validation(format!(
                    "combined hybrid depth {combined:.2}\" exceeds the {cavity}\" cavity \
                     of {} framing",
                    framing.as_str()
                )));
            }
            Ok(())
        }
    }
}

/// Assemble the typed depth spec from the raw stored/submitted fields.
///
/// Single systems carry `thickness_in`; hybrid carries both layer depths.
/// Fields that do not belong to the type are ignored (survey forms send
/// whatever the previous selection left behind).
pub fn system_from_fields(
    insulation_type: &str,
    thickness_in: Option<f64>,
    closed_cell_in: Option<f64>,
    open_cell_in: Option<f64>,
) -> Result<SystemSpec, CoreError> {
    let kind = InsulationType::parse(insulation_type)?;

    let require_thickness = || {
        thickness_in.ok_or_else(|| {
            CoreError::Validation(format!(
                "thickness_in is required for {insulation_type} measurements"
            ))
        })
    };

    match kind {
        InsulationType::ClosedCell => Ok(SystemSpec::ClosedCell {
            thickness_in: require_thickness()?,
        }),
        InsulationType::OpenCell => Ok(SystemSpec::OpenCell {
            thickness_in: require_thickness()?,
        }),
        InsulationType::Batt => Ok(SystemSpec::Batt {
            thickness_in: require_thickness()?,
        }),
        InsulationType::BlownIn => Ok(SystemSpec::BlownIn {
            thickness_in: require_thickness()?,
        }),
        InsulationType::Hybrid => {
            let (Some(closed_in), Some(open_in)) = (closed_cell_in, open_cell_in) else {
                return Err(CoreError::Validation(
                    "closed_cell_in and open_cell_in are required for hybrid measurements".into(),
                ));
            };
            Ok(SystemSpec::Hybrid { closed_in, open_in })
        }
    }
}

fn validate_depth(name: &str, value: f64, max: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be greater than 0 inches"
        )));
    }
    if value > max {
        return Err(CoreError::Validation(format!(
            "{name} must be at most {max} inches, got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Price override
// ---------------------------------------------------------------------------

/// Validate a manual unit-price override: finite and non-negative.
pub fn validate_override(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Validation(
            "price_override must be zero or greater".into(),
        ));
    }
    Ok(())
}
