//! Estimate lifecycle rules and totals aggregation.
//!
//! The status enum maps to a SMALLINT status id column (1-based, matching
//! the seed order in the estimates migration). Transition checks are pure;
//! the conditional writes that make them stick live in `foamline-db`.

use crate::error::CoreError;
use crate::pricing::round_cents;
use crate::roles::is_manager;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Estimate lifecycle status.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    Draft = 1,
    PendingApproval = 2,
    Approved = 3,
    Rejected = 4,
}

impl EstimateStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Map a database status ID back to the enum.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Draft),
            2 => Some(Self::PendingApproval),
            3 => Some(Self::Approved),
            4 => Some(Self::Rejected),
            _ => None,
        }
    }

    /// The wire representation (snake_case).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl From<EstimateStatus> for StatusId {
    fn from(value: EstimateStatus) -> Self {
        value as StatusId
    }
}

// ---------------------------------------------------------------------------
// Transition checks
// ---------------------------------------------------------------------------

/// Approval is allowed from any non-approved state. Re-approving an
/// already-approved estimate is a no-op conflict.
pub fn check_approve(current: EstimateStatus) -> Result<(), CoreError> {
    if current == EstimateStatus::Approved {
        return Err(CoreError::Conflict("Estimate is already approved".into()));
    }
    Ok(())
}

/// Rejection is allowed from any state, including approved (it reverses
/// the lock the approval imposed).
pub fn check_reject(_current: EstimateStatus) -> Result<(), CoreError> {
    Ok(())
}

/// Only a draft can be sent for review.
pub fn check_submit(current: EstimateStatus) -> Result<(), CoreError> {
    if current != EstimateStatus::Draft {
        return Err(CoreError::Conflict(format!(
            "Only draft estimates can be submitted for approval (status is {})",
            current.as_str()
        )));
    }
    Ok(())
}

/// Whether this actor may edit (recalculate, change markup on) an estimate
/// in this status. Draft and rejected estimates are editable by anyone who
/// can reach them; pending/approved estimates only by a manager.
pub fn check_editable(current: EstimateStatus, role: &str) -> Result<(), CoreError> {
    match current {
        EstimateStatus::Draft | EstimateStatus::Rejected => Ok(()),
        EstimateStatus::PendingApproval | EstimateStatus::Approved => {
            if is_manager(role) {
                Ok(())
            } else {
                Err(CoreError::Forbidden(format!(
                    "Estimate is {} and can only be modified by a manager",
                    current.as_str()
                )))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Totals aggregation
// ---------------------------------------------------------------------------

/// Largest accepted markup percentage.
pub const MAX_MARKUP_PERCENT: f64 = 100.0;

/// Validate a markup percentage: finite, within `[0, 100]`.
pub fn validate_markup(percent: f64) -> Result<(), CoreError> {
    if !percent.is_finite() || !(0.0..=MAX_MARKUP_PERCENT).contains(&percent) {
        return Err(CoreError::Validation(format!(
            "markup_percent must be between 0 and {MAX_MARKUP_PERCENT}, got {percent}"
        )));
    }
    Ok(())
}

/// Subtotal: the sum of all line costs, rounded to cents.
pub fn subtotal_of(line_costs: &[f64]) -> f64 {
    round_cents(line_costs.iter().sum())
}

/// Total: subtotal plus markup, rounded to cents. Markup is stored per
/// estimate and currently defaults to 0%.
pub fn total_with_markup(subtotal: f64, markup_percent: f64) -> f64 {
    round_cents(subtotal * (1.0 + markup_percent / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- status ids --

    #[test]
    fn status_ids_round_trip() {
        for status in [
            EstimateStatus::Draft,
            EstimateStatus::PendingApproval,
            EstimateStatus::Approved,
            EstimateStatus::Rejected,
        ] {
            assert_eq!(EstimateStatus::from_id(status.id()), Some(status));
        }
    }

    #[test]
    fn unknown_status_id_is_none() {
        assert_eq!(EstimateStatus::from_id(0), None);
        assert_eq!(EstimateStatus::from_id(5), None);
    }

    // -- transitions --

    #[test]
    fn approve_allowed_from_non_approved_states() {
        assert!(check_approve(EstimateStatus::Draft).is_ok());
        assert!(check_approve(EstimateStatus::PendingApproval).is_ok());
        assert!(check_approve(EstimateStatus::Rejected).is_ok());
    }

    #[test]
    fn reapprove_is_a_conflict() {
        assert_matches!(
            check_approve(EstimateStatus::Approved),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn reject_allowed_from_any_state() {
        assert!(check_reject(EstimateStatus::Draft).is_ok());
        assert!(check_reject(EstimateStatus::PendingApproval).is_ok());
        assert!(check_reject(EstimateStatus::Approved).is_ok());
        assert!(check_reject(EstimateStatus::Rejected).is_ok());
    }

    #[test]
    fn submit_only_from_draft() {
        assert!(check_submit(EstimateStatus::Draft).is_ok());
        assert_matches!(
            check_submit(EstimateStatus::Approved),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            check_submit(EstimateStatus::Rejected),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn draft_and_rejected_editable_by_anyone() {
        assert!(check_editable(EstimateStatus::Draft, "crew").is_ok());
        assert!(check_editable(EstimateStatus::Rejected, "estimator").is_ok());
    }

    #[test]
    fn pending_and_approved_editable_only_by_manager() {
        assert_matches!(
            check_editable(EstimateStatus::PendingApproval, "estimator"),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            check_editable(EstimateStatus::Approved, "crew"),
            Err(CoreError::Forbidden(_))
        );
        assert!(check_editable(EstimateStatus::PendingApproval, "manager").is_ok());
        assert!(check_editable(EstimateStatus::Approved, "manager").is_ok());
    }

    // -- aggregation --

    #[test]
    fn subtotal_sums_line_costs() {
        // Two lines at $300.00 and $450.50 -> $750.50.
        assert_eq!(subtotal_of(&[300.0, 450.5]), 750.5);
    }

    #[test]
    fn subtotal_of_no_lines_is_zero() {
        assert_eq!(subtotal_of(&[]), 0.0);
    }

    #[test]
    fn zero_markup_total_equals_subtotal() {
        assert_eq!(total_with_markup(750.5, 0.0), 750.5);
    }

    #[test]
    fn markup_is_applied_and_rounded() {
        // 10% on $750.50 -> $825.55.
        assert_eq!(total_with_markup(750.5, 10.0), 825.55);
    }

    #[test]
    fn markup_bounds_enforced() {
        assert!(validate_markup(0.0).is_ok());
        assert!(validate_markup(100.0).is_ok());
        assert!(validate_markup(-0.1).is_err());
        assert!(validate_markup(100.1).is_err());
        assert!(validate_markup(f64::NAN).is_err());
    }
}
