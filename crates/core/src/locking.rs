//! Measurement lock guard: the single decision point for "may this job's
//! measurements be mutated right now?".
//!
//! The lock itself is a persisted flag stamped by the approval transition,
//! not an in-process primitive; this module only decides. The api crate's
//! guard helper feeds it the active lock read from the store.

use crate::error::CoreError;
use crate::roles::is_manager;
use crate::types::DbId;

/// Decide whether a job's measurement set may be mutated.
///
/// Managers may always mutate. Everyone else is denied while any
/// measurement under the job is locked; the error carries the locking
/// estimate's id so the caller can explain the block.
pub fn check_job_mutable(role: &str, active_lock: Option<DbId>) -> Result<(), CoreError> {
    if is_manager(role) {
        return Ok(());
    }
    match active_lock {
        Some(estimate_id) => Err(CoreError::Locked { estimate_id }),
        None => Ok(()),
    }
}

/// Decide whether a single measurement may be deleted.
///
/// Deletion is stricter than editing: a locked measurement backs an
/// approved estimate and may not be deleted by anyone until that estimate
/// is rejected.
pub fn check_deletable(locked_by_estimate_id: Option<DbId>) -> Result<(), CoreError> {
    match locked_by_estimate_id {
        Some(estimate_id) => Err(CoreError::Locked { estimate_id }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_CREW, ROLE_ESTIMATOR, ROLE_MANAGER};
    use assert_matches::assert_matches;

    #[test]
    fn unlocked_job_is_mutable_by_anyone() {
        assert!(check_job_mutable(ROLE_CREW, None).is_ok());
        assert!(check_job_mutable(ROLE_ESTIMATOR, None).is_ok());
        assert!(check_job_mutable(ROLE_MANAGER, None).is_ok());
    }

    #[test]
    fn locked_job_denies_non_managers_with_the_locking_estimate() {
        let err = check_job_mutable(ROLE_ESTIMATOR, Some(77)).unwrap_err();
        assert_matches!(err, CoreError::Locked { estimate_id: 77 });
    }

    #[test]
    fn locked_job_still_mutable_by_manager() {
        assert!(check_job_mutable(ROLE_MANAGER, Some(77)).is_ok());
    }

    #[test]
    fn locked_measurement_not_deletable_even_by_manager_path() {
        // check_deletable has no role parameter on purpose: deletion of
        // locked rows is denied for everyone.
        assert_matches!(check_deletable(Some(5)), Err(CoreError::Locked { estimate_id: 5 }));
        assert!(check_deletable(None).is_ok());
    }
}
