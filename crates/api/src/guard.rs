//! Lock guard: the single choke point consulted before any measurement
//! mutation.
//!
//! The decision itself lives in `foamline_core::locking`; this module
//! reads the job's active lock from the store and feeds it in. Every
//! create/update/delete/override path goes through here rather than
//! re-implementing the role check per endpoint.

use foamline_core::locking;
use foamline_core::types::DbId;
use foamline_db::repositories::MeasurementRepo;
use foamline_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// May this actor mutate the measurement set of this job right now?
///
/// Denies with the locking estimate's id when any measurement under the
/// job is locked and the actor is not a manager.
pub async fn ensure_job_mutable(pool: &DbPool, job_id: DbId, user: &AuthUser) -> AppResult<()> {
    let active_lock = MeasurementRepo::find_active_lock(pool, job_id).await?;
    locking::check_job_mutable(&user.role, active_lock)?;
    Ok(())
}

/// May this measurement be deleted? Stricter than editing: locked rows
/// back an approved estimate and are not deletable by anyone.
pub fn ensure_deletable(locked_by_estimate_id: Option<DbId>) -> AppResult<()> {
    locking::check_deletable(locked_by_estimate_id)?;
    Ok(())
}
