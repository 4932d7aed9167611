use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A mutation was blocked because the job's measurements are locked
    /// under an approved estimate. Carries the locking estimate's id so
    /// callers can tell the user which estimate to reject first.
    #[error("Measurements are locked by estimate {estimate_id}")]
    Locked { estimate_id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Totals recomputation could not complete; prior totals are untouched.
    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
