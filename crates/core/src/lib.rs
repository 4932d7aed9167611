//! Pure domain logic for the FoamLine insulation CRM backend.
//!
//! Everything in this crate is side-effect free: pricing math, rate-table
//! lookups, measurement validation, estimate aggregation, the approval
//! state machine rules, and the measurement lock guard. Persistence lives
//! in `foamline-db`, HTTP in `foamline-api`.

pub mod error;
pub mod estimate;
pub mod insulation;
pub mod locking;
pub mod measurement;
pub mod pricing;
pub mod rates;
pub mod roles;
pub mod types;
