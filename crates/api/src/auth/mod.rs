//! Authentication primitives.
//!
//! Token *issuing* belongs to the external auth service; this module only
//! validates the HS256 access tokens it produces.
//!
//! - [`jwt`] -- JWT access-token validation (and generation, for tests and
//!   local tooling).

pub mod jwt;
