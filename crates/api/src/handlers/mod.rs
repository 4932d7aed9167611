//! HTTP request handlers, one module per resource.

pub mod estimates;
pub mod jobs;
pub mod measurements;
pub mod rates;
