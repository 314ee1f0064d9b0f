//! HTTP handlers for artlens-api.

pub mod analyze;
pub mod status;
