//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod archive;
pub mod billing;
pub mod uploads;
