//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod archive;
pub mod billing;
mod router;

// Re-export key types for convenience
pub use archive::{archive_routes, ArchiveAppState};
pub use billing::{webhook_routes, BillingAppState};
pub use router::build_router;
