//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) are kept apart from query handlers (read).

pub mod handlers;

pub use handlers::archive::{
    GetArchiveVideoHandler, GetArchiveVideoQuery, RegisterArchiveVideoCommand,
    RegisterArchiveVideoHandler, RegisterArchiveVideoResult,
};
pub use handlers::billing::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
pub use handlers::uploads::{SyncSettings, SyncVideosCommand, SyncVideosHandler};
