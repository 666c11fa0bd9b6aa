//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Member and archive persistence (sqlx)
//! - `memory` - In-memory repositories for tests and local runs
//! - `stripe` - Stripe API client, webhook signatures, mock provider
//! - `vimeo` - Vimeo API client with tus uploads
//! - `archive_api` - Archive API client used by the uploader
//! - `http` - Axum routes

pub mod archive_api;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
pub mod vimeo;
