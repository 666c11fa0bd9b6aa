//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `member` - Member aggregate, subscriptions and query specifications
//! - `billing` - Payment webhook classification and webhook errors
//! - `archive` - Archived videos, questions and books
//! - `uploads` - Uploader synchronization report and errors

pub mod archive;
pub mod billing;
pub mod foundation;
pub mod member;
pub mod uploads;
