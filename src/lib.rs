//! DevBetter - Membership backend
//!
//! Reconciles Stripe subscription webhooks with member records and runs the
//! uploader that publishes recorded sessions to Vimeo and the video archive.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
