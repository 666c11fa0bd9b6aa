//! Vimeo video host adapter.

mod types;
mod vimeo_client;

pub use vimeo_client::{VimeoClient, VimeoConfig};
