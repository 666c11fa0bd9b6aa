//! HTTP adapter for the video archive.
//!
//! - `POST /api/archive-videos` - Register a video uploaded to the video host
//! - `GET /api/archive-videos/:id` - Get a video with its questions

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{get_archive_video, register_archive_video, ArchiveApiError, ArchiveAppState};
pub use routes::archive_routes;
