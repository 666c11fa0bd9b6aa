//! Axum router configuration for archive endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_archive_video, register_archive_video, ArchiveAppState};

/// Create the archive router, mounted at `/api/archive-videos`.
///
/// # Routes
/// - `POST /` - Register a video (bearer ingest token when configured)
/// - `GET /:id` - Get a video with its questions
pub fn archive_routes() -> Router<ArchiveAppState> {
    Router::new()
        .route("/", post(register_archive_video))
        .route("/:id", get(get_archive_video))
}
