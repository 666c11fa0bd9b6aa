//! Upload synchronization errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single file. Recorded in the report; the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Thumbnails for video {video_id} not ready after {attempts} polls")]
    ThumbnailTimeout { video_id: String, attempts: u32 },

    #[error("Thumbnail generation failed for video {video_id}")]
    ThumbnailFailed { video_id: String },

    #[error("Could not update video metadata: {0}")]
    Metadata(String),

    #[error("Could not register video with the archive: {0}")]
    Registration(String),
}

/// Failure that aborts the whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Cannot read folder {}: {reason}", path.display())]
    FolderUnreadable { path: PathBuf, reason: String },

    #[error("Remote catalog unavailable: {0}")]
    CatalogUnavailable(String),
}
