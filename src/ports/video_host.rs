//! Video hosting port (Vimeo).
//!
//! Covers the calls the uploader makes: catalog listing, resumable upload,
//! animated thumbnails and the post-upload metadata updates.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// A video already present on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVideo {
    pub id: String,
    pub name: String,
    pub link: Option<String>,
}

/// Result of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub video_id: String,
    /// Public page of the video.
    pub link: String,
}

/// Generation state of an animated thumbnail set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStatus {
    Pending,
    Ready,
    Failed,
}

/// Embed privacy and title applied after upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub name: String,
    /// Restrict embedding to whitelisted domains.
    pub embed_whitelist: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoHostError {
    #[error("Video host request failed: {0}")]
    Request(String),

    #[error("Video host returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Could not read local file: {0}")]
    Io(String),

    #[error("Unexpected video host response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait VideoHost: Send + Sync {
    /// Lists every video in the account (all pages).
    async fn list_videos(&self) -> Result<Vec<RemoteVideo>, VideoHostError>;

    /// Uploads a local file, resuming after failed chunks.
    async fn upload_video(&self, path: &Path, name: &str) -> Result<UploadedFile, VideoHostError>;

    /// Requests animated thumbnails; returns the thumbnail set id.
    async fn create_animated_thumbnails(&self, video_id: &str) -> Result<String, VideoHostError>;

    async fn thumbnail_status(
        &self,
        video_id: &str,
        thumbnail_id: &str,
    ) -> Result<ThumbnailStatus, VideoHostError>;

    /// Makes the thumbnail set the active one for the video.
    async fn attach_thumbnails(
        &self,
        video_id: &str,
        thumbnail_id: &str,
    ) -> Result<(), VideoHostError>;

    async fn update_details(
        &self,
        video_id: &str,
        details: &VideoDetails,
    ) -> Result<(), VideoHostError>;

    /// Whitelists a domain for embedding.
    async fn add_domain(&self, video_id: &str, domain: &str) -> Result<(), VideoHostError>;
}
