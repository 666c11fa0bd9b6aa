//! SyncVideosHandler - Pushes local video files missing from the video host
//! and registers them with the archive.
//!
//! Files are processed one at a time. A failure on one file is recorded in
//! the report and the run moves on; only an unreadable folder or an
//! unavailable remote catalog abort the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::uploads::{
    FailedUpload, LocalVideoFile, SyncError, SyncReport, UploadError, UploadedVideo,
};
use crate::ports::{
    ArchiveRegistry, ArchiveVideoRegistration, ThumbnailStatus, VideoDetails, VideoHost,
};

/// Command to synchronize a folder.
#[derive(Debug, Clone)]
pub struct SyncVideosCommand {
    pub folder: PathBuf,
}

/// Uploader tuning.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Maximum thumbnail status checks per video.
    pub poll_attempts: u32,
    pub poll_interval: Duration,
    /// Domains allowed to embed the uploaded videos.
    pub domains: Vec<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_attempts: 30,
            poll_interval: Duration::from_secs(10),
            domains: vec!["devbetter.com".to_string()],
        }
    }
}

pub struct SyncVideosHandler {
    host: Arc<dyn VideoHost>,
    registry: Arc<dyn ArchiveRegistry>,
    settings: SyncSettings,
}

impl SyncVideosHandler {
    pub fn new(
        host: Arc<dyn VideoHost>,
        registry: Arc<dyn ArchiveRegistry>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            host,
            registry,
            settings,
        }
    }

    pub async fn handle(&self, cmd: SyncVideosCommand) -> Result<SyncReport, SyncError> {
        let files = scan_folder(&cmd.folder).await?;

        let catalog = self
            .host
            .list_videos()
            .await
            .map_err(|e| SyncError::CatalogUnavailable(e.to_string()))?;
        let remote_names: HashSet<&str> = catalog.iter().map(|v| v.name.as_str()).collect();

        tracing::info!(
            folder = %cmd.folder.display(),
            local = files.len(),
            remote = catalog.len(),
            "Starting video sync"
        );

        let mut report = SyncReport::default();
        for file in files {
            if remote_names.contains(file.title.as_str()) {
                tracing::debug!(title = %file.title, "Already on video host, skipping");
                report.skipped.push(file.title);
                continue;
            }

            match self.upload_one(&file).await {
                Ok(uploaded) => {
                    tracing::info!(
                        title = %uploaded.title,
                        video_id = %uploaded.video_id,
                        "Uploaded video"
                    );
                    report.uploaded.push(uploaded);
                }
                Err(error) => {
                    tracing::warn!(title = %file.title, error = %error, "Video upload failed");
                    report.failed.push(FailedUpload {
                        file: file.path,
                        title: file.title,
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    async fn upload_one(&self, file: &LocalVideoFile) -> Result<UploadedVideo, UploadError> {
        let uploaded = self
            .host
            .upload_video(&file.path, &file.title)
            .await
            .map_err(|e| UploadError::Upload(e.to_string()))?;
        let video_id = uploaded.video_id.as_str();

        let thumbnail_id = self
            .host
            .create_animated_thumbnails(video_id)
            .await
            .map_err(|e| UploadError::Metadata(e.to_string()))?;
        self.wait_for_thumbnails(video_id, &thumbnail_id).await?;

        self.host
            .attach_thumbnails(video_id, &thumbnail_id)
            .await
            .map_err(|e| UploadError::Metadata(e.to_string()))?;

        let details = VideoDetails {
            name: file.title.clone(),
            embed_whitelist: true,
        };
        self.host
            .update_details(video_id, &details)
            .await
            .map_err(|e| UploadError::Metadata(e.to_string()))?;

        for domain in &self.settings.domains {
            self.host
                .add_domain(video_id, domain)
                .await
                .map_err(|e| UploadError::Metadata(e.to_string()))?;
        }

        self.registry
            .register(&ArchiveVideoRegistration {
                title: file.title.clone(),
                video_url: uploaded.link.clone(),
                show_notes: None,
            })
            .await
            .map_err(|e| UploadError::Registration(e.to_string()))?;

        Ok(UploadedVideo {
            title: file.title.clone(),
            video_id: uploaded.video_id.clone(),
            url: uploaded.link,
        })
    }

    /// Polls thumbnail status at most `poll_attempts` times.
    async fn wait_for_thumbnails(&self, video_id: &str, thumbnail_id: &str) -> Result<(), UploadError> {
        let attempts = self.settings.poll_attempts;

        for attempt in 1..=attempts {
            match self.host.thumbnail_status(video_id, thumbnail_id).await {
                Ok(ThumbnailStatus::Ready) => return Ok(()),
                Ok(ThumbnailStatus::Failed) => {
                    return Err(UploadError::ThumbnailFailed {
                        video_id: video_id.to_string(),
                    })
                }
                Ok(ThumbnailStatus::Pending) => {}
                Err(e) => {
                    tracing::debug!(video_id, attempt, error = %e, "Thumbnail status check failed");
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.settings.poll_interval).await;
            }
        }

        Err(UploadError::ThumbnailTimeout {
            video_id: video_id.to_string(),
            attempts,
        })
    }
}

/// Lists regular, non-hidden files directly inside `folder`, sorted by name.
pub async fn scan_folder(folder: &Path) -> Result<Vec<LocalVideoFile>, SyncError> {
    let unreadable = |e: std::io::Error| SyncError::FolderUnreadable {
        path: folder.to_path_buf(),
        reason: e.to_string(),
    };

    let mut entries = tokio::fs::read_dir(folder).await.map_err(unreadable)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden {
            continue;
        }

        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        match LocalVideoFile::from_path(&path) {
            Some(file) => files.push(file),
            None => tracing::warn!(path = %path.display(), "Skipping file without a usable name"),
        }
    }

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(files)
}
