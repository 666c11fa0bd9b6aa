//! Result of one synchronization run.

use std::path::{Path, PathBuf};

use super::UploadError;

/// A local file eligible for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVideoFile {
    pub path: PathBuf,
    /// File stem, used as the remote video name.
    pub title: String,
}

impl LocalVideoFile {
    /// Builds an entry from a path; `None` when the path has no usable stem.
    pub fn from_path(path: &Path) -> Option<Self> {
        let title = path.file_stem()?.to_str()?.to_string();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            path: path.to_path_buf(),
            title,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedVideo {
    pub title: String,
    pub video_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub file: PathBuf,
    pub title: String,
    pub error: UploadError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: Vec<UploadedVideo>,
    pub skipped: Vec<String>,
    pub failed: Vec<FailedUpload>,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.uploaded.len() + self.skipped.len() + self.failed.len()
    }
}
