//! Port for registering uploaded videos with the web application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registration payload sent to the archive API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveVideoRegistration {
    pub title: String,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveApiError {
    #[error("Archive API request failed: {0}")]
    Request(String),

    #[error("Archive API returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[async_trait]
pub trait ArchiveRegistry: Send + Sync {
    async fn register(&self, video: &ArchiveVideoRegistration) -> Result<(), ArchiveApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_registry_is_object_safe() {
        fn _accepts_dyn(_registry: &dyn ArchiveRegistry) {}
    }

    #[test]
    fn registration_omits_missing_show_notes() {
        let json = serde_json::to_value(ArchiveVideoRegistration {
            title: "t".into(),
            video_url: "https://vimeo.com/1".into(),
            show_notes: None,
        })
        .unwrap();
        assert!(json.get("show_notes").is_none());
    }
}
