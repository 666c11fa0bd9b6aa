//! Archive video repository port.

use async_trait::async_trait;

use crate::domain::archive::ArchiveVideo;
use crate::domain::foundation::{ArchiveVideoId, DomainError};

/// Persistence for archived videos and their questions.
#[async_trait]
pub trait ArchiveVideoRepository: Send + Sync {
    /// Stores a new video with its questions.
    async fn save(&self, video: &ArchiveVideo) -> Result<(), DomainError>;

    /// Loads a video with its questions ordered by timestamp.
    ///
    /// Returns `None` if not found.
    async fn find_with_questions(
        &self,
        id: &ArchiveVideoId,
    ) -> Result<Option<ArchiveVideo>, DomainError>;

    /// Finds a video by exact title.
    async fn find_by_title(&self, title: &str) -> Result<Option<ArchiveVideo>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_video_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ArchiveVideoRepository) {}
    }
}
