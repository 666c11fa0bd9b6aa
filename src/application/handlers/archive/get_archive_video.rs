//! GetArchiveVideoHandler - Query for a video with its questions.

use std::sync::Arc;

use crate::domain::archive::ArchiveVideo;
use crate::domain::foundation::{ArchiveVideoId, DomainError, ErrorCode};
use crate::ports::ArchiveVideoRepository;

#[derive(Debug, Clone)]
pub struct GetArchiveVideoQuery {
    pub video_id: ArchiveVideoId,
}

pub struct GetArchiveVideoHandler {
    repository: Arc<dyn ArchiveVideoRepository>,
}

impl GetArchiveVideoHandler {
    pub fn new(repository: Arc<dyn ArchiveVideoRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetArchiveVideoQuery) -> Result<ArchiveVideo, DomainError> {
        self.repository
            .find_with_questions(&query.video_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ArchiveVideoNotFound,
                    format!("Archive video {} not found", query.video_id),
                )
            })
    }
}
