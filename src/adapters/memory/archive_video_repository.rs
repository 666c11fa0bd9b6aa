//! In-memory archive video repository.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::archive::ArchiveVideo;
use crate::domain::foundation::{ArchiveVideoId, DomainError};
use crate::ports::ArchiveVideoRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryArchiveVideoRepository {
    videos: Arc<RwLock<Vec<ArchiveVideo>>>,
}

impl InMemoryArchiveVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<ArchiveVideo> {
        self.videos.read().await.clone()
    }
}

#[async_trait]
impl ArchiveVideoRepository for InMemoryArchiveVideoRepository {
    async fn save(&self, video: &ArchiveVideo) -> Result<(), DomainError> {
        let mut videos = self.videos.write().await;
        match videos.iter_mut().find(|v| v.id == video.id) {
            Some(existing) => *existing = video.clone(),
            None => videos.push(video.clone()),
        }
        Ok(())
    }

    async fn find_with_questions(
        &self,
        id: &ArchiveVideoId,
    ) -> Result<Option<ArchiveVideo>, DomainError> {
        Ok(self.videos.read().await.iter().find(|v| &v.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<ArchiveVideo>, DomainError> {
        Ok(self
            .videos
            .read()
            .await
            .iter()
            .find(|v| v.title == title)
            .cloned())
    }
}
