//! RegisterArchiveVideoHandler - Stores a video reported by the uploader.

use std::sync::Arc;

use crate::domain::archive::{ArchiveVideo, Question};
use crate::domain::foundation::DomainError;
use crate::ports::{ArchiveVideoRepository, Clock};

/// Command to register an uploaded video.
#[derive(Debug, Clone)]
pub struct RegisterArchiveVideoCommand {
    pub title: String,
    pub video_url: String,
    pub show_notes: Option<String>,
    /// `(timestamp_seconds, text)` pairs.
    pub questions: Vec<(u32, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterArchiveVideoResult {
    Created(ArchiveVideo),
    /// A video with this title was registered before; it is returned as is.
    AlreadyRegistered(ArchiveVideo),
}

pub struct RegisterArchiveVideoHandler {
    repository: Arc<dyn ArchiveVideoRepository>,
    clock: Arc<dyn Clock>,
}

impl RegisterArchiveVideoHandler {
    pub fn new(repository: Arc<dyn ArchiveVideoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn handle(
        &self,
        cmd: RegisterArchiveVideoCommand,
    ) -> Result<RegisterArchiveVideoResult, DomainError> {
        let mut video = ArchiveVideo::new(
            cmd.title,
            Some(cmd.video_url),
            cmd.show_notes,
            self.clock.now(),
        )?;
        for (timestamp_seconds, text) in cmd.questions {
            video.add_question(Question::new(timestamp_seconds, text)?);
        }

        if let Some(existing) = self.repository.find_by_title(&video.title).await? {
            tracing::info!(video_id = %existing.id, title = %existing.title, "Archive video already registered");
            return Ok(RegisterArchiveVideoResult::AlreadyRegistered(existing));
        }

        self.repository.save(&video).await?;
        tracing::info!(video_id = %video.id, title = %video.title, "Registered archive video");

        Ok(RegisterArchiveVideoResult::Created(video))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryArchiveVideoRepository;
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use crate::ports::FixedClock;

    fn handler() -> (Arc<InMemoryArchiveVideoRepository>, RegisterArchiveVideoHandler) {
        let repo = Arc::new(InMemoryArchiveVideoRepository::new());
        let clock = Arc::new(FixedClock::new(Timestamp::from_unix_secs(1_700_000_000).unwrap()));
        (repo.clone(), RegisterArchiveVideoHandler::new(repo, clock))
    }

    fn command(title: &str) -> RegisterArchiveVideoCommand {
        RegisterArchiveVideoCommand {
            title: title.to_string(),
            video_url: "https://vimeo.com/123".to_string(),
            show_notes: None,
            questions: vec![(90, "How do I test this?".into()), (10, "Intro question".into())],
        }
    }

    #[tokio::test]
    async fn stores_new_video_with_ordered_questions() {
        let (repo, handler) = handler();

        let result = handler.handle(command("Weekly Call")).await.unwrap();

        let video = match result {
            RegisterArchiveVideoResult::Created(video) => video,
            other => panic!("Expected Created, got {:?}", other),
        };
        assert_eq!(video.questions()[0].timestamp_seconds, 10);
        assert_eq!(video.date_created.as_unix_secs(), 1_700_000_000);
        assert_eq!(repo.all().await.len(), 1);
    }

    #[tokio::test]
    async fn same_title_returns_existing_video() {
        let (repo, handler) = handler();
        handler.handle(command("Weekly Call")).await.unwrap();

        let result = handler.handle(command("Weekly Call")).await.unwrap();

        assert!(matches!(result, RegisterArchiveVideoResult::AlreadyRegistered(_)));
        assert_eq!(repo.all().await.len(), 1);
    }

    #[tokio::test]
    async fn blank_title_is_validation_error() {
        let (_, handler) = handler();
        let err = handler.handle(command("  ")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
