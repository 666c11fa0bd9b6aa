//! Archived video aggregate with its timestamped questions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    check_length, require_text, ArchiveVideoId, Timestamp, ValidationError,
};

pub const TITLE_MAX: usize = 200;
pub const VIDEO_URL_MAX: usize = 200;
pub const QUESTION_TEXT_MAX: usize = 500;

/// A question asked during a recorded session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Offset into the video, in seconds.
    pub timestamp_seconds: u32,
    pub question_text: String,
}

impl Question {
    pub fn new(timestamp_seconds: u32, question_text: impl Into<String>) -> Result<Self, ValidationError> {
        let question_text = question_text.into();
        require_text("question_text", &question_text, QUESTION_TEXT_MAX)?;
        Ok(Self {
            timestamp_seconds,
            question_text,
        })
    }
}

/// A recorded session in the members' archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveVideo {
    pub id: ArchiveVideoId,
    pub title: String,
    pub show_notes: Option<String>,
    pub video_url: Option<String>,
    pub date_created: Timestamp,
    questions: Vec<Question>,
}

impl ArchiveVideo {
    pub fn new(
        title: impl Into<String>,
        video_url: Option<String>,
        show_notes: Option<String>,
        date_created: Timestamp,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        require_text("title", &title, TITLE_MAX)?;
        if let Some(url) = &video_url {
            check_length("video_url", url, VIDEO_URL_MAX)?;
        }

        Ok(Self {
            id: ArchiveVideoId::new(),
            title,
            show_notes,
            video_url,
            date_created,
            questions: Vec::new(),
        })
    }

    /// Rebuilds a stored video. Questions are re-sorted by timestamp.
    pub fn restore(
        id: ArchiveVideoId,
        title: String,
        show_notes: Option<String>,
        video_url: Option<String>,
        date_created: Timestamp,
        mut questions: Vec<Question>,
    ) -> Self {
        questions.sort_by_key(|q| q.timestamp_seconds);
        Self {
            id,
            title,
            show_notes,
            video_url,
            date_created,
            questions,
        }
    }

    /// Questions ordered by timestamp.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Inserts a question keeping timestamp order; equal timestamps keep
    /// insertion order.
    pub fn add_question(&mut self, question: Question) {
        let at = self
            .questions
            .partition_point(|q| q.timestamp_seconds <= question.timestamp_seconds);
        self.questions.insert(at, question);
    }
}
