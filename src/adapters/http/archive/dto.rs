//! HTTP DTOs for archive endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::archive::{ArchiveVideo, Question};
use crate::domain::foundation::{ArchiveVideoId, Timestamp};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to register an uploaded video.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterArchiveVideoRequest {
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub show_notes: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDto {
    pub timestamp_seconds: u32,
    pub question_text: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveVideoResponse {
    pub id: ArchiveVideoId,
    pub title: String,
    pub video_url: Option<String>,
    pub show_notes: Option<String>,
    pub date_created: Timestamp,
    pub questions: Vec<QuestionDto>,
}

impl From<&Question> for QuestionDto {
    fn from(q: &Question) -> Self {
        Self {
            timestamp_seconds: q.timestamp_seconds,
            question_text: q.question_text.clone(),
        }
    }
}

impl From<ArchiveVideo> for ArchiveVideoResponse {
    fn from(video: ArchiveVideo) -> Self {
        let questions = video.questions().iter().map(QuestionDto::from).collect();
        Self {
            id: video.id,
            title: video.title,
            video_url: video.video_url,
            show_notes: video.show_notes,
            date_created: video.date_created,
            questions,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
