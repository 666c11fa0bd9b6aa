//! PostgreSQL implementation of ArchiveVideoRepository.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::domain::archive::{ArchiveVideo, Question};
use crate::domain::foundation::{ArchiveVideoId, DomainError, ErrorCode, Timestamp};
use crate::ports::ArchiveVideoRepository;

use super::member_repository::db_error;
use super::queries::{self, ArchiveVideoRow, QuestionRow};

pub struct PostgresArchiveVideoRepository {
    pool: PgPool,
}

impl PostgresArchiveVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArchiveVideoRepository for PostgresArchiveVideoRepository {
    async fn save(&self, video: &ArchiveVideo) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let row = ArchiveVideoRow {
            id: *video.id.as_uuid(),
            title: video.title.clone(),
            show_notes: video.show_notes.clone(),
            video_url: video.video_url.clone(),
            date_created: *video.date_created.as_datetime(),
        };
        queries::insert_archive_video(&mut tx, &row)
            .await
            .map_err(|e| db_error("Failed to insert archive video", e))?;

        for (position, question) in video.questions().iter().enumerate() {
            let question_row = QuestionRow {
                timestamp_seconds: i32::try_from(question.timestamp_seconds).map_err(|_| {
                    DomainError::new(ErrorCode::ValidationFailed, "Question timestamp too large")
                })?,
                question_text: question.question_text.clone(),
            };
            let position = i32::try_from(position).map_err(|_| {
                DomainError::new(ErrorCode::ValidationFailed, "Too many questions")
            })?;
            queries::insert_question(&mut tx, row.id, position, &question_row)
                .await
                .map_err(|e| db_error("Failed to insert question", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        Ok(())
    }

    async fn find_with_questions(
        &self,
        id: &ArchiveVideoId,
    ) -> Result<Option<ArchiveVideo>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("Failed to acquire connection", e))?;

        let row = queries::fetch_archive_video(&mut conn, *id.as_uuid())
            .await
            .map_err(|e| db_error("Failed to find archive video", e))?;

        match row {
            Some(row) => load_video(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<ArchiveVideo>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("Failed to acquire connection", e))?;

        let row = queries::fetch_archive_video_by_title(&mut conn, title)
            .await
            .map_err(|e| db_error("Failed to find archive video", e))?;

        match row {
            Some(row) => load_video(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }
}

async fn load_video(
    conn: &mut PgConnection,
    row: ArchiveVideoRow,
) -> Result<ArchiveVideo, DomainError> {
    let questions = queries::fetch_questions(conn, row.id)
        .await
        .map_err(|e| db_error("Failed to load questions", e))?
        .into_iter()
        .map(question_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ArchiveVideo::restore(
        ArchiveVideoId::from_uuid(row.id),
        row.title,
        row.show_notes,
        row.video_url,
        Timestamp::from_datetime(row.date_created),
        questions,
    ))
}

fn question_from_row(row: QuestionRow) -> Result<Question, DomainError> {
    let timestamp_seconds = u32::try_from(row.timestamp_seconds).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative question timestamp: {}", row.timestamp_seconds),
        )
    })?;

    Ok(Question {
        timestamp_seconds,
        question_text: row.question_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_row_maps_to_question() {
        let question = question_from_row(QuestionRow {
            timestamp_seconds: 95,
            question_text: "How do I test this?".to_string(),
        })
        .unwrap();

        assert_eq!(question.timestamp_seconds, 95);
    }

    #[test]
    fn negative_timestamp_is_corrupt_data() {
        let result = question_from_row(QuestionRow {
            timestamp_seconds: -1,
            question_text: "?".to_string(),
        });

        assert_eq!(result.unwrap_err().code, ErrorCode::DatabaseError);
    }
}
