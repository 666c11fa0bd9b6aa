//! HTTP handlers for archive endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::application::handlers::archive::{
    GetArchiveVideoHandler, GetArchiveVideoQuery, RegisterArchiveVideoCommand,
    RegisterArchiveVideoHandler, RegisterArchiveVideoResult,
};
use crate::domain::foundation::{ArchiveVideoId, DomainError, ErrorCode};
use crate::ports::{ArchiveVideoRepository, Clock};

use super::dto::{ArchiveVideoResponse, ErrorResponse, RegisterArchiveVideoRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ArchiveAppState {
    pub archive_repository: Arc<dyn ArchiveVideoRepository>,
    pub clock: Arc<dyn Clock>,
    /// Bearer token the uploader must present. Open when `None`.
    pub ingest_token: Option<SecretString>,
}

impl ArchiveAppState {
    pub fn register_handler(&self) -> RegisterArchiveVideoHandler {
        RegisterArchiveVideoHandler::new(self.archive_repository.clone(), self.clock.clone())
    }

    pub fn get_handler(&self) -> GetArchiveVideoHandler {
        GetArchiveVideoHandler::new(self.archive_repository.clone())
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), ArchiveApiError> {
        let Some(expected) = &self.ingest_token else {
            return Ok(());
        };

        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ArchiveApiError::Unauthorized)?;

        if bool::from(
            presented
                .as_bytes()
                .ct_eq(expected.expose_secret().as_bytes()),
        ) {
            Ok(())
        } else {
            Err(ArchiveApiError::Unauthorized)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/archive-videos - Register an uploaded video
///
/// Returns 201 for a new video and 200 with the stored video when the title
/// was registered before.
pub async fn register_archive_video(
    State(state): State<ArchiveAppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterArchiveVideoRequest>,
) -> Result<impl IntoResponse, ArchiveApiError> {
    state.authorize(&headers)?;

    let handler = state.register_handler();
    let cmd = RegisterArchiveVideoCommand {
        title: request.title,
        video_url: request.video_url,
        show_notes: request.show_notes,
        questions: request
            .questions
            .into_iter()
            .map(|q| (q.timestamp_seconds, q.question_text))
            .collect(),
    };

    let response = match handler.handle(cmd).await? {
        RegisterArchiveVideoResult::Created(video) => {
            (StatusCode::CREATED, Json(ArchiveVideoResponse::from(video)))
        }
        RegisterArchiveVideoResult::AlreadyRegistered(video) => {
            (StatusCode::OK, Json(ArchiveVideoResponse::from(video)))
        }
    };

    Ok(response)
}

/// GET /api/archive-videos/:id - Get a video with its questions
pub async fn get_archive_video(
    State(state): State<ArchiveAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ArchiveApiError> {
    let video_id = id
        .parse::<ArchiveVideoId>()
        .map_err(|_| ArchiveApiError::InvalidId(id))?;

    let video = state
        .get_handler()
        .handle(GetArchiveVideoQuery { video_id })
        .await?;

    Ok(Json(ArchiveVideoResponse::from(video)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub enum ArchiveApiError {
    Unauthorized,
    InvalidId(String),
    Domain(DomainError),
}

impl From<DomainError> for ArchiveApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ArchiveApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ArchiveApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", "Missing or invalid ingest token"),
            ),
            ArchiveApiError::InvalidId(id) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_ID", format!("'{}' is not a video id", id)),
            ),
            ArchiveApiError::Domain(err) => {
                let status = match err.code {
                    ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
                    ErrorCode::ArchiveVideoNotFound | ErrorCode::MemberNotFound => {
                        StatusCode::NOT_FOUND
                    }
                    ErrorCode::MemberExists | ErrorCode::SubscriptionExists => {
                        StatusCode::CONFLICT
                    }
                    ErrorCode::DatabaseError
                    | ErrorCode::ExternalServiceError
                    | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    tracing::error!(error = %err, "Archive request failed");
                }
                (status, ErrorResponse::new(err.code.to_string(), err.message))
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::adapters::memory::InMemoryArchiveVideoRepository;
    use crate::domain::foundation::Timestamp;
    use crate::ports::FixedClock;

    const TOKEN: &str = "ingest-secret-token";

    fn app(ingest_token: Option<&str>) -> (Arc<InMemoryArchiveVideoRepository>, Router) {
        let repo = Arc::new(InMemoryArchiveVideoRepository::new());
        let state = ArchiveAppState {
            archive_repository: repo.clone(),
            clock: Arc::new(FixedClock::new(Timestamp::from_unix_secs(1_700_000_000).unwrap())),
            ingest_token: ingest_token.map(|t| SecretString::new(t.to_string())),
        };
        (repo, super::super::routes::archive_routes().with_state(state))
    }

    fn post(body: serde_json::Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn registration() -> serde_json::Value {
        json!({
            "title": "Weekly Call",
            "video_url": "https://vimeo.com/42",
            "questions": [
                { "timestamp_seconds": 300, "question_text": "Second" },
                { "timestamp_seconds": 30, "question_text": "First" }
            ]
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn register_returns_created_video() {
        let (repo, app) = app(None);

        let response = app.oneshot(post(registration(), None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["title"], "Weekly Call");
        assert_eq!(body["questions"][0]["question_text"], "First");
        assert_eq!(repo.all().await.len(), 1);
    }

    #[tokio::test]
    async fn register_same_title_returns_ok() {
        let (repo, app) = app(None);
        app.clone().oneshot(post(registration(), None)).await.unwrap();

        let response = app.oneshot(post(registration(), None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(repo.all().await.len(), 1);
    }

    #[tokio::test]
    async fn register_requires_configured_token() {
        let (repo, app) = app(Some(TOKEN));

        let missing = app.clone().oneshot(post(registration(), None)).await.unwrap();
        let wrong = app
            .clone()
            .oneshot(post(registration(), Some("not-the-token-at-all")))
            .await
            .unwrap();
        let right = app.oneshot(post(registration(), Some(TOKEN))).await.unwrap();

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(right.status(), StatusCode::CREATED);
        assert_eq!(repo.all().await.len(), 1);
    }

    #[tokio::test]
    async fn blank_title_is_bad_request() {
        let (_, app) = app(None);

        let response = app
            .oneshot(post(json!({ "title": " ", "video_url": "https://vimeo.com/1" }), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn get_returns_stored_video() {
        let (_, app) = app(None);
        let created = body_json(app.clone().oneshot(post(registration(), None)).await.unwrap()).await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], id);
        assert_eq!(body["questions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_unknown_video_is_not_found() {
        let (_, app) = app(None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/{}", ArchiveVideoId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_with_malformed_id_is_bad_request() {
        let (_, app) = app(None);

        let response = app
            .oneshot(Request::builder().uri("/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
