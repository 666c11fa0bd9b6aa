//! Top-level application router.

use std::time::Duration;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::archive::{archive_routes, ArchiveAppState};
use super::billing::{webhook_routes, BillingAppState};

/// Assemble every route with its state.
///
/// # Routes
/// - `GET /health` - Liveness
/// - `POST /api/webhooks/stripe` - Stripe webhooks
/// - `POST /api/archive-videos`, `GET /api/archive-videos/:id` - Video archive
pub fn build_router(
    billing: BillingAppState,
    archive: ArchiveAppState,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/webhooks", webhook_routes().with_state(billing))
        .nest("/api/archive-videos", archive_routes().with_state(archive))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::{InMemoryArchiveVideoRepository, InMemoryMemberRepository};
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::SystemClock;

    fn router() -> Router {
        let billing = BillingAppState {
            member_repository: Arc::new(InMemoryMemberRepository::new()),
            payment_provider: Arc::new(MockPaymentProvider::new()),
            clock: Arc::new(SystemClock),
            verifier: None,
        };
        let archive = ArchiveAppState {
            archive_repository: Arc::new(InMemoryArchiveVideoRepository::new()),
            clock: Arc::new(SystemClock),
            ingest_token: None,
        };
        build_router(billing, archive, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = router()
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn webhook_route_rejects_get() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/webhooks/stripe")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
