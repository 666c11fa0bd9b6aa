//! HTTP handler for Stripe webhooks.
//!
//! Connects the webhook route to the reconciliation handler. The provider only
//! looks at the status code: 2xx acknowledges the event, anything else makes
//! Stripe redeliver it later.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::stripe::WebhookVerifier;
use crate::application::handlers::billing::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
};
use crate::domain::billing::WebhookError;
use crate::ports::{Clock, MemberRepository, PaymentProvider};

use super::dto::WebhookErrorResponse;

const SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for webhook routes.
#[derive(Clone)]
pub struct BillingAppState {
    pub member_repository: Arc<dyn MemberRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub clock: Arc<dyn Clock>,
    /// Signature verification is skipped when no signing secret is configured.
    pub verifier: Option<WebhookVerifier>,
}

impl BillingAppState {
    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.member_repository.clone(),
            self.payment_provider.clone(),
            self.clock.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Handler
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/stripe - Handle Stripe webhooks
pub async fn handle_stripe_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let payload = String::from_utf8(body.to_vec()).map_err(|_| {
        WebhookApiError::new(
            WebhookError::MalformedEvent("body is not UTF-8".to_string()),
            String::new(),
        )
    })?;

    if let Some(verifier) = &state.verifier {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| WebhookApiError::new(WebhookError::InvalidSignature, payload.clone()))?;

        verifier
            .verify(payload.as_bytes(), signature, state.clock.now())
            .map_err(|e| WebhookApiError::new(e, payload.clone()))?;
    }

    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        payload: payload.clone(),
    };

    match handler.handle(cmd).await {
        Ok(result) => {
            tracing::info!(outcome = ?result, "Stripe webhook processed");
            Ok(StatusCode::OK)
        }
        Err(error) => Err(WebhookApiError::new(error, payload)),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Webhook failure together with the payload that caused it.
pub struct WebhookApiError {
    error: WebhookError,
    payload: String,
}

impl WebhookApiError {
    pub fn new(error: WebhookError, payload: String) -> Self {
        Self { error, payload }
    }

    pub fn error(&self) -> &WebhookError {
        &self.error
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            tracing::error!(
                error_code = self.error.code(),
                error = %self.error,
                retryable = self.error.is_retryable(),
                payload = %self.payload,
                "Stripe webhook failed"
            );
        } else {
            tracing::warn!(
                error_code = self.error.code(),
                error = %self.error,
                payload = %self.payload,
                "Stripe webhook rejected"
            );
        }

        (status, Json(WebhookErrorResponse::new(self.error.code()))).into_response()
    }
}
