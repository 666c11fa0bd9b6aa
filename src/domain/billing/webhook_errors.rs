//! Webhook error types for payment provider webhook handling.
//!
//! Defines all error conditions that can occur while classifying and
//! reconciling a webhook, with HTTP status code mapping and retryability.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::domain::member::MemberError;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Payload is not valid JSON or lacks a required structural field.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Operation does not apply to this event kind.
    #[error("Unsupported event: {0}")]
    UnsupportedEvent(String),

    /// Event type has no reconciliation rule.
    #[error("Unhandled Stripe event type: {0}")]
    UnhandledEventType(String),

    /// No member correlates to the event.
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// Member is known but owns no matching subscription.
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    /// Creation would give the member a second active subscription.
    #[error("Active subscription exists: {0}")]
    ActiveSubscriptionExists(String),

    /// Payment provider could not be reached or returned an error.
    #[error("Payment provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Attempted transition is not valid.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the provider should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Database(_)
                | WebhookError::ProviderUnavailable(_)
                | WebhookError::MemberNotFound(_)
                | WebhookError::SubscriptionNotFound(_)
        )
    }

    /// Maps the error to an HTTP status code.
    ///
    /// - 4xx: client error, provider stops retrying
    /// - 5xx: server error, provider retries
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => {
                StatusCode::UNAUTHORIZED
            }

            WebhookError::MalformedEvent(_) | WebhookError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }

            WebhookError::UnsupportedEvent(_)
            | WebhookError::UnhandledEventType(_)
            | WebhookError::MemberNotFound(_)
            | WebhookError::SubscriptionNotFound(_)
            | WebhookError::ActiveSubscriptionExists(_)
            | WebhookError::ProviderUnavailable(_)
            | WebhookError::InvalidTransition(_)
            | WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code returned in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MalformedEvent(_) => "MALFORMED_EVENT",
            WebhookError::UnsupportedEvent(_) => "UNSUPPORTED_EVENT",
            WebhookError::UnhandledEventType(_) => "UNHANDLED_EVENT_TYPE",
            WebhookError::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            WebhookError::SubscriptionNotFound(_) => "SUBSCRIPTION_NOT_FOUND",
            WebhookError::ActiveSubscriptionExists(_) => "ACTIVE_SUBSCRIPTION_EXISTS",
            WebhookError::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::TimestampOutOfRange => "TIMESTAMP_OUT_OF_RANGE",
            WebhookError::MissingField(_) => "MISSING_FIELD",
            WebhookError::InvalidTransition(_) => "INVALID_TRANSITION",
            WebhookError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<MemberError> for WebhookError {
    fn from(err: MemberError) -> Self {
        let message = err.to_string();
        match err {
            MemberError::ActiveSubscriptionExists { .. } => {
                WebhookError::ActiveSubscriptionExists(message)
            }
            MemberError::SubscriptionNotFound {
                payment_subscription_id,
                ..
            } => WebhookError::SubscriptionNotFound(payment_subscription_id),
            MemberError::Validation(_) => WebhookError::InvalidTransition(message),
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{MemberId, ValidationError};

    // ══════════════════════════════════════════════════════════════
    // Display
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn unhandled_event_type_names_the_type() {
        let err = WebhookError::UnhandledEventType("foo.bar".to_string());
        assert_eq!(format!("{}", err), "Unhandled Stripe event type: foo.bar");
    }

    #[test]
    fn missing_field_displays_field_name() {
        let err = WebhookError::MissingField("subscription");
        assert_eq!(format!("{}", err), "Missing field: subscription");
    }

    // ══════════════════════════════════════════════════════════════
    // Retryability
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn infrastructure_failures_are_retryable() {
        assert!(WebhookError::Database("down".into()).is_retryable());
        assert!(WebhookError::ProviderUnavailable("timeout".into()).is_retryable());
    }

    #[test]
    fn member_not_found_is_retryable() {
        assert!(WebhookError::MemberNotFound("cus_1".into()).is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!WebhookError::InvalidSignature.is_retryable());
        assert!(!WebhookError::MalformedEvent("bad".into()).is_retryable());
        assert!(!WebhookError::UnhandledEventType("foo.bar".into()).is_retryable());
    }

    // ══════════════════════════════════════════════════════════════
    // Status codes
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn malformed_and_missing_field_are_bad_request() {
        assert_eq!(
            WebhookError::MalformedEvent("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::MissingField("customer_email").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn signature_failures_are_unauthorized() {
        assert_eq!(WebhookError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            WebhookError::TimestampOutOfRange.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn unhandled_event_type_is_server_error() {
        let err = WebhookError::UnhandledEventType("foo.bar".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "UNHANDLED_EVENT_TYPE");
    }

    // ══════════════════════════════════════════════════════════════
    // Conversion
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn member_errors_convert() {
        let id = MemberId::new();
        assert!(matches!(
            WebhookError::from(MemberError::subscription_not_found(id, "sub_1")),
            WebhookError::SubscriptionNotFound(s) if s == "sub_1"
        ));
        assert!(matches!(
            WebhookError::from(MemberError::active_subscription_exists(id, "sub_1")),
            WebhookError::ActiveSubscriptionExists(_)
        ));
        assert!(matches!(
            WebhookError::from(MemberError::Validation(ValidationError::empty_field("email"))),
            WebhookError::InvalidTransition(_)
        ));
    }
}
