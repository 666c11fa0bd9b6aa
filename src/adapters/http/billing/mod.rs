//! HTTP adapter for payment provider webhooks.
//!
//! - `POST /api/webhooks/stripe` - Reconcile a Stripe event with member subscriptions

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::WebhookErrorResponse;
pub use handlers::{handle_stripe_webhook, BillingAppState, WebhookApiError};
pub use routes::webhook_routes;
