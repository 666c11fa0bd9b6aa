//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_stripe_webhook, BillingAppState};

/// Create the webhook router.
///
/// Mounted at `/api/webhooks`. No user authentication; requests are
/// checked against the Stripe signing secret when one is configured.
///
/// # Routes
/// - `POST /stripe` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}
