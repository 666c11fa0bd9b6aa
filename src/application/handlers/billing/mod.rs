//! Billing handlers.
//!
//! ## Commands
//! - Reconciling payment provider webhooks with member subscriptions
//!
//! ## Queries
//! - Live subscription lookups against the provider

mod handle_payment_webhook;
mod provider_lookup;

pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
pub use provider_lookup::{cancel_at_period_end, lookup_subscription};
