//! Stripe payment provider adapter.
//!
//! - `StripePaymentAdapter`: live subscription lookups for reconciliation
//! - `WebhookVerifier`: `Stripe-Signature` verification
//! - `MockPaymentProvider`: in-process provider for tests
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - API keys and signing secrets are held as `secrecy::SecretString`

mod mock_payment_provider;
mod stripe_adapter;
mod webhook_types;
mod webhook_verifier;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use webhook_types::{SignatureHeader, SignatureParseError, StripeSubscription};
pub use webhook_verifier::{sign_payload, WebhookVerifier};
