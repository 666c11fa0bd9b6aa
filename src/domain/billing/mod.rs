//! Billing domain module.
//!
//! Classification of payment provider webhooks and the errors raised while
//! reconciling them against members.

pub mod classifier;
mod payment_event;
mod webhook_errors;

pub use classifier::{billing_reason, classify};
pub use payment_event::{BillingReason, PaymentEventKind, PaymentHandlerEvent};
pub use webhook_errors::WebhookError;
