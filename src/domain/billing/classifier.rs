//! Webhook event classifier.
//!
//! Pure parsing of provider payloads into [`PaymentHandlerEvent`]. Business
//! legality is decided later by the reconciliation handler.

use serde::Deserialize;
use serde_json::Value;

use super::{BillingReason, PaymentEventKind, PaymentHandlerEvent, WebhookError};

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Option<RawEventData>,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    #[serde(default)]
    object: Value,
}

fn parse(payload: &str) -> Result<RawEvent, WebhookError> {
    serde_json::from_str(payload).map_err(|e| WebhookError::MalformedEvent(e.to_string()))
}

/// Reads a string field that may also arrive expanded as an object with an `id`.
fn id_field(object: &Value, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn str_field(object: &Value, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parses a webhook payload into a typed event.
///
/// # Errors
///
/// `MalformedEvent` when the payload is not JSON or has no `type`.
pub fn classify(payload: &str) -> Result<PaymentHandlerEvent, WebhookError> {
    let raw = parse(payload)?;
    let kind = PaymentEventKind::parse(&raw.event_type);
    let object = raw.data.map(|d| d.object).unwrap_or(Value::Null);

    let (subscription_id, invoice_id, customer_email) = match kind {
        PaymentEventKind::InvoicePaymentSucceeded => (
            id_field(&object, "subscription"),
            str_field(&object, "id"),
            str_field(&object, "customer_email"),
        ),
        PaymentEventKind::CustomerSubscriptionDeleted
        | PaymentEventKind::CustomerSubscriptionUpdated => (str_field(&object, "id"), None, None),
        PaymentEventKind::Unknown(_) => (None, None, None),
    };

    Ok(PaymentHandlerEvent {
        event_id: raw.id,
        kind,
        subscription_id,
        customer_id: id_field(&object, "customer"),
        customer_email,
        invoice_id,
    })
}

/// Extracts the billing reason of an invoice event.
///
/// # Errors
///
/// - `UnsupportedEvent` for non-invoice events
/// - `MalformedEvent` when unparsable or the field is absent
pub fn billing_reason(payload: &str) -> Result<BillingReason, WebhookError> {
    let raw = parse(payload)?;
    let kind = PaymentEventKind::parse(&raw.event_type);
    if !kind.is_invoice() {
        return Err(WebhookError::UnsupportedEvent(format!(
            "billing_reason is only defined for invoice events, got {}",
            kind
        )));
    }

    raw.data
        .as_ref()
        .and_then(|d| str_field(&d.object, "billing_reason"))
        .map(|reason| BillingReason::parse(&reason))
        .ok_or_else(|| WebhookError::MalformedEvent("invoice has no billing_reason".to_string()))
}
