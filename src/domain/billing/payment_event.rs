//! Classified payment provider events.

use std::fmt;

/// Event kinds the reconciliation service reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEventKind {
    InvoicePaymentSucceeded,
    CustomerSubscriptionDeleted,
    CustomerSubscriptionUpdated,
    /// Any other provider event type, kept verbatim.
    Unknown(String),
}

impl PaymentEventKind {
    /// Parses a provider event type string.
    pub fn parse(s: &str) -> Self {
        match s {
            "invoice.payment_succeeded" => Self::InvoicePaymentSucceeded,
            "customer.subscription.deleted" => Self::CustomerSubscriptionDeleted,
            "customer.subscription.updated" => Self::CustomerSubscriptionUpdated,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
            Self::CustomerSubscriptionUpdated => "customer.subscription.updated",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_invoice(&self) -> bool {
        matches!(self, Self::InvoicePaymentSucceeded)
    }
}

impl fmt::Display for PaymentEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an invoice was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingReason {
    /// First invoice of a new subscription.
    SubscriptionCreate,
    /// Periodic renewal.
    SubscriptionCycle,
    Other(String),
}

impl BillingReason {
    pub fn parse(s: &str) -> Self {
        match s {
            "subscription_create" => Self::SubscriptionCreate,
            "subscription_cycle" => Self::SubscriptionCycle,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SubscriptionCreate => "subscription_create",
            Self::SubscriptionCycle => "subscription_cycle",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for BillingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed provider event with the correlation fields extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentHandlerEvent {
    pub event_id: String,
    pub kind: PaymentEventKind,
    /// Provider subscription id (the correlation id).
    pub subscription_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_email: Option<String>,
    pub invoice_id: Option<String>,
}
