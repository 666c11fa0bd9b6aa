//! Response bodies for the webhook endpoint.

use serde::Serialize;

/// Error body returned to the provider.
///
/// Carries only the machine-readable code; the detail stays in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookErrorResponse {
    pub error_code: String,
}

impl WebhookErrorResponse {
    pub fn new(error_code: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
        }
    }
}
