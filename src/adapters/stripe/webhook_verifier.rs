//! Stripe webhook signature verification.
//!
//! Stripe signs `"{timestamp}.{raw body}"` with HMAC-SHA256 using the
//! endpoint's signing secret. Comparison is constant-time and the timestamp
//! must fall inside the replay window.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::billing::WebhookError;
use crate::domain::foundation::Timestamp;

use super::webhook_types::SignatureHeader;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps.
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies the raw body against the `Stripe-Signature` header value.
    pub fn verify(&self, payload: &[u8], header: &str, now: Timestamp) -> Result<(), WebhookError> {
        let header = SignatureHeader::parse(header).map_err(|e| {
            tracing::warn!(error = %e, "Unparsable Stripe-Signature header");
            WebhookError::InvalidSignature
        })?;

        let now = now.as_unix_secs();
        let age = now - header.timestamp;
        if age > MAX_TIMESTAMP_AGE_SECS || age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                age_secs = age,
                "Webhook timestamp outside tolerance"
            );
            return Err(WebhookError::TimestampOutOfRange);
        }

        let expected = self.sign(header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| expected.as_slice().ct_eq(candidate.as_slice()).into());

        if !matched {
            tracing::warn!(event_timestamp = header.timestamp, "Invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    fn sign(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

/// Builds a `Stripe-Signature` header value. Used by tests and local tooling.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &str) -> String {
    let verifier = WebhookVerifier::new(SecretString::new(secret.to_string()));
    let signature = verifier
        .sign(timestamp, payload.as_bytes())
        .unwrap_or_default();
    format!("t={},v1={}", timestamp, super::webhook_types::hex_encode(&signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &str = r#"{"id":"evt_test","type":"invoice.payment_succeeded"}"#;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SecretString::new(SECRET.to_string()))
    }

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1_704_067_200).unwrap()
    }

    #[test]
    fn accepts_valid_signature() {
        let header = sign_payload(SECRET, 1_704_067_200, PAYLOAD);
        assert!(verifier().verify(PAYLOAD.as_bytes(), &header, now()).is_ok());
    }

    #[test]
    fn rejects_signature_from_other_secret() {
        let header = sign_payload("wrong_secret", 1_704_067_200, PAYLOAD);
        let result = verifier().verify(PAYLOAD.as_bytes(), &header, now());
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn rejects_tampered_payload() {
        let header = sign_payload(SECRET, 1_704_067_200, PAYLOAD);
        let result = verifier().verify(b"{\"id\":\"evt_other\"}", &header, now());
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn accepts_when_any_v1_matches() {
        let good = sign_payload(SECRET, 1_704_067_200, PAYLOAD);
        let good_sig = good.split_once(",v1=").unwrap().1;
        let header = format!("t=1704067200,v1=00ff,v1={}", good_sig);
        assert!(verifier().verify(PAYLOAD.as_bytes(), &header, now()).is_ok());
    }

    #[test]
    fn rejects_expired_timestamp() {
        let header = sign_payload(SECRET, 1_704_067_200 - 301, PAYLOAD);
        let result = verifier().verify(PAYLOAD.as_bytes(), &header, now());
        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn tolerates_small_clock_skew() {
        let header = sign_payload(SECRET, 1_704_067_200 + 30, PAYLOAD);
        assert!(verifier().verify(PAYLOAD.as_bytes(), &header, now()).is_ok());
    }

    #[test]
    fn rejects_far_future_timestamp() {
        let header = sign_payload(SECRET, 1_704_067_200 + 120, PAYLOAD);
        let result = verifier().verify(PAYLOAD.as_bytes(), &header, now());
        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn rejects_malformed_header() {
        let result = verifier().verify(PAYLOAD.as_bytes(), "garbage", now());
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }
}
