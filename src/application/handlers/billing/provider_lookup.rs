//! Live subscription lookups against the payment provider.

use crate::domain::billing::WebhookError;
use crate::domain::foundation::Timestamp;
use crate::ports::{PaymentProvider, ProviderSubscription};

/// Fetches the provider's record for a subscription.
///
/// # Errors
///
/// - `ProviderUnavailable` when the provider cannot be reached or errors
/// - `SubscriptionNotFound` when the provider does not know the id
pub async fn lookup_subscription(
    provider: &dyn PaymentProvider,
    subscription_id: &str,
) -> Result<ProviderSubscription, WebhookError> {
    provider
        .get_subscription(subscription_id)
        .await
        .map_err(|e| WebhookError::ProviderUnavailable(e.to_string()))?
        .ok_or_else(|| WebhookError::SubscriptionNotFound(subscription_id.to_string()))
}

/// Whether the provider will cancel the subscription when the paid period
/// ends, answered with the period end so callers need one remote call.
///
/// Returns `Some(period_end)` when the flag is set and `None` otherwise.
///
/// # Errors
///
/// As [`lookup_subscription`], plus `MissingField` when the flag is set but
/// the provider reports no current period end.
pub async fn cancel_at_period_end(
    provider: &dyn PaymentProvider,
    subscription_id: &str,
) -> Result<Option<Timestamp>, WebhookError> {
    let remote = lookup_subscription(provider, subscription_id).await?;
    if !remote.cancel_at_period_end {
        return Ok(None);
    }
    remote
        .current_period_end
        .map(Some)
        .ok_or(WebhookError::MissingField("current_period_end"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::PaymentError;

    #[tokio::test]
    async fn reports_period_end_when_flag_is_set() {
        let provider = MockPaymentProvider::new();
        let period_end = Timestamp::from_unix_secs(1_706_745_600).unwrap();
        provider.add_subscription(MockPaymentProvider::subscription(
            "sub_1", "cus_1", true, period_end,
        ));

        assert_eq!(
            cancel_at_period_end(&provider, "sub_1").await.unwrap(),
            Some(period_end)
        );
        assert_eq!(provider.call_count("get_subscription"), 1);
    }

    #[tokio::test]
    async fn cleared_flag_is_none() {
        let provider = MockPaymentProvider::new();
        provider.add_subscription(MockPaymentProvider::subscription(
            "sub_1",
            "cus_1",
            false,
            Timestamp::now(),
        ));

        assert_eq!(cancel_at_period_end(&provider, "sub_1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_subscription_is_not_found() {
        let provider = MockPaymentProvider::new();
        let result = cancel_at_period_end(&provider, "sub_x").await;
        assert!(matches!(result, Err(WebhookError::SubscriptionNotFound(id)) if id == "sub_x"));
    }

    #[tokio::test]
    async fn provider_failure_is_unavailable() {
        let provider = MockPaymentProvider::new();
        provider.set_error(PaymentError::network("connection refused"));

        let result = cancel_at_period_end(&provider, "sub_1").await;
        assert!(matches!(result, Err(WebhookError::ProviderUnavailable(_))));
    }
}
