//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured subscriptions
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;
use crate::ports::{PaymentError, PaymentProvider, ProviderSubscription, SubscriptionStatus};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.add_subscription(MockPaymentProvider::subscription("sub_1", "cus_1", true, period_end));
/// mock.set_error(PaymentError::network("offline"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Pre-configured subscriptions by ID.
    subscriptions: HashMap<String, ProviderSubscription>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Error returned on every call until cleared.
    sticky_error: Option<PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an active provider subscription.
    pub fn subscription(
        id: &str,
        customer_id: &str,
        cancel_at_period_end: bool,
        current_period_end: Timestamp,
    ) -> ProviderSubscription {
        ProviderSubscription {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            status: SubscriptionStatus::Active,
            cancel_at_period_end,
            current_period_end: Some(current_period_end),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a subscription to the "database".
    pub fn add_subscription(&self, subscription: ProviderSubscription) {
        let id = subscription.id.clone();
        self.state().subscriptions.insert(id, subscription);
    }

    /// Set an error to return on the next call.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Fail every call until `clear_errors`.
    pub fn set_unavailable(&self, error: PaymentError) {
        self.state().sticky_error = Some(error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.sticky_error = None;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self) -> Result<(), PaymentError> {
        let mut state = self.state();
        if let Some(error) = &state.sticky_error {
            return Err(error.clone());
        }
        match state.next_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<ProviderSubscription>, PaymentError> {
        self.record_call("get_subscription", vec![subscription_id.to_string()]);
        self.check_error()?;

        Ok(self.state().subscriptions.get(subscription_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_subscription() {
        let mock = MockPaymentProvider::new();
        let period_end = Timestamp::now().add_days(30);
        mock.add_subscription(MockPaymentProvider::subscription("sub_1", "cus_1", true, period_end));

        let sub = mock.get_subscription("sub_1").await.unwrap().unwrap();
        assert!(sub.cancel_at_period_end);
        assert_eq!(sub.current_period_end, Some(period_end));
        assert_eq!(mock.call_count("get_subscription"), 1);
    }

    #[tokio::test]
    async fn unknown_subscription_is_none() {
        let mock = MockPaymentProvider::new();
        assert!(mock.get_subscription("sub_x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn next_error_is_consumed() {
        let mock = MockPaymentProvider::new();
        mock.set_error(PaymentError::network("offline"));

        assert!(mock.get_subscription("sub_1").await.is_err());
        assert!(mock.get_subscription("sub_1").await.is_ok());
    }

    #[tokio::test]
    async fn sticky_error_persists_until_cleared() {
        let mock = MockPaymentProvider::new();
        mock.set_unavailable(PaymentError::network("offline"));

        assert!(mock.get_subscription("sub_1").await.is_err());
        assert!(mock.get_subscription("sub_1").await.is_err());
        mock.clear_errors();
        assert!(mock.get_subscription("sub_1").await.is_ok());
    }

    #[tokio::test]
    async fn records_call_arguments() {
        let mock = MockPaymentProvider::new();
        let _ = mock.get_subscription("sub_42").await;
        assert_eq!(mock.calls()[0].args, vec!["sub_42".to_string()]);
    }
}
