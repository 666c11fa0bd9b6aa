//! Subscription entity owned by a member.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DateTimeRange, MemberId, SubscriptionId, Timestamp};

/// A paid subscription, correlated to the payment provider by
/// `payment_subscription_id`.
///
/// Subscriptions are never deleted; cancellation sets an end date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub member_id: MemberId,

    /// Provider subscription id (e.g. `sub_...`), unique across members.
    pub payment_subscription_id: String,

    /// Validity window.
    pub dates: DateTimeRange,

    /// Last invoice confirmed against this subscription.
    pub last_invoice_id: Option<String>,
}

impl Subscription {
    pub(crate) fn start(
        member_id: MemberId,
        payment_subscription_id: impl Into<String>,
        invoice_id: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: SubscriptionId::new(),
            member_id,
            payment_subscription_id: payment_subscription_id.into(),
            dates: DateTimeRange::starting_at(now),
            last_invoice_id: invoice_id,
        }
    }

    pub fn is_active_at(&self, at: Timestamp) -> bool {
        self.dates.is_active_at(at)
    }

    /// True once the end date has been reached.
    pub fn has_ended_by(&self, at: Timestamp) -> bool {
        matches!(self.dates.end(), Some(end) if !end.is_after(&at))
    }

    /// True when an end date lies in the future.
    pub fn is_cancellation_scheduled(&self, at: Timestamp) -> bool {
        matches!(self.dates.end(), Some(end) if end.is_after(&at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_subscription_is_open_ended() {
        let now = Timestamp::now();
        let sub = Subscription::start(MemberId::new(), "sub_1", None, now);
        assert!(sub.is_active_at(now));
        assert!(sub.dates.end().is_none());
        assert!(!sub.has_ended_by(now));
    }

    #[test]
    fn scheduled_end_is_not_ended_yet() {
        let now = Timestamp::now();
        let mut sub = Subscription::start(MemberId::new(), "sub_1", None, now);
        sub.dates = sub.dates.with_end(now.add_days(10));

        assert!(sub.is_cancellation_scheduled(now));
        assert!(!sub.has_ended_by(now));
        assert!(sub.has_ended_by(now.add_days(10)));
    }
}
