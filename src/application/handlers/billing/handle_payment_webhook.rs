//! HandlePaymentWebhookHandler - Reconciles payment provider webhooks with
//! member subscriptions.
//!
//! | Event | Transition |
//! |-------|------------|
//! | `invoice.payment_succeeded` + `subscription_create` | start subscription (member found by email or registered) |
//! | `invoice.payment_succeeded` + `subscription_cycle` | record renewal invoice |
//! | `customer.subscription.deleted` | end subscription now |
//! | `customer.subscription.updated` | schedule or withdraw cancellation per the provider's live flag |
//!
//! Each event runs in one unit of work holding the member's row lock.

use std::sync::Arc;

use crate::domain::billing::{
    billing_reason, classify, BillingReason, PaymentEventKind, PaymentHandlerEvent, WebhookError,
};
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::{Member, MemberSpec, SubscriptionTransition};
use crate::ports::{Clock, MemberRepository, MemberUnitOfWork, PaymentProvider};

use super::provider_lookup::cancel_at_period_end;

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload (already signature-checked when a secret is set).
    pub payload: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    SubscriptionStarted {
        member_id: MemberId,
        subscription_id: String,
    },
    SubscriptionRenewed {
        member_id: MemberId,
        subscription_id: String,
    },
    SubscriptionEnded {
        member_id: MemberId,
        subscription_id: String,
    },
    CancellationScheduled {
        member_id: MemberId,
        subscription_id: String,
        ends_at: Timestamp,
    },
    CancellationWithdrawn {
        member_id: MemberId,
        subscription_id: String,
    },
    /// Redelivered event; nothing changed.
    AlreadyApplied {
        member_id: MemberId,
        subscription_id: String,
    },
    /// Event acknowledged but no action taken.
    Acknowledged,
}

/// Handler for processing payment provider webhooks.
pub struct HandlePaymentWebhookHandler {
    repository: Arc<dyn MemberRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    clock: Arc<dyn Clock>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        repository: Arc<dyn MemberRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            payment_provider,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let event = classify(&cmd.payload)?;

        tracing::debug!(
            event_id = %event.event_id,
            event_type = %event.kind,
            subscription_id = ?event.subscription_id,
            "Reconciling payment webhook"
        );

        match &event.kind {
            PaymentEventKind::InvoicePaymentSucceeded => match billing_reason(&cmd.payload)? {
                BillingReason::SubscriptionCreate => self.handle_subscription_created(&event).await,
                BillingReason::SubscriptionCycle => self.handle_renewal(&event).await,
                BillingReason::Other(reason) => {
                    tracing::info!(
                        event_id = %event.event_id,
                        billing_reason = %reason,
                        "Invoice paid with unhandled billing reason, acknowledging"
                    );
                    Ok(HandlePaymentWebhookResult::Acknowledged)
                }
            },
            PaymentEventKind::CustomerSubscriptionDeleted => {
                self.handle_subscription_deleted(&event).await
            }
            PaymentEventKind::CustomerSubscriptionUpdated => {
                self.handle_subscription_updated(&event).await
            }
            PaymentEventKind::Unknown(event_type) => {
                Err(WebhookError::UnhandledEventType(event_type.clone()))
            }
        }
    }

    async fn handle_subscription_created(
        &self,
        event: &PaymentHandlerEvent,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let subscription_id = required_subscription_id(event)?;
        let mut uow = self.repository.begin().await?;

        if let Some(owner) = uow
            .lock_one(&MemberSpec::by_payment_subscription(subscription_id))
            .await?
        {
            return Ok(HandlePaymentWebhookResult::AlreadyApplied {
                member_id: owner.id,
                subscription_id: subscription_id.to_string(),
            });
        }

        let email = event
            .customer_email
            .as_deref()
            .ok_or(WebhookError::MissingField("customer_email"))?;
        let now = self.clock.now();

        let mut member = match uow.lock_one(&MemberSpec::by_email(email)).await? {
            Some(member) => member,
            None => {
                let member = Member::register(email, event.customer_id.clone(), now)?;
                tracing::info!(member_id = %member.id, "Registered member from first payment");
                member
            }
        };

        if member.payment_customer_id.is_none() {
            member.payment_customer_id = event.customer_id.clone();
        }

        let transition =
            member.start_subscription(subscription_id, event.invoice_id.clone(), now)?;
        self.finish(uow, &member, subscription_id, transition, None)
            .await
    }

    async fn handle_renewal(
        &self,
        event: &PaymentHandlerEvent,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let subscription_id = required_subscription_id(event)?;
        let mut uow = self.repository.begin().await?;
        let mut member = lock_subscription_owner(uow.as_mut(), subscription_id, event).await?;

        let transition = member.confirm_renewal(subscription_id, event.invoice_id.as_deref())?;
        self.finish(uow, &member, subscription_id, transition, None)
            .await
    }

    async fn handle_subscription_deleted(
        &self,
        event: &PaymentHandlerEvent,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let subscription_id = required_subscription_id(event)?;
        let mut uow = self.repository.begin().await?;
        let mut member = lock_subscription_owner(uow.as_mut(), subscription_id, event).await?;

        let transition = member.end_subscription(subscription_id, self.clock.now())?;
        self.finish(uow, &member, subscription_id, transition, None)
            .await
    }

    async fn handle_subscription_updated(
        &self,
        event: &PaymentHandlerEvent,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let subscription_id = required_subscription_id(event)?;

        // Remote call happens before the row lock is taken.
        let scheduled_end =
            cancel_at_period_end(self.payment_provider.as_ref(), subscription_id).await?;

        let mut uow = self.repository.begin().await?;
        let mut member = lock_subscription_owner(uow.as_mut(), subscription_id, event).await?;
        let now = self.clock.now();

        match scheduled_end {
            Some(period_end) => {
                let transition = member.schedule_cancellation(subscription_id, period_end, now)?;
                self.finish(uow, &member, subscription_id, transition, Some(period_end))
                    .await
            }
            None => {
                let transition = member.withdraw_cancellation(subscription_id, now)?;
                self.finish(uow, &member, subscription_id, transition, None)
                    .await
            }
        }
    }

    /// Saves and commits when the transition changed the member; otherwise
    /// the unit of work is dropped.
    async fn finish(
        &self,
        mut uow: Box<dyn MemberUnitOfWork>,
        member: &Member,
        subscription_id: &str,
        transition: SubscriptionTransition,
        ends_at: Option<Timestamp>,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        if transition.is_change() {
            uow.save(member).await?;
            uow.commit().await?;
        }

        tracing::info!(
            member_id = %member.id,
            subscription_id = %subscription_id,
            transition = ?transition,
            "Applied subscription transition"
        );

        let member_id = member.id;
        let subscription_id = subscription_id.to_string();
        Ok(match transition {
            SubscriptionTransition::Started => HandlePaymentWebhookResult::SubscriptionStarted {
                member_id,
                subscription_id,
            },
            SubscriptionTransition::Renewed => HandlePaymentWebhookResult::SubscriptionRenewed {
                member_id,
                subscription_id,
            },
            SubscriptionTransition::Ended => HandlePaymentWebhookResult::SubscriptionEnded {
                member_id,
                subscription_id,
            },
            SubscriptionTransition::CancellationScheduled => match ends_at {
                Some(ends_at) => HandlePaymentWebhookResult::CancellationScheduled {
                    member_id,
                    subscription_id,
                    ends_at,
                },
                None => HandlePaymentWebhookResult::Acknowledged,
            },
            SubscriptionTransition::CancellationWithdrawn => {
                HandlePaymentWebhookResult::CancellationWithdrawn {
                    member_id,
                    subscription_id,
                }
            }
            SubscriptionTransition::AlreadyApplied => HandlePaymentWebhookResult::AlreadyApplied {
                member_id,
                subscription_id,
            },
            SubscriptionTransition::Unchanged => HandlePaymentWebhookResult::Acknowledged,
        })
    }
}

fn required_subscription_id(event: &PaymentHandlerEvent) -> Result<&str, WebhookError> {
    event
        .subscription_id
        .as_deref()
        .ok_or(WebhookError::MissingField("subscription"))
}

/// Locks the member owning `subscription_id`.
///
/// When no member owns it, a member known by the event's customer id turns
/// the failure into `SubscriptionNotFound`; otherwise `MemberNotFound`.
async fn lock_subscription_owner(
    uow: &mut dyn MemberUnitOfWork,
    subscription_id: &str,
    event: &PaymentHandlerEvent,
) -> Result<Member, WebhookError> {
    if let Some(member) = uow
        .lock_one(&MemberSpec::by_payment_subscription(subscription_id))
        .await?
    {
        return Ok(member);
    }

    if let Some(customer_id) = &event.customer_id {
        if uow
            .lock_one(&MemberSpec::by_payment_customer(customer_id.as_str()))
            .await?
            .is_some()
        {
            return Err(WebhookError::SubscriptionNotFound(subscription_id.to_string()));
        }
    }

    Err(WebhookError::MemberNotFound(format!(
        "no member for subscription {} (customer {})",
        subscription_id,
        event.customer_id.as_deref().unwrap_or("unknown")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMemberRepository;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::foundation::DomainError;
    use crate::ports::{FixedClock, PaymentError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    fn t0() -> Timestamp {
        Timestamp::from_unix_secs(1_704_067_200).unwrap()
    }

    struct Harness {
        repo: Arc<InMemoryMemberRepository>,
        provider: MockPaymentProvider,
        clock: Arc<FixedClock>,
        handler: HandlePaymentWebhookHandler,
    }

    fn harness_with(members: Vec<Member>) -> Harness {
        let repo = Arc::new(InMemoryMemberRepository::with_members(members));
        let provider = MockPaymentProvider::new();
        let clock = Arc::new(FixedClock::new(t0()));
        let handler = HandlePaymentWebhookHandler::new(
            repo.clone(),
            Arc::new(provider.clone()),
            clock.clone(),
        );
        Harness {
            repo,
            provider,
            clock,
            handler,
        }
    }

    fn harness() -> Harness {
        harness_with(Vec::new())
    }

    fn subscribed_member() -> Member {
        let mut member =
            Member::register("ada@example.com", Some("cus_1".into()), t0().add_days(-60)).unwrap();
        member
            .start_subscription("sub_1", Some("in_0".into()), t0().add_days(-60))
            .unwrap();
        member
    }

    fn invoice(reason: &str, invoice_id: &str, email: Option<&str>) -> HandlePaymentWebhookCommand {
        let mut object = json!({
            "id": invoice_id,
            "subscription": "sub_1",
            "customer": "cus_1",
            "billing_reason": reason
        });
        if let Some(email) = email {
            object["customer_email"] = json!(email);
        }
        HandlePaymentWebhookCommand {
            payload: json!({
                "id": format!("evt_{}", invoice_id),
                "type": "invoice.payment_succeeded",
                "data": { "object": object }
            })
            .to_string(),
        }
    }

    fn subscription_event(event_type: &str, subscription_id: &str) -> HandlePaymentWebhookCommand {
        HandlePaymentWebhookCommand {
            payload: json!({
                "id": "evt_sub",
                "type": event_type,
                "data": { "object": { "id": subscription_id, "customer": "cus_1" } }
            })
            .to_string(),
        }
    }

    async fn only_member(repo: &InMemoryMemberRepository) -> Member {
        let members = repo.snapshot().await;
        assert_eq!(members.len(), 1);
        members.into_iter().next().unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Subscription creation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creation_registers_member_and_starts_subscription() {
        let h = harness();

        let result = h
            .handler
            .handle(invoice("subscription_create", "in_1", Some("ada@example.com")))
            .await
            .unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::SubscriptionStarted { .. }));
        let member = only_member(&h.repo).await;
        assert_eq!(member.email, "ada@example.com");
        assert_eq!(member.payment_customer_id.as_deref(), Some("cus_1"));
        assert_eq!(member.subscriptions.len(), 1);
        assert_eq!(member.subscriptions[0].dates.start(), t0());
        assert!(member.subscriptions[0].dates.end().is_none());
    }

    #[tokio::test]
    async fn creation_attaches_to_existing_member_by_email() {
        let existing = Member::register("Ada@Example.com", None, t0().add_days(-1)).unwrap();
        let h = harness_with(vec![existing.clone()]);

        h.handler
            .handle(invoice("subscription_create", "in_1", Some("ada@example.com")))
            .await
            .unwrap();

        let member = only_member(&h.repo).await;
        assert_eq!(member.id, existing.id);
        assert_eq!(member.payment_customer_id.as_deref(), Some("cus_1"));
        assert!(member.has_active_subscription(t0()));
    }

    #[tokio::test]
    async fn redelivered_creation_is_already_applied() {
        let h = harness();
        let cmd = invoice("subscription_create", "in_1", Some("ada@example.com"));

        h.handler.handle(cmd.clone()).await.unwrap();
        let result = h.handler.handle(cmd).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::AlreadyApplied { .. }));
        assert_eq!(only_member(&h.repo).await.subscriptions.len(), 1);
    }

    #[tokio::test]
    async fn creation_without_email_is_missing_field() {
        let h = harness();
        let result = h.handler.handle(invoice("subscription_create", "in_1", None)).await;

        assert!(matches!(result, Err(WebhookError::MissingField("customer_email"))));
        assert!(h.repo.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn creation_for_member_with_active_subscription_is_rejected() {
        let mut member = Member::register("ada@example.com", None, t0()).unwrap();
        member.start_subscription("sub_other", None, t0()).unwrap();
        let h = harness_with(vec![member]);

        let result = h
            .handler
            .handle(invoice("subscription_create", "in_1", Some("ada@example.com")))
            .await;

        assert!(matches!(result, Err(WebhookError::ActiveSubscriptionExists(_))));
        assert_eq!(only_member(&h.repo).await.subscriptions.len(), 1);
    }

    #[tokio::test]
    async fn creation_supersedes_subscription_scheduled_to_end() {
        let mut member = subscribed_member();
        member
            .schedule_cancellation("sub_1", t0().add_days(20), t0().add_days(-1))
            .unwrap();
        let h = harness_with(vec![member]);
        let cmd = HandlePaymentWebhookCommand {
            payload: json!({
                "id": "evt_in_9",
                "type": "invoice.payment_succeeded",
                "data": { "object": {
                    "id": "in_9",
                    "subscription": "sub_2",
                    "customer": "cus_1",
                    "customer_email": "ada@example.com",
                    "billing_reason": "subscription_create"
                }}
            })
            .to_string(),
        };

        let result = h.handler.handle(cmd).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::SubscriptionStarted { .. }));
        let member = only_member(&h.repo).await;
        assert_eq!(member.subscriptions.len(), 2);
        assert_eq!(member.subscription("sub_1").unwrap().dates.end(), Some(t0()));
        let active = member.active_subscription(t0()).unwrap();
        assert_eq!(active.payment_subscription_id, "sub_2");
        assert!(active.dates.end().is_none());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Renewal
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn renewal_keeps_window_and_is_idempotent() {
        let member = subscribed_member();
        let window = member.subscriptions[0].dates;
        let h = harness_with(vec![member]);

        let first = h
            .handler
            .handle(invoice("subscription_cycle", "in_2", None))
            .await
            .unwrap();
        let second = h
            .handler
            .handle(invoice("subscription_cycle", "in_2", None))
            .await
            .unwrap();
        let third = h
            .handler
            .handle(invoice("subscription_cycle", "in_2", None))
            .await
            .unwrap();

        assert!(matches!(first, HandlePaymentWebhookResult::SubscriptionRenewed { .. }));
        assert!(matches!(second, HandlePaymentWebhookResult::AlreadyApplied { .. }));
        assert!(matches!(third, HandlePaymentWebhookResult::AlreadyApplied { .. }));

        let member = only_member(&h.repo).await;
        assert_eq!(member.subscriptions[0].dates, window);
        assert_eq!(member.subscriptions[0].last_invoice_id.as_deref(), Some("in_2"));
    }

    #[tokio::test]
    async fn renewal_for_unknown_member_is_member_not_found() {
        let h = harness();
        let result = h.handler.handle(invoice("subscription_cycle", "in_2", None)).await;
        assert!(matches!(result, Err(WebhookError::MemberNotFound(_))));
    }

    #[tokio::test]
    async fn renewal_for_known_customer_without_subscription_is_subscription_not_found() {
        let member = Member::register("ada@example.com", Some("cus_1".into()), t0()).unwrap();
        let h = harness_with(vec![member]);

        let result = h.handler.handle(invoice("subscription_cycle", "in_2", None)).await;
        assert!(matches!(result, Err(WebhookError::SubscriptionNotFound(id)) if id == "sub_1"));
    }

    #[tokio::test]
    async fn other_billing_reason_is_acknowledged() {
        let h = harness_with(vec![subscribed_member()]);
        let before = h.repo.snapshot().await;

        let result = h
            .handler
            .handle(invoice("subscription_update", "in_3", None))
            .await
            .unwrap();

        assert_eq!(result, HandlePaymentWebhookResult::Acknowledged);
        assert_eq!(h.repo.snapshot().await, before);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Deletion
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn deletion_ends_subscription_now() {
        let h = harness_with(vec![subscribed_member()]);

        let result = h
            .handler
            .handle(subscription_event("customer.subscription.deleted", "sub_1"))
            .await
            .unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::SubscriptionEnded { .. }));
        let member = only_member(&h.repo).await;
        assert_eq!(member.subscriptions.len(), 1);
        let end = member.subscriptions[0].dates.end().unwrap();
        assert!(!end.is_after(&t0()));
        assert!(!member.has_active_subscription(t0()));
    }

    #[tokio::test]
    async fn redelivered_deletion_keeps_first_end() {
        let h = harness_with(vec![subscribed_member()]);
        let cmd = subscription_event("customer.subscription.deleted", "sub_1");

        h.handler.handle(cmd.clone()).await.unwrap();
        h.clock.advance_secs(3600);
        let result = h.handler.handle(cmd).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::AlreadyApplied { .. }));
        let member = only_member(&h.repo).await;
        assert_eq!(member.subscriptions[0].dates.end(), Some(t0()));
    }

    #[tokio::test]
    async fn deletion_of_unknown_subscription_fails() {
        let h = harness();
        let result = h
            .handler
            .handle(subscription_event("customer.subscription.deleted", "sub_x"))
            .await;
        assert!(matches!(result, Err(WebhookError::MemberNotFound(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Updates (scheduled cancellation)
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn update_with_cancel_at_period_end_schedules_end() {
        let h = harness_with(vec![subscribed_member()]);
        let period_end = t0().add_days(20);
        h.provider
            .add_subscription(MockPaymentProvider::subscription("sub_1", "cus_1", true, period_end));

        let result = h
            .handler
            .handle(subscription_event("customer.subscription.updated", "sub_1"))
            .await
            .unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::CancellationScheduled {
                member_id: only_member(&h.repo).await.id,
                subscription_id: "sub_1".into(),
                ends_at: period_end,
            }
        );
        let member = only_member(&h.repo).await;
        assert_eq!(member.subscriptions[0].dates.end(), Some(period_end));
        assert!(member.has_active_subscription(t0()));
    }

    #[tokio::test]
    async fn repeated_scheduled_cancellation_is_already_applied() {
        let h = harness_with(vec![subscribed_member()]);
        h.provider.add_subscription(MockPaymentProvider::subscription(
            "sub_1",
            "cus_1",
            true,
            t0().add_days(20),
        ));
        let cmd = subscription_event("customer.subscription.updated", "sub_1");

        h.handler.handle(cmd.clone()).await.unwrap();
        let result = h.handler.handle(cmd).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::AlreadyApplied { .. }));
    }

    #[tokio::test]
    async fn update_without_flag_withdraws_scheduled_cancellation() {
        let mut member = subscribed_member();
        member
            .schedule_cancellation("sub_1", t0().add_days(20), t0())
            .unwrap();
        let h = harness_with(vec![member]);
        h.provider.add_subscription(MockPaymentProvider::subscription(
            "sub_1",
            "cus_1",
            false,
            t0().add_days(20),
        ));

        let result = h
            .handler
            .handle(subscription_event("customer.subscription.updated", "sub_1"))
            .await
            .unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::CancellationWithdrawn { .. }));
        assert!(only_member(&h.repo).await.subscriptions[0].dates.end().is_none());
    }

    #[tokio::test]
    async fn update_without_flag_on_open_subscription_is_acknowledged() {
        let h = harness_with(vec![subscribed_member()]);
        h.provider.add_subscription(MockPaymentProvider::subscription(
            "sub_1",
            "cus_1",
            false,
            t0().add_days(20),
        ));

        let result = h
            .handler
            .handle(subscription_event("customer.subscription.updated", "sub_1"))
            .await
            .unwrap();

        assert_eq!(result, HandlePaymentWebhookResult::Acknowledged);
    }

    #[tokio::test]
    async fn update_when_provider_unreachable_fails_without_change() {
        let h = harness_with(vec![subscribed_member()]);
        let before = h.repo.snapshot().await;
        h.provider.set_error(PaymentError::network("connection refused"));

        let result = h
            .handler
            .handle(subscription_event("customer.subscription.updated", "sub_1"))
            .await;

        assert!(matches!(result, Err(WebhookError::ProviderUnavailable(_))));
        assert_eq!(h.repo.snapshot().await, before);
    }

    #[tokio::test]
    async fn update_for_subscription_unknown_to_provider_fails() {
        let h = harness_with(vec![subscribed_member()]);

        let result = h
            .handler
            .handle(subscription_event("customer.subscription.updated", "sub_1"))
            .await;

        assert!(matches!(result, Err(WebhookError::SubscriptionNotFound(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Classification failures
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_event_type_is_unhandled() {
        let h = harness();
        let cmd = HandlePaymentWebhookCommand {
            payload: json!({ "id": "evt_1", "type": "foo.bar", "data": { "object": {} } }).to_string(),
        };

        let result = h.handler.handle(cmd).await;
        assert!(matches!(result, Err(WebhookError::UnhandledEventType(t)) if t == "foo.bar"));
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected() {
        let h = harness();
        let cmd = HandlePaymentWebhookCommand {
            payload: "not json".to_string(),
        };
        assert!(matches!(h.handler.handle(cmd).await, Err(WebhookError::MalformedEvent(_))));
    }

    #[tokio::test]
    async fn missing_subscription_id_is_missing_field() {
        let h = harness();
        let cmd = HandlePaymentWebhookCommand {
            payload: json!({
                "type": "customer.subscription.deleted",
                "data": { "object": { "customer": "cus_1" } }
            })
            .to_string(),
        };
        assert!(matches!(
            h.handler.handle(cmd).await,
            Err(WebhookError::MissingField("subscription"))
        ));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Unit of work failures
    // ════════════════════════════════════════════════════════════════════════════

    struct FailingRepository {
        begin_calls: Mutex<u32>,
    }

    #[async_trait]
    impl MemberRepository for FailingRepository {
        async fn begin(&self) -> Result<Box<dyn MemberUnitOfWork>, DomainError> {
            *self.begin_calls.lock().unwrap() += 1;
            Err(DomainError::database("connection pool exhausted"))
        }
    }

    #[tokio::test]
    async fn database_failure_surfaces_as_database_error() {
        let repo = Arc::new(FailingRepository {
            begin_calls: Mutex::new(0),
        });
        let handler = HandlePaymentWebhookHandler::new(
            repo.clone(),
            Arc::new(MockPaymentProvider::new()),
            Arc::new(FixedClock::new(t0())),
        );

        let result = handler
            .handle(invoice("subscription_cycle", "in_2", None))
            .await;

        assert!(matches!(result, Err(WebhookError::Database(_))));
        assert_eq!(*repo.begin_calls.lock().unwrap(), 1);
    }
}
