//! Member aggregate entity.
//!
//! A Member owns its subscriptions. All subscription lifecycle changes go
//! through the transition methods below so the aggregate can keep its
//! invariants.
//!
//! # Invariants
//!
//! - `email` is stored trimmed and matched case-insensitively
//! - At most one subscription is active at any instant
//! - A provider subscription id appears at most once
//! - `books_read` holds no duplicates

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{require_text, BookId, MemberId, Timestamp, UserId};

use super::{Address, MemberError, Subscription};

/// Outcome of applying a subscription transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionTransition {
    /// A new open-ended subscription was added.
    Started,
    /// Invoice recorded against an existing subscription.
    Renewed,
    /// End date set to now.
    Ended,
    /// End date set to the end of the paid period.
    CancellationScheduled,
    /// A scheduled end date was cleared.
    CancellationWithdrawn,
    /// The same transition was already applied; nothing changed.
    AlreadyApplied,
    /// Acknowledged without any change.
    Unchanged,
}

impl SubscriptionTransition {
    /// True when the aggregate was modified and must be saved.
    pub fn is_change(&self) -> bool {
        !matches!(
            self,
            SubscriptionTransition::AlreadyApplied | SubscriptionTransition::Unchanged
        )
    }
}

/// Member aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    /// Identity account linked to this member, once registered.
    pub user_id: Option<UserId>,

    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    pub shipping_address: Option<Address>,

    /// Single-line rendering of `shipping_address`.
    pub address: Option<String>,

    /// Payment provider customer id (e.g. `cus_...`).
    pub payment_customer_id: Option<String>,

    pub date_created: Timestamp,
    pub books_read: Vec<BookId>,
    pub subscriptions: Vec<Subscription>,
}

impl Member {
    /// Registers a member from a payment event before any account exists.
    pub fn register(
        email: impl Into<String>,
        payment_customer_id: Option<String>,
        now: Timestamp,
    ) -> Result<Self, MemberError> {
        let email = email.into().trim().to_string();
        require_text("email", &email, 256)?;

        Ok(Self {
            id: MemberId::new(),
            user_id: None,
            email,
            first_name: None,
            last_name: None,
            shipping_address: None,
            address: None,
            payment_customer_id,
            date_created: now,
            books_read: Vec::new(),
            subscriptions: Vec::new(),
        })
    }

    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }

    /// Case-insensitive email comparison, folded the way `lower()` folds in
    /// Postgres.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }

    pub fn link_user(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
    }

    pub fn update_name(&mut self, first_name: Option<String>, last_name: Option<String>) {
        self.first_name = first_name;
        self.last_name = last_name;
    }

    /// Replaces the shipping address and refreshes the single-line form.
    pub fn update_shipping_address(&mut self, address: Address) {
        self.address = Some(address.to_string());
        self.shipping_address = Some(address);
    }

    /// Records a book as read. Returns false if it was already recorded.
    pub fn mark_book_read(&mut self, book_id: BookId) -> bool {
        if self.books_read.contains(&book_id) {
            return false;
        }
        self.books_read.push(book_id);
        true
    }

    pub fn subscription(&self, payment_subscription_id: &str) -> Option<&Subscription> {
        self.subscriptions
            .iter()
            .find(|s| s.payment_subscription_id == payment_subscription_id)
    }

    pub fn active_subscription(&self, at: Timestamp) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.is_active_at(at))
    }

    pub fn has_active_subscription(&self, at: Timestamp) -> bool {
        self.active_subscription(at).is_some()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subscription transitions
    // ─────────────────────────────────────────────────────────────────────

    /// Starts a subscription for a first successful payment.
    ///
    /// An active subscription that already has a scheduled end is cut off at
    /// `now` so the new one takes over without overlap.
    ///
    /// # Errors
    ///
    /// `ActiveSubscriptionExists` if an open-ended subscription is active at
    /// `now`.
    pub fn start_subscription(
        &mut self,
        payment_subscription_id: &str,
        invoice_id: Option<String>,
        now: Timestamp,
    ) -> Result<SubscriptionTransition, MemberError> {
        if self.subscription(payment_subscription_id).is_some() {
            return Ok(SubscriptionTransition::AlreadyApplied);
        }

        let member_id = self.id;
        if let Some(existing) = self.subscriptions.iter_mut().find(|s| s.is_active_at(now)) {
            if existing.dates.end().is_none() {
                return Err(MemberError::active_subscription_exists(
                    member_id,
                    existing.payment_subscription_id.clone(),
                ));
            }
            existing.dates = existing.dates.with_end(now);
        }

        self.subscriptions.push(Subscription::start(
            self.id,
            payment_subscription_id,
            invoice_id,
            now,
        ));
        Ok(SubscriptionTransition::Started)
    }

    /// Records a renewal invoice. The validity window is not touched.
    pub fn confirm_renewal(
        &mut self,
        payment_subscription_id: &str,
        invoice_id: Option<&str>,
    ) -> Result<SubscriptionTransition, MemberError> {
        let subscription = self.subscription_mut(payment_subscription_id)?;

        match invoice_id {
            Some(id) if subscription.last_invoice_id.as_deref() == Some(id) => {
                Ok(SubscriptionTransition::AlreadyApplied)
            }
            Some(id) => {
                subscription.last_invoice_id = Some(id.to_string());
                Ok(SubscriptionTransition::Renewed)
            }
            None => Ok(SubscriptionTransition::Renewed),
        }
    }

    /// Ends a subscription immediately.
    pub fn end_subscription(
        &mut self,
        payment_subscription_id: &str,
        now: Timestamp,
    ) -> Result<SubscriptionTransition, MemberError> {
        let subscription = self.subscription_mut(payment_subscription_id)?;

        if subscription.has_ended_by(now) {
            return Ok(SubscriptionTransition::AlreadyApplied);
        }

        subscription.dates = subscription.dates.with_end(now);
        Ok(SubscriptionTransition::Ended)
    }

    /// Schedules the subscription to end at `period_end`.
    pub fn schedule_cancellation(
        &mut self,
        payment_subscription_id: &str,
        period_end: Timestamp,
        now: Timestamp,
    ) -> Result<SubscriptionTransition, MemberError> {
        let subscription = self.subscription_mut(payment_subscription_id)?;

        if subscription.has_ended_by(now) || subscription.dates.end() == Some(period_end) {
            return Ok(SubscriptionTransition::AlreadyApplied);
        }

        subscription.dates = subscription.dates.with_end(period_end);
        Ok(SubscriptionTransition::CancellationScheduled)
    }

    /// Clears a future end date. Ended or open-ended subscriptions are left
    /// alone.
    pub fn withdraw_cancellation(
        &mut self,
        payment_subscription_id: &str,
        now: Timestamp,
    ) -> Result<SubscriptionTransition, MemberError> {
        let subscription = self.subscription_mut(payment_subscription_id)?;

        if !subscription.is_cancellation_scheduled(now) {
            return Ok(SubscriptionTransition::Unchanged);
        }

        subscription.dates = subscription.dates.without_end();
        Ok(SubscriptionTransition::CancellationWithdrawn)
    }

    fn subscription_mut(
        &mut self,
        payment_subscription_id: &str,
    ) -> Result<&mut Subscription, MemberError> {
        let member_id = self.id;
        self.subscriptions
            .iter_mut()
            .find(|s| s.payment_subscription_id == payment_subscription_id)
            .ok_or_else(|| MemberError::subscription_not_found(member_id, payment_subscription_id))
    }
}
