//! Query specifications selecting a single member.
//!
//! Repositories translate each variant into a keyed lookup; in-memory
//! implementations use [`MemberSpec::is_satisfied_by`] directly.

use std::fmt;

use crate::domain::foundation::{MemberId, UserId};

use super::Member;

/// Declarative filter over members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSpec {
    ById(MemberId),
    /// Case-insensitive email match.
    ByEmail(String),
    ByUserId(UserId),
    ByPaymentCustomerId(String),
    /// Member owning the subscription with this provider id.
    ByPaymentSubscriptionId(String),
}

impl MemberSpec {
    pub fn by_email(email: impl Into<String>) -> Self {
        MemberSpec::ByEmail(email.into().trim().to_string())
    }

    pub fn by_payment_customer(id: impl Into<String>) -> Self {
        MemberSpec::ByPaymentCustomerId(id.into())
    }

    pub fn by_payment_subscription(id: impl Into<String>) -> Self {
        MemberSpec::ByPaymentSubscriptionId(id.into())
    }

    pub fn is_satisfied_by(&self, member: &Member) -> bool {
        match self {
            MemberSpec::ById(id) => member.id == *id,
            MemberSpec::ByEmail(email) => member.has_email(email),
            MemberSpec::ByUserId(user_id) => member.user_id.as_ref() == Some(user_id),
            MemberSpec::ByPaymentCustomerId(id) => {
                member.payment_customer_id.as_deref() == Some(id.as_str())
            }
            MemberSpec::ByPaymentSubscriptionId(id) => member.subscription(id).is_some(),
        }
    }
}

impl fmt::Display for MemberSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberSpec::ById(id) => write!(f, "id={}", id),
            MemberSpec::ByEmail(email) => write!(f, "email={}", email),
            MemberSpec::ByUserId(user_id) => write!(f, "user_id={}", user_id),
            MemberSpec::ByPaymentCustomerId(id) => write!(f, "customer={}", id),
            MemberSpec::ByPaymentSubscriptionId(id) => write!(f, "subscription={}", id),
        }
    }
}
