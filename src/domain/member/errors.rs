//! Member aggregate errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, ValidationError};

/// Errors raised by member transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    /// The member already holds a subscription that is active now.
    #[error("Member {member_id} already has an active subscription {existing}")]
    ActiveSubscriptionExists { member_id: MemberId, existing: String },

    /// No subscription with the provider id belongs to this member.
    #[error("Member {member_id} has no subscription {payment_subscription_id}")]
    SubscriptionNotFound {
        member_id: MemberId,
        payment_subscription_id: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl MemberError {
    pub fn active_subscription_exists(member_id: MemberId, existing: impl Into<String>) -> Self {
        MemberError::ActiveSubscriptionExists {
            member_id,
            existing: existing.into(),
        }
    }

    pub fn subscription_not_found(member_id: MemberId, id: impl Into<String>) -> Self {
        MemberError::SubscriptionNotFound {
            member_id,
            payment_subscription_id: id.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MemberError::ActiveSubscriptionExists { .. } => ErrorCode::SubscriptionExists,
            MemberError::SubscriptionNotFound { .. } => ErrorCode::MemberNotFound,
            MemberError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }
}

impl From<MemberError> for DomainError {
    fn from(err: MemberError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
