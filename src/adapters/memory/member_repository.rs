//! In-memory member repository.
//!
//! Units of work hold the store's async mutex for their whole lifetime and
//! mutate a private copy, so concurrent webhooks are serialized the same way
//! the Postgres row locks serialize them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::member::{Member, MemberSpec};
use crate::ports::{MemberRepository, MemberUnitOfWork};

#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberRepository {
    members: Arc<Mutex<Vec<Member>>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            members: Arc::new(Mutex::new(members)),
        }
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> Vec<Member> {
        self.members.lock().await.clone()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn begin(&self) -> Result<Box<dyn MemberUnitOfWork>, DomainError> {
        let guard = self.members.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryMemberUnitOfWork { guard, working }))
    }
}

struct InMemoryMemberUnitOfWork {
    guard: OwnedMutexGuard<Vec<Member>>,
    working: Vec<Member>,
}

impl InMemoryMemberUnitOfWork {
    fn check_unique(&self, member: &Member) -> Result<(), DomainError> {
        for other in self.working.iter().filter(|m| m.id != member.id) {
            if other.has_email(&member.email) {
                return Err(DomainError::new(
                    ErrorCode::MemberExists,
                    format!("Email {} already belongs to member {}", member.email, other.id),
                ));
            }
            for sub in &member.subscriptions {
                if other.subscription(&sub.payment_subscription_id).is_some() {
                    return Err(DomainError::new(
                        ErrorCode::SubscriptionExists,
                        format!(
                            "Subscription {} already belongs to member {}",
                            sub.payment_subscription_id, other.id
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MemberUnitOfWork for InMemoryMemberUnitOfWork {
    async fn lock_one(&mut self, spec: &MemberSpec) -> Result<Option<Member>, DomainError> {
        Ok(self.working.iter().find(|m| spec.is_satisfied_by(m)).cloned())
    }

    async fn save(&mut self, member: &Member) -> Result<(), DomainError> {
        self.check_unique(member)?;
        match self.working.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member.clone(),
            None => self.working.push(member.clone()),
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemoryMemberUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
