//! Member repository port.
//!
//! Every read and state change for a member runs inside a
//! [`MemberUnitOfWork`], which holds the member's row lock until it is
//! committed or dropped.
//!
//! # Example
//!
//! ```ignore
//! let mut uow = repo.begin().await?;
//! if let Some(mut member) = uow.lock_one(&MemberSpec::by_payment_subscription("sub_1")).await? {
//!     member.end_subscription("sub_1", clock.now())?;
//!     uow.save(&member).await?;
//! }
//! uow.commit().await?;
//! ```

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::member::{Member, MemberSpec};

/// Repository port for Member aggregate persistence.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Opens a unit of work (a database transaction).
    async fn begin(&self) -> Result<Box<dyn MemberUnitOfWork>, DomainError>;
}

/// A transaction scoped to member aggregates.
///
/// Dropping the unit of work without calling [`commit`](Self::commit) rolls
/// back every change made through it.
#[async_trait]
pub trait MemberUnitOfWork: Send {
    /// Loads and row-locks the first member satisfying `spec`.
    async fn lock_one(&mut self, spec: &MemberSpec) -> Result<Option<Member>, DomainError>;

    /// Inserts or updates the member and its subscriptions.
    async fn save(&mut self, member: &Member) -> Result<(), DomainError>;

    /// Commits all changes.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
