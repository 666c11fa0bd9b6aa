//! Member domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Member aggregate and subscription transitions
//! - `subscription` - Subscription entity owned by a member
//! - `address` - Shipping address value object
//! - `specs` - Single-member query specifications

mod address;
mod aggregate;
mod errors;
mod specs;
mod subscription;

pub use address::Address;
pub use aggregate::{Member, SubscriptionTransition};
pub use errors::MemberError;
pub use specs::MemberSpec;
pub use subscription::Subscription;
