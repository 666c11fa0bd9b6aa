//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the DevBetter domain.

mod date_time_range;
mod errors;
mod ids;
mod timestamp;

pub use date_time_range::DateTimeRange;
pub use errors::{check_length, require_text, DomainError, ErrorCode, ValidationError};
pub use ids::{ArchiveVideoId, BookId, MemberId, SubscriptionId, UserId};
pub use timestamp::Timestamp;
