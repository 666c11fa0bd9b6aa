//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresMemberRepository` - Member aggregates, one transaction per unit of work
//! - `PostgresArchiveVideoRepository` - Archive videos with their questions

mod archive_video_repository;
mod member_repository;
mod queries;

pub use archive_video_repository::PostgresArchiveVideoRepository;
pub use member_repository::{PgMemberUnitOfWork, PostgresMemberRepository};
