//! In-memory adapters for tests and local development.

mod archive_video_repository;
mod member_repository;

pub use archive_video_repository::InMemoryArchiveVideoRepository;
pub use member_repository::InMemoryMemberRepository;
