//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `MemberRepository` / `MemberUnitOfWork` - Member aggregates under row locks
//! - `ArchiveVideoRepository` - Archived videos with questions
//!
//! ## External services
//!
//! - `PaymentProvider` - Live subscription lookups (Stripe)
//! - `VideoHost` - Video hosting (Vimeo)
//! - `ArchiveRegistry` - Web application archive API, used by the uploader
//!
//! ## Runtime
//!
//! - `Clock` - Current time

mod archive_registry;
mod archive_video_repository;
mod clock;
mod member_repository;
mod payment_provider;
mod video_host;

pub use archive_registry::{ArchiveApiError, ArchiveRegistry, ArchiveVideoRegistration};
pub use archive_video_repository::ArchiveVideoRepository;
pub use clock::{Clock, FixedClock, SystemClock};
pub use member_repository::{MemberRepository, MemberUnitOfWork};
pub use payment_provider::{
    PaymentError, PaymentErrorCode, PaymentProvider, ProviderSubscription, SubscriptionStatus,
};
pub use video_host::{
    RemoteVideo, ThumbnailStatus, UploadedFile, VideoDetails, VideoHost, VideoHostError,
};
