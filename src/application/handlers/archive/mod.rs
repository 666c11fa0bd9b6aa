//! Archive handlers.
//!
//! ## Commands
//! - Registering a video uploaded to the video host
//!
//! ## Queries
//! - Get a video with its questions

mod get_archive_video;
mod register_archive_video;

pub use get_archive_video::{GetArchiveVideoHandler, GetArchiveVideoQuery};
pub use register_archive_video::{
    RegisterArchiveVideoCommand, RegisterArchiveVideoHandler, RegisterArchiveVideoResult,
};
