//! Uploader handlers.

mod sync_videos;

pub use sync_videos::{scan_folder, SyncSettings, SyncVideosCommand, SyncVideosHandler};
