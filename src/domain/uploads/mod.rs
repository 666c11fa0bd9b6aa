//! Video uploader synchronization types.

mod errors;
mod report;

pub use errors::{SyncError, UploadError};
pub use report::{FailedUpload, LocalVideoFile, SyncReport, UploadedVideo};
