//! Archive API adapter used by the uploader.

mod archive_api_client;

pub use archive_api_client::ArchiveApiClient;
