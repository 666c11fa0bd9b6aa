//! DevBetter uploader - Publishes recorded sessions to Vimeo and the archive
//!
//! Uploads every video in a folder that Vimeo does not already hold, waits for
//! its animated thumbnails, restricts embedding to the DevBetter domains and
//! registers it with the web application.
//!
//! Usage:
//!   devbetter-uploader -d /recordings -t <vimeo token> -a https://devbetter.com
//!
//! Environment variables:
//!   VIMEO_TOKEN - Vimeo access token (instead of -t)
//!   DEVBETTER_API_TOKEN - Bearer token for the archive endpoint
//!   RUST_LOG - Log filter (default: info,devbetter=debug)
//!
//! Exit codes: 0 all uploaded or skipped, 1 run aborted, 2 usage error,
//! 3 finished with failed files.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use devbetter::adapters::archive_api::ArchiveApiClient;
use devbetter::adapters::vimeo::{VimeoClient, VimeoConfig};
use devbetter::application::{SyncSettings, SyncVideosCommand, SyncVideosHandler};
use devbetter::config::{UploaderArgs, UsageError};

const EXIT_ABORTED: u8 = 1;
const EXIT_PARTIAL: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let args = UploaderArgs::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match args.validate() {
        Ok(settings) => settings,
        Err(e) => {
            let _ = e.report(&mut std::io::stdout().lock());
            return ExitCode::from(UsageError::EXIT_CODE);
        }
    };

    info!(
        folder = %settings.folder.display(),
        api_link = %settings.api_link,
        domains = ?settings.domains,
        "Starting upload sync"
    );

    let vimeo = VimeoClient::new(
        VimeoConfig::new(settings.vimeo_token.clone()).with_base_url(settings.vimeo_base_url.clone()),
    );
    let registry = ArchiveApiClient::new(settings.api_link.clone(), settings.api_token.clone());
    let handler = SyncVideosHandler::new(
        Arc::new(vimeo),
        Arc::new(registry),
        SyncSettings {
            poll_attempts: settings.poll_attempts,
            poll_interval: settings.poll_interval,
            domains: settings.domains.clone(),
        },
    );

    let report = match handler
        .handle(SyncVideosCommand {
            folder: settings.folder.clone(),
        })
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Upload sync aborted");
            return ExitCode::from(EXIT_ABORTED);
        }
    };

    for video in &report.uploaded {
        info!(title = %video.title, url = %video.url, "Uploaded");
    }
    for title in &report.skipped {
        info!(%title, "Already on Vimeo");
    }
    for failure in &report.failed {
        warn!(title = %failure.title, error = %failure.error, "Upload failed");
    }
    info!(
        uploaded = report.uploaded.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Upload sync finished"
    );

    if report.has_failures() {
        ExitCode::from(EXIT_PARTIAL)
    } else {
        ExitCode::SUCCESS
    }
}
