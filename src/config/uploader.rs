//! Uploader command line.
//!
//! `-d`, `-t` and `-a` are checked by hand rather than marked required so a
//! missing flag gets the usage line that names it.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;
use thiserror::Error;

/// Upload local videos missing from Vimeo and register them with DevBetter.
#[derive(Parser, Debug, Clone)]
#[command(name = "devbetter-uploader")]
#[command(about = "Sync a folder of videos to Vimeo and the DevBetter archive")]
#[command(version)]
pub struct UploaderArgs {
    /// Folder holding the videos to upload
    #[arg(short = 'd', long = "folder")]
    pub folder: Option<String>,

    /// Vimeo access token
    #[arg(short = 't', long = "token", env = "VIMEO_TOKEN", hide_env_values = true)]
    pub vimeo_token: Option<String>,

    /// Base URL of the DevBetter web application
    #[arg(short = 'a', long = "api-link")]
    pub api_link: Option<String>,

    /// Domain allowed to embed uploaded videos (repeatable)
    #[arg(long = "domain", default_value = "devbetter.com")]
    pub domains: Vec<String>,

    /// Thumbnail status checks per video before giving up
    #[arg(long, default_value_t = 30)]
    pub poll_attempts: u32,

    /// Seconds between thumbnail status checks
    #[arg(long, default_value_t = 10)]
    pub poll_interval_secs: u64,

    /// Bearer token for the archive ingestion endpoint
    #[arg(long, env = "DEVBETTER_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Vimeo API base URL
    #[arg(long, default_value = "https://api.vimeo.com")]
    pub vimeo_base_url: String,

    /// Log filter directive
    #[arg(long, env = "RUST_LOG", default_value = "info,devbetter=debug")]
    pub log_level: String,
}

/// Usage problems reported before any work starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Please use -d [destination folder] -t [Vimeo token] -a [api link]")]
    MissingArguments,

    #[error("Please use -d [destination folder]")]
    EmptyFolder,

    #[error("Please use -t [Vimeo token]")]
    EmptyToken,

    #[error("Please use -a [api link]")]
    EmptyApiLink,

    #[error("The api link must be an http(s) URL: {0}")]
    InvalidApiLink(String),

    #[error("--poll-attempts must be at least 1")]
    InvalidPollAttempts,

    #[error("At least one non-empty --domain is required")]
    NoDomains,
}

impl UsageError {
    /// Process exit status for a usage problem.
    pub const EXIT_CODE: u8 = 2;

    /// Writes the usage line; the uploader sends it to stdout.
    pub fn report(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{}", self)
    }
}

/// Validated uploader settings.
#[derive(Debug, Clone)]
pub struct UploaderSettings {
    pub folder: PathBuf,
    pub vimeo_token: SecretString,
    pub vimeo_base_url: String,
    pub api_link: String,
    pub api_token: Option<SecretString>,
    pub domains: Vec<String>,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

impl UploaderArgs {
    pub fn validate(self) -> Result<UploaderSettings, UsageError> {
        let (Some(folder), Some(token), Some(api_link)) =
            (self.folder, self.vimeo_token, self.api_link)
        else {
            return Err(UsageError::MissingArguments);
        };

        let folder = folder.trim();
        if folder.is_empty() {
            return Err(UsageError::EmptyFolder);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(UsageError::EmptyToken);
        }
        let api_link = api_link.trim().trim_end_matches('/');
        if api_link.is_empty() {
            return Err(UsageError::EmptyApiLink);
        }
        if !api_link.starts_with("http://") && !api_link.starts_with("https://") {
            return Err(UsageError::InvalidApiLink(api_link.to_string()));
        }
        if self.poll_attempts == 0 {
            return Err(UsageError::InvalidPollAttempts);
        }

        let domains: Vec<String> = self
            .domains
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        if domains.is_empty() {
            return Err(UsageError::NoDomains);
        }

        Ok(UploaderSettings {
            folder: PathBuf::from(folder),
            vimeo_token: SecretString::new(token.to_string()),
            vimeo_base_url: self.vimeo_base_url.trim_end_matches('/').to_string(),
            api_link: api_link.to_string(),
            api_token: self
                .api_token
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::new),
            domains,
            poll_attempts: self.poll_attempts,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        })
    }
}
