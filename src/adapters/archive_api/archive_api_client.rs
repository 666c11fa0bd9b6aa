//! HTTP client for the web application's archive ingestion endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{ArchiveApiError, ArchiveRegistry, ArchiveVideoRegistration};

const ARCHIVE_VIDEOS_PATH: &str = "/api/archive-videos";

pub struct ArchiveApiClient {
    base_url: String,
    token: Option<SecretString>,
    client: Client,
}

impl ArchiveApiClient {
    /// `base_url` is the web application root, e.g. `https://devbetter.com`.
    pub fn new(base_url: impl Into<String>, token: Option<SecretString>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        }
    }
}

#[async_trait]
impl ArchiveRegistry for ArchiveApiClient {
    async fn register(&self, video: &ArchiveVideoRegistration) -> Result<(), ArchiveApiError> {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, ARCHIVE_VIDEOS_PATH))
            .json(video);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ArchiveApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ArchiveApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(title = %video.title, status = status.as_u16(), "Registered archive video");
        Ok(())
    }
}
