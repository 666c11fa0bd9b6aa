//! Vimeo implementation of the `VideoHost` port.
//!
//! Uploads use the tus resumable protocol: the video is created with
//! `approach: "tus"`, the file is sent in PATCH chunks, and after a failed
//! chunk a HEAD request recovers the offset the server actually holds.
//!
//! # Configuration
//!
//! ```ignore
//! let config = VimeoConfig::new(token).with_chunk_size(64 * 1024 * 1024);
//! let client = VimeoClient::new(config);
//! ```

use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::time::sleep;

use crate::ports::{
    RemoteVideo, ThumbnailStatus, UploadedFile, VideoDetails, VideoHost, VideoHostError,
};

use super::types::{
    id_from_uri, ActivateThumbsetRequest, CreateThumbsetRequest, CreateUploadRequest,
    CreatedVideo, EmbedPrivacy, Thumbset, UpdateVideoRequest, UploadApproach, VideoPage,
    VimeoErrorBody,
};

const VIMEO_ACCEPT: &str = "application/vnd.vimeo.*+json;version=3.4";
const TUS_VERSION: &str = "1.0.0";
const PAGE_SIZE: u32 = 100;
const THUMBSET_DURATION_SECS: u32 = 6;

/// Configuration for the Vimeo client.
#[derive(Debug, Clone)]
pub struct VimeoConfig {
    token: SecretString,
    /// Base URL for the API (default: https://api.vimeo.com).
    pub base_url: String,
    pub timeout: Duration,
    /// Bytes sent per tus PATCH.
    pub chunk_size: usize,
    /// Failed chunks tolerated per upload.
    pub max_chunk_retries: u32,
    /// Pause before resuming after a failed chunk.
    pub retry_delay: Duration,
}

impl VimeoConfig {
    pub fn new(token: SecretString) -> Self {
        Self {
            token,
            base_url: "https://api.vimeo.com".to_string(),
            timeout: Duration::from_secs(300),
            chunk_size: 128 * 1024 * 1024,
            max_chunk_retries: 5,
            retry_delay: Duration::from_secs(2),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_max_chunk_retries(mut self, retries: u32) -> Self {
        self.max_chunk_retries = retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

pub struct VimeoClient {
    config: VimeoConfig,
    client: Client,
}

impl VimeoClient {
    pub fn new(config: VimeoConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Authenticated API request.
    fn api(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(self.config.token.expose_secret())
            .header(ACCEPT, VIMEO_ACCEPT)
    }

    async fn send(request: RequestBuilder) -> Result<Response, VideoHostError> {
        let response = request
            .send()
            .await
            .map_err(|e| VideoHostError::Request(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<VimeoErrorBody>(&body)
            .ok()
            .and_then(|e| e.developer_message.or(e.error))
            .unwrap_or(body);
        Err(VideoHostError::Status { status, message })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, VideoHostError> {
        response
            .json()
            .await
            .map_err(|e| VideoHostError::InvalidResponse(e.to_string()))
    }

    fn thumbset_path(video_id: &str, thumbnail_id: &str) -> String {
        format!("/videos/{}/animated_thumbsets/{}", video_id, thumbnail_id)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // tus
    // ════════════════════════════════════════════════════════════════════════════

    async fn read_chunk(
        file: &mut tokio::fs::File,
        offset: u64,
        len: usize,
    ) -> Result<Vec<u8>, VideoHostError> {
        let io = |e: std::io::Error| VideoHostError::Io(e.to_string());
        file.seek(SeekFrom::Start(offset)).await.map_err(io)?;
        let mut chunk = Vec::with_capacity(len);
        file.take(len as u64)
            .read_to_end(&mut chunk)
            .await
            .map_err(io)?;
        Ok(chunk)
    }

    /// Sends one chunk; returns the offset the server acknowledged.
    async fn patch_chunk(
        &self,
        upload_link: &str,
        offset: u64,
        chunk: Vec<u8>,
    ) -> Result<u64, VideoHostError> {
        let sent = chunk.len() as u64;
        let request = self
            .client
            .patch(upload_link)
            .header("Tus-Resumable", TUS_VERSION)
            .header("Upload-Offset", offset.to_string())
            .header(CONTENT_TYPE, "application/offset+octet-stream")
            .body(chunk);

        let response = Self::send(request).await?;
        Ok(upload_offset(response.headers()).unwrap_or(offset + sent))
    }

    /// Asks the server how many bytes it holds.
    async fn resume_offset(&self, upload_link: &str) -> Result<u64, VideoHostError> {
        let request = self
            .client
            .head(upload_link)
            .header("Tus-Resumable", TUS_VERSION);
        let response = Self::send(request).await?;
        upload_offset(response.headers()).ok_or_else(|| {
            VideoHostError::InvalidResponse("HEAD response without Upload-Offset".to_string())
        })
    }

    async fn send_file(&self, path: &Path, upload_link: &str, size: u64) -> Result<(), VideoHostError> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| VideoHostError::Io(e.to_string()))?;

        let mut offset = 0u64;
        let mut failures = 0u32;

        while offset < size {
            let chunk = Self::read_chunk(&mut file, offset, self.config.chunk_size).await?;
            if chunk.is_empty() {
                return Err(VideoHostError::Io(format!(
                    "File ended at byte {} of {}",
                    offset, size
                )));
            }

            let outcome = match self.patch_chunk(upload_link, offset, chunk).await {
                Ok(next) if next > offset => Ok(next),
                Ok(next) => Err(VideoHostError::InvalidResponse(format!(
                    "Upload-Offset stalled at {} after sending from {}",
                    next, offset
                ))),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(next) => offset = next,
                Err(err) => {
                    failures += 1;
                    if failures > self.config.max_chunk_retries {
                        return Err(err);
                    }
                    tracing::warn!(
                        offset,
                        attempt = failures,
                        error = %err,
                        "Chunk upload failed, resuming"
                    );
                    sleep(self.config.retry_delay).await;
                    offset = self.resume_offset(upload_link).await?;
                }
            }
        }

        Ok(())
    }
}

fn upload_offset(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("Upload-Offset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn thumbnail_status(raw: Option<&str>) -> ThumbnailStatus {
    match raw {
        Some("completed") | Some("ready") | Some("available") => ThumbnailStatus::Ready,
        Some("failed") | Some("error") => ThumbnailStatus::Failed,
        _ => ThumbnailStatus::Pending,
    }
}

#[async_trait]
impl VideoHost for VimeoClient {
    async fn list_videos(&self) -> Result<Vec<RemoteVideo>, VideoHostError> {
        let mut videos = Vec::new();
        let mut next = Some(format!(
            "/me/videos?per_page={}&fields=uri,name,link",
            PAGE_SIZE
        ));

        while let Some(path) = next.take() {
            let response = Self::send(self.api(reqwest::Method::GET, &path)).await?;
            let page: VideoPage = Self::json(response).await?;

            for video in page.data {
                let Some(id) = id_from_uri(&video.uri) else {
                    tracing::warn!(uri = %video.uri, "Skipping video with unusable uri");
                    continue;
                };
                videos.push(RemoteVideo {
                    id: id.to_string(),
                    name: video.name,
                    link: video.link,
                });
            }
            next = page.paging.next;
        }

        tracing::debug!(count = videos.len(), "Fetched Vimeo catalog");
        Ok(videos)
    }

    async fn upload_video(&self, path: &Path, name: &str) -> Result<UploadedFile, VideoHostError> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| VideoHostError::Io(e.to_string()))?
            .len();

        let body = CreateUploadRequest {
            upload: UploadApproach {
                approach: "tus",
                size,
            },
            name,
        };
        let response =
            Self::send(self.api(reqwest::Method::POST, "/me/videos").json(&body)).await?;
        let created: CreatedVideo = Self::json(response).await?;

        let video_id = id_from_uri(&created.uri)
            .ok_or_else(|| VideoHostError::InvalidResponse(format!("Bad video uri: {}", created.uri)))?
            .to_string();

        tracing::info!(video_id = %video_id, size, name, "Uploading video");
        self.send_file(path, &created.upload.upload_link, size).await?;

        Ok(UploadedFile {
            video_id,
            link: created.link,
        })
    }

    async fn create_animated_thumbnails(&self, video_id: &str) -> Result<String, VideoHostError> {
        let path = format!("/videos/{}/animated_thumbsets", video_id);
        let body = CreateThumbsetRequest {
            duration: THUMBSET_DURATION_SECS,
        };
        let response = Self::send(self.api(reqwest::Method::POST, &path).json(&body)).await?;
        let thumbset: Thumbset = Self::json(response).await?;

        id_from_uri(&thumbset.uri)
            .map(str::to_string)
            .ok_or_else(|| VideoHostError::InvalidResponse(format!("Bad thumbset uri: {}", thumbset.uri)))
    }

    async fn thumbnail_status(
        &self,
        video_id: &str,
        thumbnail_id: &str,
    ) -> Result<ThumbnailStatus, VideoHostError> {
        let path = Self::thumbset_path(video_id, thumbnail_id);
        let response = Self::send(self.api(reqwest::Method::GET, &path)).await?;
        let thumbset: Thumbset = Self::json(response).await?;
        Ok(thumbnail_status(thumbset.status.as_deref()))
    }

    async fn attach_thumbnails(
        &self,
        video_id: &str,
        thumbnail_id: &str,
    ) -> Result<(), VideoHostError> {
        let path = Self::thumbset_path(video_id, thumbnail_id);
        let body = ActivateThumbsetRequest { active: true };
        Self::send(self.api(reqwest::Method::PATCH, &path).json(&body)).await?;
        Ok(())
    }

    async fn update_details(
        &self,
        video_id: &str,
        details: &VideoDetails,
    ) -> Result<(), VideoHostError> {
        let path = format!("/videos/{}", video_id);
        let body = UpdateVideoRequest {
            name: &details.name,
            privacy: EmbedPrivacy {
                embed: if details.embed_whitelist { "whitelist" } else { "public" },
            },
        };
        Self::send(self.api(reqwest::Method::PATCH, &path).json(&body)).await?;
        Ok(())
    }

    async fn add_domain(&self, video_id: &str, domain: &str) -> Result<(), VideoHostError> {
        let path = format!("/videos/{}/privacy/domains/{}", video_id, domain);
        Self::send(self.api(reqwest::Method::PUT, &path)).await?;
        Ok(())
    }
}
