//! Vimeo API request and response bodies.

use serde::{Deserialize, Serialize};

/// One page of `GET /me/videos`.
#[derive(Debug, Deserialize)]
pub struct VideoPage {
    #[serde(default)]
    pub data: Vec<VimeoVideo>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    /// Path of the next page, e.g. `/me/videos?page=2`.
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VimeoVideo {
    /// `/videos/{id}`
    pub uri: String,
    #[serde(default)]
    pub name: String,
    pub link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUploadRequest<'a> {
    pub upload: UploadApproach,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UploadApproach {
    pub approach: &'static str,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreatedVideo {
    pub uri: String,
    pub link: String,
    pub upload: UploadTicket,
}

#[derive(Debug, Deserialize)]
pub struct UploadTicket {
    pub upload_link: String,
}

#[derive(Debug, Serialize)]
pub struct CreateThumbsetRequest {
    /// Clip length in seconds.
    pub duration: u32,
}

#[derive(Debug, Deserialize)]
pub struct Thumbset {
    /// `/videos/{id}/animated_thumbsets/{thumbset_id}`
    pub uri: String,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivateThumbsetRequest {
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct UpdateVideoRequest<'a> {
    pub name: &'a str,
    pub privacy: EmbedPrivacy,
}

#[derive(Debug, Serialize)]
pub struct EmbedPrivacy {
    pub embed: &'static str,
}

/// Error body Vimeo returns on failures.
#[derive(Debug, Deserialize)]
pub struct VimeoErrorBody {
    pub error: Option<String>,
    pub developer_message: Option<String>,
}

/// Last path segment of a Vimeo resource URI.
pub fn id_from_uri(uri: &str) -> Option<&str> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_last_uri_segment() {
        assert_eq!(id_from_uri("/videos/123456"), Some("123456"));
        assert_eq!(
            id_from_uri("/videos/1/animated_thumbsets/abc/"),
            Some("abc")
        );
        assert_eq!(id_from_uri(""), None);
    }

    #[test]
    fn upload_request_uses_tus() {
        let json = serde_json::to_value(CreateUploadRequest {
            upload: UploadApproach {
                approach: "tus",
                size: 42,
            },
            name: "Weekly call",
        })
        .unwrap();

        assert_eq!(json["upload"]["approach"], "tus");
        assert_eq!(json["upload"]["size"], 42);
        assert_eq!(json["name"], "Weekly call");
    }

    #[test]
    fn page_without_paging_has_no_next() {
        let page: VideoPage = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(page.paging.next.is_none());
    }
}
