//! Archive ingestion configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

const MIN_TOKEN_LEN: usize = 16;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchiveConfig {
    /// Bearer token the uploader presents to `POST /api/archive-videos`.
    /// The endpoint is open when unset.
    pub ingest_token: Option<String>,
}

impl ArchiveConfig {
    pub fn ingest_token(&self) -> Option<SecretString> {
        self.ingest_token
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::new(t.clone()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.ingest_token.as_deref() {
            Some(token) if !token.is_empty() && token.len() < MIN_TOKEN_LEN => {
                Err(ValidationError::IngestTokenTooShort)
            }
            _ => Ok(()),
        }
    }
}
