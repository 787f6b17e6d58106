//! Microsoft Graph client for raw OneDrive file transfer

use anyhow::{Context, Result};
use reqwest::Response;
use reqwest::header::CONTENT_TYPE;

use super::constants::{GRAPH_BASE_URL, XLSX_CONTENT_TYPE};
use super::models::GraphErrorResponse;
use crate::error::ReconError;

pub struct GraphClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

/// Extract Graph's `error.message` from a failure body, falling back to the raw text
pub fn parse_graph_error(body: &str) -> String {
    match serde_json::from_str::<GraphErrorResponse>(body) {
        Ok(parsed) => parsed
            .error
            .message
            .filter(|m| !m.is_empty())
            .or(parsed.error.code)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Percent-encode each segment of a drive path, keeping `/` separators
fn encode_drive_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl GraphClient {
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(access_token, GRAPH_BASE_URL.to_string())
    }

    pub fn with_base_url(access_token: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Content URL of a file addressed by path relative to the drive root
    pub fn drive_content_url(&self, path: &str) -> String {
        format!(
            "{}/me/drive/root:/{}:/content",
            self.base_url,
            encode_drive_path(path)
        )
    }

    /// Turn non-success responses into `ReconError::Graph`
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no error details returned")
                .to_string()
        } else {
            parse_graph_error(&body)
        };

        Err(ReconError::Graph {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    /// Download a file's raw bytes
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.drive_content_url(path);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .with_context(|| format!("Failed to download '{}'", path))?;

        let bytes = Self::check(response)
            .await?
            .bytes()
            .await
            .with_context(|| format!("Failed to read download body for '{}'", path))?;

        log::info!("Downloaded {} bytes from '{}'", bytes.len(), path);
        Ok(bytes.to_vec())
    }

    /// Overwrite a file with raw workbook bytes
    pub async fn upload(&self, path: &str, content: Vec<u8>) -> Result<()> {
        let url = self.drive_content_url(path);
        let size = content.len();
        log::debug!("PUT {} ({} bytes)", url, size);

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, XLSX_CONTENT_TYPE)
            .body(content)
            .send()
            .await
            .with_context(|| format!("Failed to upload '{}'", path))?;

        Self::check(response).await?;

        log::info!("Uploaded {} bytes to '{}'", size, path);
        Ok(())
    }
}
