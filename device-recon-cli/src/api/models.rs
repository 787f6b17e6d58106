//! Wire and cache models for authentication and Graph responses

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::constants::{
    MAX_DEVICE_CODE_LIFETIME_SECS, MAX_POLL_INTERVAL_SECS, MAX_TOKEN_LIFETIME_SECS,
    TOKEN_EXPIRY_SKEW_SECS,
};

/// Access token persisted in the token cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenInfo {
    /// Build from a token endpoint response received at `now`.
    /// Lifetimes beyond `MAX_TOKEN_LIFETIME_SECS` are capped.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = response.expires_in.min(MAX_TOKEN_LIFETIME_SECS) as i64;
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: now + Duration::seconds(lifetime),
        }
    }

    /// Whether the access token can still be used at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(TOKEN_EXPIRY_SKEW_SECS) > now
    }
}

/// Response of the device code endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in: u64,
    #[serde(default = "default_poll_interval")]
    pub interval: u64,
    /// Ready-made login instructions containing the user code and URI
    #[serde(default)]
    pub message: Option<String>,
}

fn default_poll_interval() -> u64 {
    5
}

impl DeviceCodeResponse {
    /// How long the device code stays usable, capped
    pub fn lifetime(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.expires_in.min(MAX_DEVICE_CODE_LIFETIME_SECS))
    }

    /// Initial polling interval, capped
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval.min(MAX_POLL_INTERVAL_SECS))
    }

    /// Login instructions for the user
    pub fn instructions(&self) -> String {
        self.message.clone().unwrap_or_else(|| {
            format!(
                "To sign in, use a web browser to open the page {} and enter the code {} to authenticate.",
                self.verification_uri, self.user_code
            )
        })
    }
}

/// Successful token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// OAuth error body (RFC 6749 section 5.2)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthErrorResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl OAuthErrorResponse {
    pub fn describe(&self) -> String {
        match &self.error_description {
            Some(description) if !description.is_empty() => description.clone(),
            _ if !self.error.is_empty() => self.error.clone(),
            _ => "unknown error".to_string(),
        }
    }
}

/// Graph error envelope: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
