//! Access token acquisition for Microsoft Graph
//!
//! Order of attempts:
//! 1. a cached access token that is still valid
//! 2. a silent refresh with the cached refresh token
//! 3. the interactive device-authorization grant

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use tokio::time::{Instant, sleep};

use super::constants::{
    AUTHORITY_HOST, DEVICE_CODE_GRANT_TYPE, MAX_POLL_INTERVAL_SECS, REFRESH_TOKEN_GRANT_TYPE,
    SLOW_DOWN_INCREMENT_SECS, scope_string,
};
use super::models::{DeviceCodeResponse, OAuthErrorResponse, TokenInfo, TokenResponse};
use super::token_cache::TokenCache;
use crate::config::AzureConfig;
use crate::error::ReconError;

/// What to do after a non-success answer while polling the token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
enum PollOutcome {
    Pending,
    SlowDown,
    Failed(String),
}

fn classify_poll_error(err: &OAuthErrorResponse) -> PollOutcome {
    match err.error.as_str() {
        "authorization_pending" => PollOutcome::Pending,
        "slow_down" => PollOutcome::SlowDown,
        _ => PollOutcome::Failed(err.describe()),
    }
}

pub struct AuthManager {
    http: reqwest::Client,
    config: AzureConfig,
    cache: TokenCache,
    /// Tenant-specific authority, e.g. `https://login.microsoftonline.com/{tenant}`
    authority: String,
}

impl AuthManager {
    pub fn new(config: AzureConfig, cache: TokenCache) -> Self {
        let authority = format!("{}/{}", AUTHORITY_HOST, config.tenant_id);
        Self::with_authority(config, cache, authority)
    }

    pub fn with_authority(config: AzureConfig, cache: TokenCache, authority: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            cache,
            authority: authority.trim_end_matches('/').to_string(),
        }
    }

    fn device_code_url(&self) -> String {
        format!("{}/oauth2/v2.0/devicecode", self.authority)
    }

    fn token_url(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority)
    }

    fn cache_key(&self) -> String {
        TokenCache::key(&self.config.tenant_id, &self.config.client_id)
    }

    /// Return a bearer token, logging the user in when nothing usable is cached
    pub async fn acquire_token(&self) -> Result<String> {
        let key = self.cache_key();

        if let Some(cached) = self.cache.load(&key)? {
            if cached.is_valid_at(Utc::now()) {
                println!("{}", "Successfully acquired token from cache.".green());
                return Ok(cached.access_token);
            }

            if let Some(refresh_token) = cached.refresh_token.as_deref() {
                match self.refresh(refresh_token).await {
                    Ok(token) => {
                        self.cache.store(&key, &token)?;
                        println!("{}", "Successfully refreshed cached token.".green());
                        return Ok(token.access_token);
                    }
                    Err(e) => {
                        log::warn!("Token refresh failed, falling back to device login: {:#}", e);
                    }
                }
            }
        }

        let device = self.start_device_flow().await?;

        println!("{}", "--- User Login Required ---".bold());
        println!("{}", device.instructions());

        let token = self.poll_device_flow(&device).await?;
        self.cache.store(&key, &token)?;
        println!("{}", "Successfully acquired new token.".green());

        Ok(token.access_token)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenInfo> {
        log::debug!("Refreshing access token at {}", self.token_url());

        let scope = scope_string();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", REFRESH_TOKEN_GRANT_TYPE),
            ("refresh_token", refresh_token),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http
            .post(self.token_url())
            .form(&params)
            .send()
            .await
            .context("Failed to reach the token endpoint")?;

        if !response.status().is_success() {
            let err: OAuthErrorResponse = response.json().await.unwrap_or_default();
            return Err(ReconError::Auth(err.describe()).into());
        }

        let body: TokenResponse = response
            .json()
            .await
            .context("Invalid token endpoint response")?;
        Ok(TokenInfo::from_response(body, Utc::now()))
    }

    async fn start_device_flow(&self) -> Result<DeviceCodeResponse> {
        let scope = scope_string();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http
            .post(self.device_code_url())
            .form(&params)
            .send()
            .await
            .context("Failed to reach the device code endpoint")?;

        if !response.status().is_success() {
            let err: OAuthErrorResponse = response.json().await.unwrap_or_default();
            return Err(ReconError::Auth(format!(
                "Failed to create device flow ({}). Check the app registration in the Azure portal.",
                err.describe()
            ))
            .into());
        }

        response
            .json()
            .await
            .context("Invalid device code endpoint response")
    }

    /// Poll the token endpoint until the user completes (or abandons) the login
    async fn poll_device_flow(&self, device: &DeviceCodeResponse) -> Result<TokenInfo> {
        let deadline = Instant::now() + device.lifetime();
        let mut interval = device.poll_interval();

        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", DEVICE_CODE_GRANT_TYPE),
            ("device_code", device.device_code.as_str()),
        ];

        loop {
            if Instant::now() >= deadline {
                return Err(ReconError::Auth(
                    "Device code expired before the login was completed".to_string(),
                )
                .into());
            }

            sleep(interval).await;

            let response = self
                .http
                .post(self.token_url())
                .form(&params)
                .send()
                .await
                .context("Failed to reach the token endpoint")?;

            if response.status().is_success() {
                let body: TokenResponse = response
                    .json()
                    .await
                    .context("Invalid token endpoint response")?;
                return Ok(TokenInfo::from_response(body, Utc::now()));
            }

            let err: OAuthErrorResponse = response.json().await.unwrap_or_default();
            match classify_poll_error(&err) {
                PollOutcome::Pending => {
                    log::debug!("Waiting for user to complete device login");
                }
                PollOutcome::SlowDown => {
                    interval = (interval + Duration::from_secs(SLOW_DOWN_INCREMENT_SECS))
                        .min(Duration::from_secs(MAX_POLL_INTERVAL_SECS));
                    log::debug!("Provider asked to slow down; polling every {:?}", interval);
                }
                PollOutcome::Failed(description) => {
                    return Err(ReconError::Auth(description).into());
                }
            }
        }
    }
}
