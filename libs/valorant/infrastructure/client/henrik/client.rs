//! HenrikDev API client

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::types::AccountData;
use crate::domain::{ApiEnvelope, RawMatch};
use crate::infrastructure::queue::RateLimiter;

/// Default API base URL
pub const HENRIK_API_BASE_URL: &str = "https://api.henrikdev.xyz/valorant";

/// Base delay between retries, multiplied by the attempt number
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Wait applied when a 429 carries an unreadable `Retry-After`
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Rate limited by the API")]
    RateLimited { retry_after: Option<Duration> },

    #[error("HTTP {status}: {body}")]
    Transient { status: u16, body: String },

    #[error("HTTP {status}: {body}")]
    Fatal { status: u16, body: String },

    #[error("API returned status {0}")]
    ApiStatus(i64),

    #[error("Response has no data: {0}")]
    MissingData(String),

    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<ClientError> },
}

impl ClientError {
    /// Whether trying the same request again may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::RequestFailed(_) | ClientError::RateLimited { .. } | ClientError::Transient { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// `Retry-After` in whole seconds, 60 when it cannot be read
pub fn parse_retry_after(value: &str) -> Duration {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// API client for account lookups, match lists and match details
#[derive(Debug, Clone)]
pub struct HenrikClient {
    base_url: String,
    api_key: String,
    region: String,
    max_retries: u32,
    client: Client,
    limiter: Option<Arc<RateLimiter>>,
}

impl HenrikClient {
    /// Create new client against the public API
    pub fn new(
        api_key: impl Into<String>,
        region: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        Self::with_base_url(HENRIK_API_BASE_URL, api_key, region, timeout, max_retries)
    }

    /// Create new client with custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        region: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .tcp_keepalive(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            region: region.into(),
            max_retries,
            client,
            limiter: None,
        })
    }

    /// Share a rate limiter with other clients and workers
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Look up the PUUID of `name#tag`
    pub async fn get_puuid(&self, name: &str, tag: &str) -> Result<String> {
        let url = self.endpoint(&["v1", "account", &self.region, name, tag])?;
        let account: AccountData = self.get_json(url).await?;
        debug!("Resolved {}#{} to {}", name, tag, account.puuid);
        Ok(account.puuid)
    }

    /// Match IDs of an account in `queue_mode`, most recent first
    pub async fn get_match_ids(&self, name: &str, tag: &str, queue_mode: &str) -> Result<Vec<String>> {
        let puuid = self.get_puuid(name, tag).await?;
        let url = self.endpoint(&["v3", "by-puuid", "account", &puuid, queue_mode])?;
        let ids: Vec<String> = self.get_json(url).await?;
        info!("Found {} {} matches for {}#{}", ids.len(), queue_mode, name, tag);
        Ok(ids)
    }

    /// Full details of one match
    pub async fn get_match(&self, match_id: &str) -> Result<RawMatch> {
        let url = self.endpoint(&["v4", "match", &self.region, match_id])?;
        let mut raw: RawMatch = self.get_json(url).await?;
        if raw.id.is_empty() {
            raw.id = match_id.to_string();
        }
        Ok(raw)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// GET with retries, then unwrap the `{status, data}` envelope
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.get_with_retries(&url).await?;

        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| ClientError::DeserializeFailed(e.to_string()))?;
        if envelope.status != 200 {
            return Err(ClientError::ApiStatus(envelope.status));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::MissingData(url.to_string()))
    }

    async fn get_with_retries(&self, url: &Url) -> Result<String> {
        let mut last_error: Option<ClientError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(RETRY_DELAY * attempt).await;
            }

            match self.send_once(url).await {
                Ok(body) => return Ok(body),
                Err(ClientError::RateLimited { retry_after }) => {
                    warn!("Rate limited on {} (attempt {})", url.path(), attempt + 1);
                    if let Some(wait) = retry_after {
                        tokio::time::sleep(wait).await;
                    }
                    last_error = Some(ClientError::RateLimited { retry_after });
                }
                Err(e) if e.is_retryable() => {
                    warn!("Request to {} failed (attempt {}): {}", url.path(), attempt + 1, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        match last_error {
            Some(last) => Err(ClientError::RetriesExhausted {
                attempts: self.max_retries + 1,
                last: Box::new(last),
            }),
            None => Err(ClientError::MissingData(url.to_string())),
        }
    }

    async fn send_once(&self, url: &Url) -> Result<String> {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .map(parse_retry_after);
            return Err(ClientError::RateLimited { retry_after });
        }

        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }

        let status_code = status.as_u16();
        if status == StatusCode::NOT_FOUND || status == StatusCode::UNAUTHORIZED {
            Err(ClientError::Fatal {
                status: status_code,
                body,
            })
        } else {
            Err(ClientError::Transient {
                status: status_code,
                body,
            })
        }
    }
}
