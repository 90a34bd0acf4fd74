//! HTTP client for the netgauge backend.

use bytes::Bytes;
use netgauge_types::{ProbeKey, ProbeValue};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::url::{BASE_URL_ENV, DEFAULT_BASE_URL, endpoint_url, normalize_base_url};

/// Request header carrying the client clock at upload start, in epoch ms.
pub const START_TIME_HEADER: &str = "x-start-time";

/// Multipart field name of the upload payload.
const UPLOAD_FIELD: &str = "file";

/// Configuration for the probe client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL; endpoints are appended to it.
    pub base_url: String,
    /// Total attempts per retried probe, including the first.
    pub max_attempts: u32,
    /// Whole-request timeout. `None` lets a hung request stall the cycle.
    pub timeout: Option<Duration>,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: 3,
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("netgauge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration whose base URL comes from `NETGAUGE_API_URL`,
    /// falling back to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            ..Default::default()
        }
    }

    /// Creates a default configuration for the given base URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Errors that can occur during a single probe request.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Transport, body or decoding failure.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// A cycle was requested while another one is running.
    #[error("a probe cycle is already running")]
    CycleInProgress,
}

/// Final outcome of a retried probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    /// Value to store in the probe's result slot.
    pub value: ProbeValue,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Whether any attempt succeeded.
    pub succeeded: bool,
}

/// Timing of a completed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSample {
    /// Payload size in bytes.
    pub bytes: usize,
    /// Client-measured time from send to response.
    pub elapsed: Duration,
    /// Server-reported upload time in seconds, if any.
    pub server_seconds: Option<f64>,
}

impl UploadSample {
    /// Upload duration in seconds, preferring the server's measurement.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.server_seconds
            .unwrap_or_else(|| self.elapsed.as_secs_f64())
    }
}

/// Upload endpoint reply.
#[derive(Debug, Deserialize)]
struct UploadReply {
    #[serde(rename = "uploadTime")]
    upload_time: Option<f64>,
}

/// HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    client: Client,
    config: ClientConfig,
    base_url: String,
}

impl ProbeClient {
    /// Creates a new probe client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            // Disable Nagle's algorithm so small probes are not delayed
            .tcp_nodelay(true)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let base_url = normalize_base_url(&config.base_url);
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Creates a client with configuration taken from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_env() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::from_env())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the full URL of a probe endpoint.
    #[must_use]
    pub fn endpoint(&self, key: ProbeKey) -> String {
        endpoint_url(&self.base_url, key)
    }

    /// Fetches a probe endpoint once and decodes its JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or invalid JSON.
    pub async fn get_json(&self, key: ProbeKey) -> Result<serde_json::Value, ProbeError> {
        let response = self.client.get(self.endpoint(key)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetches a probe endpoint, retrying failed attempts without delay.
    ///
    /// The stored value is the JSON field named after the probe key, or the
    /// whole body as text when that field is absent. Only the last failure
    /// is reported, as `"Request failed: {message}"`.
    pub async fn fetch_with_retry(&self, key: ProbeKey) -> ProbeOutcome {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.get_json(key).await {
                Ok(body) => {
                    let value = body
                        .get(key.as_str())
                        .map_or_else(|| ProbeValue::Text(body.to_string()), ProbeValue::from_json);
                    return ProbeOutcome {
                        value,
                        attempts: attempt,
                        succeeded: true,
                    };
                }
                Err(e) if attempt < max_attempts => {
                    tracing::debug!(%key, attempt, error = %e, "probe attempt failed, retrying");
                }
                Err(e) => {
                    tracing::warn!(%key, attempts = attempt, error = %e, "probe failed");
                    return ProbeOutcome {
                        value: ProbeValue::Text(format!("Request failed: {e}")),
                        attempts: attempt,
                        succeeded: false,
                    };
                }
            }
        }
    }

    /// Opens the download endpoint, returning the response with an unread body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn open_download(&self) -> Result<reqwest::Response, ProbeError> {
        let response = self
            .client
            .get(self.endpoint(ProbeKey::Download))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Posts `payload` as a multipart `file` field to the upload endpoint.
    ///
    /// The request carries the client clock in the `x-start-time` header. A
    /// reply without a readable `uploadTime` falls back to client timing.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn upload(&self, payload: Bytes) -> Result<UploadSample, ProbeError> {
        let bytes = payload.len();
        let part = Part::stream(payload)
            .file_name("payload.bin")
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let started_at = chrono::Utc::now().timestamp_millis();
        let start = Instant::now();
        let response = self
            .client
            .post(self.endpoint(ProbeKey::Upload))
            .header(START_TIME_HEADER, started_at.to_string())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let elapsed = start.elapsed();
        let server_seconds = serde_json::from_slice::<UploadReply>(&body)
            .ok()
            .and_then(|reply| reply.upload_time);

        Ok(UploadSample {
            bytes,
            elapsed,
            server_seconds,
        })
    }
}
