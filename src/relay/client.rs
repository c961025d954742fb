use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::models::{PayloadMeta, ScorePayload};

/// Configuration for the relay client
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Relay URL (from RESUBA_RELAY_ENDPOINT env var)
    pub endpoint: String,
    /// Optional bearer credential (from RESUBA_RELAY_API_KEY env var)
    pub api_key: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl RelayConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create config from environment variables
    pub fn from_env() -> Result<Self, RelayError> {
        let endpoint = std::env::var("RESUBA_RELAY_ENDPOINT").unwrap_or_default();
        let api_key = std::env::var("RESUBA_RELAY_API_KEY").ok();
        Self::new(endpoint, api_key)
    }

    /// Create with explicit settings. Blank values count as missing.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self, RelayError> {
        let endpoint = endpoint.into().trim().to_string();
        if endpoint.is_empty() {
            return Err(RelayError::MissingEndpoint);
        }
        Ok(Self {
            endpoint,
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Body POSTed to the relay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayRequest {
    pub transcript: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PayloadMeta>,
}

impl RelayRequest {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            meta: None,
        }
    }

    /// Attach the non-empty meta fields; `meta` stays absent if all are empty
    pub fn with_meta(mut self, topic: Option<&str>, side_a: Option<&str>, side_b: Option<&str>) -> Self {
        let keep = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let meta = PayloadMeta {
            topic: keep(topic),
            side_a: keep(side_a),
            side_b: keep(side_b),
            turns: None,
        };
        self.meta = (meta != PayloadMeta::default()).then_some(meta);
        self
    }
}

/// Error object the relay returns instead of a payload
#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    error: String,
    #[serde(default)]
    detail: Option<String>,
    /// Model output that the relay itself could not parse
    #[serde(default)]
    raw: Option<String>,
}

/// Relay HTTP client
pub struct RelayClient {
    client: Client,
    config: RelayConfig,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Send one transcript and return the evaluation payload
    pub async fn analyze(&self, request: &RelayRequest) -> Result<ScorePayload, RelayError> {
        info!(
            "Sending {} chars of transcript to {}",
            request.transcript.chars().count(),
            self.config.endpoint
        );

        let mut builder = self.client.post(&self.config.endpoint).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Relay answered HTTP {} with {} bytes", status, body.len());

        let result = classify_response(status, &body);
        if let Err(e) = &result {
            warn!("Relay call failed: {}", e);
        }
        result
    }
}

/// Turn a relay answer into a payload or a classified failure
pub fn classify_response(status: u16, body: &str) -> Result<ScorePayload, RelayError> {
    if let Ok(error_body) = serde_json::from_str::<RelayErrorBody>(body) {
        return Err(match error_body.raw {
            Some(raw) => RelayError::ModelOutput { raw },
            None => RelayError::Remote {
                status,
                error: error_body.error,
                detail: error_body.detail,
            },
        });
    }

    if !(200..300).contains(&status) {
        let body = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body.to_string()
        };
        return Err(RelayError::Status { status, body });
    }

    ScorePayload::from_json(body).map_err(|_| RelayError::UnparsableResponse {
        raw: body.to_string(),
    })
}
