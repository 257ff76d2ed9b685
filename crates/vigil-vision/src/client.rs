//! HTTP client for the perception services.
//!
//! The two extractors are independent endpoints of one annotator service:
//! `/v1/objects` (localization) and `/v1/labels` (scene labels). Requests
//! carry the encoded image bytes; responses are JSON. No retry loop lives
//! here: failures map to [`VisionError`] and the caller decides.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use vigil_models::{LabelSignal, ObjectSignal};

use crate::error::{VisionError, VisionResult};
use crate::metrics::{record_request, record_signals};
use crate::types::{LocalizedObject, SceneLabel};
use crate::VisionBackend;

/// Vision client configuration.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Base URL of the annotator service.
    pub base_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
}

impl VisionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> VisionResult<Self> {
        let base_url = std::env::var("VISION_BASE_URL").map_err(|_| {
            VisionError::RequestFailed("VISION_BASE_URL must be set to reach the annotator".into())
        })?;

        let timeout_secs: u64 = std::env::var("VISION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let connect_timeout_secs: u64 = std::env::var("VISION_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            base_url,
            api_key: std::env::var("VISION_API_KEY").ok(),
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ObjectsResponse {
    #[serde(default)]
    objects: Vec<LocalizedObject>,
}

#[derive(Debug, Deserialize)]
struct LabelsResponse {
    #[serde(default)]
    labels: Vec<SceneLabel>,
}

/// HTTP client for the annotator service.
#[derive(Clone)]
pub struct VisionClient {
    http: Client,
    config: VisionConfig,
}

impl VisionClient {
    /// Create a new vision client.
    pub fn new(config: VisionConfig) -> VisionResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("vigil-vision/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(VisionError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VisionResult<Self> {
        Self::new(VisionConfig::from_env()?)
    }

    async fn post_image(&self, endpoint: &'static str, image: &[u8]) -> VisionResult<String> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self
            .http
            .post(&url)
            .header("content-type", "application/octet-stream")
            .body(image.to_vec());

        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await;
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                record_request(endpoint, false);
                return Err(VisionError::Network(e));
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(VisionError::Network)?;
        if status != StatusCode::OK {
            record_request(endpoint, false);
            return Err(VisionError::from_http_status(status.as_u16(), body));
        }

        record_request(endpoint, true);
        Ok(body)
    }
}

#[async_trait]
impl VisionBackend for VisionClient {
    async fn localize_objects(&self, image: &[u8]) -> VisionResult<Vec<ObjectSignal>> {
        let body = self.post_image("v1/objects", image).await?;
        let parsed: ObjectsResponse = serde_json::from_str(&body)
            .map_err(|e| VisionError::invalid_response(format!("objects payload: {e}")))?;

        let total = parsed.objects.len();
        let signals: Vec<ObjectSignal> = parsed
            .objects
            .into_iter()
            .filter_map(LocalizedObject::into_signal)
            .collect();

        if signals.len() < total {
            debug!(
                dropped = total - signals.len(),
                "dropped malformed localization candidates"
            );
        }
        record_signals("v1/objects", signals.len());
        Ok(signals)
    }

    async fn detect_labels(&self, image: &[u8]) -> VisionResult<Vec<LabelSignal>> {
        let body = self.post_image("v1/labels", image).await?;
        let parsed: LabelsResponse = serde_json::from_str(&body)
            .map_err(|e| VisionError::invalid_response(format!("labels payload: {e}")))?;

        let signals: Vec<LabelSignal> = parsed
            .labels
            .into_iter()
            .map(SceneLabel::into_signal)
            .collect();
        record_signals("v1/labels", signals.len());
        Ok(signals)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
