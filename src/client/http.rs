use super::response::WireResponse;
use super::AnalysisProvider;
use crate::config::{AnalysisConfig, EndpointStyle};
use crate::error::{DefakexError, Result, TransportError};
use crate::events::EventBus;
use crate::media::{AnalysisResult, MediaAsset, MediaKind};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, error, info};

const FAILURE_TITLE: &str = "Analysis Failed";
const FAILURE_DESCRIPTION: &str = "Error connecting to ML model. Is the server running?";

/// HTTP client for the external detection service. Uploads the payload
/// as multipart form field `file` and normalizes both observed response
/// shapes into [`AnalysisResult`].
pub struct AnalysisClient {
    http: reqwest::Client,
    config: AnalysisConfig,
    events: EventBus,
}

impl AnalysisClient {
    pub fn new(config: AnalysisConfig, events: EventBus) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DefakexError::system(format!("Failed to build HTTP client: {}", e)))?;

        debug!(
            "Analysis client ready for {} ({:?} endpoints, {}s timeout)",
            config.base_url, config.endpoint_style, config.timeout_seconds
        );

        Ok(Self {
            http,
            config,
            events,
        })
    }

    /// Endpoint URL for a media kind under the configured path layout
    fn endpoint_for(&self, kind: MediaKind) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match self.config.endpoint_style {
            EndpointStyle::Legacy => format!("{}/predict-video/", base),
            EndpointStyle::Modern => format!("{}/analyze/{}", base, kind.path_segment()),
        }
    }

    async fn post_media(
        &self,
        asset: &MediaAsset,
    ) -> std::result::Result<AnalysisResult, TransportError> {
        let url = self.endpoint_for(asset.kind);
        debug!(
            "Posting {} ({} bytes) to {}",
            asset.kind,
            asset.size_bytes(),
            url
        );

        let part = Part::bytes(asset.data().to_vec())
            .file_name(asset.name.clone())
            .mime_str(&asset.mime())
            .map_err(|e| TransportError::Connect {
                details: e.to_string(),
            })?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        seconds: self.config.timeout_seconds,
                    }
                } else {
                    TransportError::Connect {
                        details: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let wire: WireResponse =
            response
                .json()
                .await
                .map_err(|e| TransportError::MalformedBody {
                    details: e.to_string(),
                })?;

        let result = wire.normalize(
            asset.kind,
            self.config.placeholder_confidence_real,
            self.config.placeholder_confidence_fake,
        );
        info!(
            "Analysis of {} resolved: {} ({}%)",
            asset.kind,
            result.verdict(),
            result.confidence_percent()
        );
        Ok(result)
    }
}

#[async_trait]
impl AnalysisProvider for AnalysisClient {
    async fn analyze(&self, asset: &MediaAsset) -> Result<AnalysisResult> {
        match self.post_media(asset).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("Error analyzing {}: {}", asset.kind, e);
                self.events.notify_error(FAILURE_TITLE, FAILURE_DESCRIPTION);
                Err(e.into())
            }
        }
    }
}
