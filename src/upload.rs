use crate::client::AnalysisProvider;
use crate::config::UploadConfig;
use crate::error::{DefakexError, Result, ValidationError};
use crate::events::{DefakexEvent, EventBus};
use crate::media::{AnalysisResult, MediaAsset, MediaKind, PreviewHandle};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Upload widget lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    FileSelected,
    Analyzing,
    ResultReady,
}

struct Inner {
    state: UploadState,
    asset: Option<MediaAsset>,
    preview: Option<PreviewHandle>,
    result: Option<AnalysisResult>,
    /// Token of the newest request or selection; responses carrying an
    /// older token are discarded
    latest_request: u64,
}

/// Media-upload widget: accepts a user-selected file, enforces the
/// per-kind size ceiling, derives a local preview, and drives the
/// analysis provider. A new selection supersedes (but does not cancel
/// in transport) any prior request.
pub struct UploadWidget {
    config: UploadConfig,
    provider: Arc<dyn AnalysisProvider>,
    events: EventBus,
    request_counter: AtomicU64,
    inner: Mutex<Inner>,
}

impl UploadWidget {
    pub fn new(config: UploadConfig, provider: Arc<dyn AnalysisProvider>, events: EventBus) -> Self {
        Self {
            config,
            provider,
            events,
            request_counter: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: UploadState::Idle,
                asset: None,
                preview: None,
                result: None,
                latest_request: 0,
            }),
        }
    }

    pub fn state(&self) -> UploadState {
        self.inner.lock().state
    }

    pub fn asset(&self) -> Option<MediaAsset> {
        self.inner.lock().asset.clone()
    }

    pub fn preview_url(&self) -> Option<String> {
        self.inner
            .lock()
            .preview
            .as_ref()
            .map(|p| p.url().to_string())
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        self.inner.lock().result.clone()
    }

    /// Size ceiling for a media kind
    fn ceiling(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Video => self.config.max_video_bytes,
            MediaKind::Image | MediaKind::CameraFrame => self.config.max_image_bytes,
        }
    }

    /// Store a newly selected asset. Oversized files are rejected with a
    /// notification and no state change; otherwise the prior preview is
    /// revoked, any prior result is cleared, and any in-flight request is
    /// superseded.
    pub fn select_file(&self, asset: MediaAsset) -> Result<()> {
        let limit = self.ceiling(asset.kind);
        let size = asset.size_bytes();
        if size > limit {
            let plural = match asset.kind {
                MediaKind::Video => "Videos",
                MediaKind::Image => "Images",
                MediaKind::CameraFrame => "Camera frames",
            };
            self.events.notify_error(
                "File too large",
                &format!("{} must be smaller than {}MB", plural, limit / (1024 * 1024)),
            );
            return Err(ValidationError::FileTooLarge {
                kind: asset.kind,
                size,
                limit,
            }
            .into());
        }

        let mut inner = self.inner.lock();
        if let Some(preview) = inner.preview.as_mut() {
            preview.revoke();
        }
        inner.preview = Some(PreviewHandle::for_asset(&asset));
        debug!("Selected {} '{}' ({} bytes)", asset.kind, asset.name, size);
        inner.asset = Some(asset);
        inner.result = None;
        inner.state = UploadState::FileSelected;
        // Supersede any response still in transport
        inner.latest_request = self.next_token();
        Ok(())
    }

    /// Run the selected asset through the analysis provider. Returns
    /// `Ok(None)` when the response was superseded by a newer selection
    /// before it arrived.
    pub async fn analyze(&self) -> Result<Option<AnalysisResult>> {
        let (asset, token) = {
            let mut inner = self.inner.lock();
            if inner.state == UploadState::Analyzing {
                warn!("analyze() ignored; a request is already in flight");
                return Err(DefakexError::system("An analysis is already in flight"));
            }
            let asset = match inner.asset.clone() {
                Some(asset) => asset,
                None => {
                    self.events
                        .notify_error("No file selected", "Please select a file to analyze");
                    return Err(ValidationError::NoFileSelected.into());
                }
            };
            let token = self.next_token();
            inner.latest_request = token;
            inner.state = UploadState::Analyzing;
            (asset, token)
        };

        self.events.publish(DefakexEvent::AnalysisStarted {
            request: token,
            kind: asset.kind,
        });

        let outcome = self.provider.analyze(&asset).await;

        let mut inner = self.inner.lock();
        if inner.latest_request != token {
            debug!(
                "Response for request {} discarded; request {} is newer",
                token, inner.latest_request
            );
            return Ok(None);
        }

        match outcome {
            Ok(result) => {
                inner.state = UploadState::ResultReady;
                inner.result = Some(result.clone());
                drop(inner);
                self.events.publish(DefakexEvent::AnalysisCompleted {
                    request: token,
                    is_real: result.is_real,
                });
                self.events.notify_info(
                    "Analysis Complete",
                    &format!("The {} has been analyzed successfully.", asset.kind),
                );
                Ok(Some(result))
            }
            Err(e) => {
                // The provider already raised its notification; fall back
                // to the pre-request state
                inner.state = UploadState::FileSelected;
                Err(e)
            }
        }
    }

    fn next_token(&self) -> u64 {
        self.request_counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for UploadWidget {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        if let Some(preview) = inner.preview.as_mut() {
            preview.revoke();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::events::Severity;
    use async_trait::async_trait;
    use tokio::sync::broadcast;
    use tokio::sync::Semaphore;

    fn test_config() -> UploadConfig {
        UploadConfig {
            max_video_bytes: 100 * 1024 * 1024,
            max_image_bytes: 20 * 1024 * 1024,
        }
    }

    fn fake_result() -> AnalysisResult {
        AnalysisResult {
            is_real: false,
            confidence: 0.8,
            details: Some("Video analysis complete. Model prediction: FAKE".to_string()),
        }
    }

    struct FixedProvider {
        result: AnalysisResult,
    }

    #[async_trait]
    impl AnalysisProvider for FixedProvider {
        async fn analyze(&self, _asset: &MediaAsset) -> Result<AnalysisResult> {
            Ok(self.result.clone())
        }
    }

    /// Mirrors the HTTP client's failure contract: one notification, then
    /// the propagated error
    struct FailingProvider {
        events: EventBus,
    }

    #[async_trait]
    impl AnalysisProvider for FailingProvider {
        async fn analyze(&self, _asset: &MediaAsset) -> Result<AnalysisResult> {
            self.events.notify_error(
                "Analysis Failed",
                "Error connecting to ML model. Is the server running?",
            );
            Err(TransportError::Status { status: 500 }.into())
        }
    }

    /// Holds every request until the test releases a permit
    struct GatedProvider {
        gate: Arc<Semaphore>,
        result: AnalysisResult,
    }

    #[async_trait]
    impl AnalysisProvider for GatedProvider {
        async fn analyze(&self, _asset: &MediaAsset) -> Result<AnalysisResult> {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| DefakexError::system("gate closed"))?;
            permit.forget();
            Ok(self.result.clone())
        }
    }

    fn video_asset(size: usize) -> MediaAsset {
        MediaAsset::new("clip.mp4", MediaKind::Video, vec![0u8; size])
    }

    fn image_asset(size: usize) -> MediaAsset {
        MediaAsset::new("photo.jpg", MediaKind::Image, vec![0u8; size])
    }

    fn destructive_count(rx: &mut broadcast::Receiver<DefakexEvent>) -> usize {
        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(
                event,
                DefakexEvent::Notification {
                    severity: Severity::Destructive,
                    ..
                }
            ) {
                count += 1;
            }
        }
        count
    }

    #[tokio::test]
    async fn test_oversized_video_rejected_without_state_change() {
        let events = EventBus::new(16);
        let mut rx = events.subscribe();
        let widget = UploadWidget::new(
            test_config(),
            Arc::new(FixedProvider {
                result: fake_result(),
            }),
            events,
        );

        // 150 MB exceeds the 100 MB video ceiling
        let err = widget.select_file(video_asset(150 * 1024 * 1024)).unwrap_err();
        assert!(matches!(
            err,
            DefakexError::Validation(ValidationError::FileTooLarge { .. })
        ));
        assert_eq!(widget.state(), UploadState::Idle);
        assert!(widget.asset().is_none());
        assert_eq!(destructive_count(&mut rx), 1);
    }

    #[tokio::test]
    async fn test_oversized_selection_leaves_prior_asset_untouched() {
        let events = EventBus::new(16);
        let widget = UploadWidget::new(
            test_config(),
            Arc::new(FixedProvider {
                result: fake_result(),
            }),
            events,
        );

        widget.select_file(image_asset(5 * 1024 * 1024)).unwrap();
        widget.analyze().await.unwrap();
        assert_eq!(widget.state(), UploadState::ResultReady);

        let err = widget.select_file(image_asset(21 * 1024 * 1024)).unwrap_err();
        assert!(matches!(err, DefakexError::Validation(_)));

        // Prior asset and result survive the rejected selection
        assert_eq!(widget.state(), UploadState::ResultReady);
        assert_eq!(widget.asset().unwrap().name, "photo.jpg");
        assert!(widget.result().is_some());
    }

    #[tokio::test]
    async fn test_analyze_without_selection_is_rejected() {
        let events = EventBus::new(16);
        let mut rx = events.subscribe();
        let widget = UploadWidget::new(
            test_config(),
            Arc::new(FixedProvider {
                result: fake_result(),
            }),
            events,
        );

        let err = widget.analyze().await.unwrap_err();
        assert!(matches!(
            err,
            DefakexError::Validation(ValidationError::NoFileSelected)
        ));
        assert_eq!(widget.state(), UploadState::Idle);
        assert_eq!(destructive_count(&mut rx), 1);
    }

    #[tokio::test]
    async fn test_select_and_analyze_happy_path() {
        let events = EventBus::new(16);
        let widget = UploadWidget::new(
            test_config(),
            Arc::new(FixedProvider {
                result: fake_result(),
            }),
            events,
        );

        widget.select_file(image_asset(5 * 1024 * 1024)).unwrap();
        assert_eq!(widget.state(), UploadState::FileSelected);
        assert!(widget.preview_url().is_some());
        assert!(widget.result().is_none());

        let result = widget.analyze().await.unwrap().unwrap();
        assert_eq!(widget.state(), UploadState::ResultReady);
        assert!(!result.is_real);
        assert_eq!(result.confidence, 0.8);
        assert!(result.details.unwrap().contains("FAKE"));
        // Confidence is a defined value in [0, 1]
        let stored = widget.result().unwrap();
        assert!((0.0..=1.0).contains(&stored.confidence));
    }

    #[tokio::test]
    async fn test_new_selection_clears_prior_result_and_preview() {
        let events = EventBus::new(16);
        let widget = UploadWidget::new(
            test_config(),
            Arc::new(FixedProvider {
                result: fake_result(),
            }),
            events,
        );

        widget.select_file(image_asset(1024)).unwrap();
        widget.analyze().await.unwrap();
        let first_preview = widget.preview_url().unwrap();

        widget.select_file(video_asset(1024)).unwrap();
        assert_eq!(widget.state(), UploadState::FileSelected);
        assert!(widget.result().is_none());
        assert_ne!(widget.preview_url().unwrap(), first_preview);
    }

    #[tokio::test]
    async fn test_provider_failure_returns_to_file_selected() {
        let events = EventBus::new(16);
        let widget = UploadWidget::new(
            test_config(),
            Arc::new(FailingProvider {
                events: events.clone(),
            }),
            events.clone(),
        );

        widget.select_file(image_asset(1024)).unwrap();
        let mut rx = events.subscribe();

        let err = widget.analyze().await.unwrap_err();
        assert!(matches!(err, DefakexError::Transport(_)));
        assert_eq!(widget.state(), UploadState::FileSelected);
        assert!(widget.result().is_none());
        // Exactly one failure notification, raised by the provider
        assert_eq!(destructive_count(&mut rx), 1);
    }

    #[tokio::test]
    async fn test_http_500_end_to_end() {
        use crate::client::AnalysisClient;
        use crate::config::DefakexConfig;
        use axum::http::StatusCode;
        use axum::routing::post;
        use axum::Router;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let router = Router::new().route(
                "/predict-video/",
                post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            );
            axum::serve(listener, router).await.unwrap();
        });

        let events = EventBus::new(16);
        let mut config = DefakexConfig::default();
        config.analysis.base_url = format!("http://{}", addr);
        let client = Arc::new(AnalysisClient::new(config.analysis, events.clone()).unwrap());
        let widget = UploadWidget::new(test_config(), client, events.clone());

        widget.select_file(image_asset(5 * 1024 * 1024)).unwrap();
        let mut rx = events.subscribe();

        let err = widget.analyze().await.unwrap_err();
        assert!(matches!(
            err,
            DefakexError::Transport(TransportError::Status { status: 500 })
        ));
        assert_eq!(widget.state(), UploadState::FileSelected);
        assert!(widget.result().is_none());
        assert_eq!(destructive_count(&mut rx), 1);
    }

    #[tokio::test]
    async fn test_reinvocation_while_analyzing_is_rejected() {
        let events = EventBus::new(16);
        let gate = Arc::new(Semaphore::new(0));
        let widget = Arc::new(UploadWidget::new(
            test_config(),
            Arc::new(GatedProvider {
                gate: gate.clone(),
                result: fake_result(),
            }),
            events,
        ));

        widget.select_file(image_asset(1024)).unwrap();

        let task = {
            let widget = Arc::clone(&widget);
            tokio::spawn(async move { widget.analyze().await })
        };
        while widget.state() != UploadState::Analyzing {
            tokio::task::yield_now().await;
        }

        let err = widget.analyze().await.unwrap_err();
        assert!(matches!(err, DefakexError::System { .. }));

        gate.add_permits(1);
        let result = task.await.unwrap().unwrap();
        assert!(result.is_some());
        assert_eq!(widget.state(), UploadState::ResultReady);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded_after_reselection() {
        let events = EventBus::new(16);
        let gate = Arc::new(Semaphore::new(0));
        let widget = Arc::new(UploadWidget::new(
            test_config(),
            Arc::new(GatedProvider {
                gate: gate.clone(),
                result: fake_result(),
            }),
            events,
        ));

        widget.select_file(image_asset(1024)).unwrap();

        let task = {
            let widget = Arc::clone(&widget);
            tokio::spawn(async move { widget.analyze().await })
        };
        while widget.state() != UploadState::Analyzing {
            tokio::task::yield_now().await;
        }

        // A newer selection supersedes the in-flight request
        widget.select_file(image_asset(2048)).unwrap();
        assert_eq!(widget.state(), UploadState::FileSelected);

        gate.add_permits(1);
        let stale = task.await.unwrap().unwrap();
        assert!(stale.is_none());

        // The stale response neither stored a result nor moved the state
        assert_eq!(widget.state(), UploadState::FileSelected);
        assert!(widget.result().is_none());

        // The superseding selection analyzes normally
        gate.add_permits(1);
        let fresh = widget.analyze().await.unwrap();
        assert!(fresh.is_some());
        assert_eq!(widget.state(), UploadState::ResultReady);
    }
}
