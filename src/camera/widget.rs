use super::device::{CameraDevice, RawFrame, StreamTrack};
use super::filter::FilterKind;
use super::session::CaptureSession;
use crate::client::AnalysisProvider;
use crate::config::CameraConfig;
use crate::error::{Result, SessionError};
use crate::events::{DefakexEvent, EventBus};
use crate::media::{AnalysisResult, MediaAsset, MediaKind};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Camera widget lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Stopped,
    Starting,
    Live,
    Capturing,
}

struct Inner {
    state: CameraState,
    session: Option<CaptureSession>,
    result: Option<AnalysisResult>,
}

/// Live-camera capture widget: acquires a stream, applies a cosmetic
/// filter to the preview, captures a still frame on demand, and hands it
/// to the analysis provider (the HTTP client or, behind the explicit
/// configuration flag, the simulation).
pub struct CameraWidget {
    config: CameraConfig,
    device: Arc<dyn CameraDevice>,
    provider: Arc<dyn AnalysisProvider>,
    events: EventBus,
    request_counter: AtomicU64,
    inner: Mutex<Inner>,
}

impl CameraWidget {
    pub fn new(
        config: CameraConfig,
        device: Arc<dyn CameraDevice>,
        provider: Arc<dyn AnalysisProvider>,
        events: EventBus,
    ) -> Self {
        Self {
            config,
            device,
            provider,
            events,
            request_counter: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: CameraState::Stopped,
                session: None,
                result: None,
            }),
        }
    }

    pub fn state(&self) -> CameraState {
        self.inner.lock().state
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        self.inner.lock().result.clone()
    }

    /// Currently selected cosmetic filter
    pub fn filter(&self) -> FilterKind {
        self.inner
            .lock()
            .session
            .as_ref()
            .map(|s| s.filter())
            .unwrap_or_default()
    }

    /// Number of live tracks held by the open session, if any
    pub fn live_track_count(&self) -> usize {
        self.inner
            .lock()
            .session
            .as_ref()
            .map(|s| s.live_track_count())
            .unwrap_or(0)
    }

    /// Cloned track handles for external observation
    pub fn track_handles(&self) -> Vec<StreamTrack> {
        self.inner
            .lock()
            .session
            .as_ref()
            .map(|s| s.track_handles())
            .unwrap_or_default()
    }

    /// Request camera access and go live. A second start without a stop
    /// is rejected so the widget never holds two streams.
    pub async fn start(&self) -> Result<()> {
        {
            let mut inner = self.inner.lock();
            if inner.session.is_some() || inner.state != CameraState::Stopped {
                self.events
                    .notify_error("Camera Error", "Camera is already running.");
                return Err(SessionError::AlreadyOpen.into());
            }
            inner.state = CameraState::Starting;
        }

        match self.device.open(&self.config).await {
            Ok(stream) => {
                {
                    let mut inner = self.inner.lock();
                    if inner.state != CameraState::Starting {
                        // stop() raced the grant; the fresh stream must not
                        // outlive it
                        stream.stop_all();
                        debug!("Camera grant superseded by stop; stream released");
                        return Ok(());
                    }
                    inner.session = Some(CaptureSession::new(stream));
                    inner.state = CameraState::Live;
                }
                self.events.notify_info(
                    "Camera Started",
                    "Your camera is now active and ready for analysis.",
                );
                self.events
                    .publish(DefakexEvent::CameraStatusChanged { live: true });
                Ok(())
            }
            Err(e) => {
                self.inner.lock().state = CameraState::Stopped;
                self.events.notify_error(
                    "Camera Error",
                    "Could not access camera. Please check permissions and try again.",
                );
                Err(e.into())
            }
        }
    }

    /// Select the cosmetic filter. Affects the live preview and the next
    /// capture, never a capture already taken.
    pub fn apply_filter(&self, filter: FilterKind) {
        let mut inner = self.inner.lock();
        match inner.session.as_mut() {
            Some(session) => {
                session.set_filter(filter);
                debug!("Filter set to {:?}", filter);
            }
            None => debug!("Filter change ignored; no open session"),
        }
    }

    /// Capture the current frame with the filter baked in and obtain a
    /// verdict for it. Returns `Ok(None)` when the capture was superseded
    /// by a stop before its response arrived.
    pub async fn capture_and_analyze(&self) -> Result<Option<AnalysisResult>> {
        let (frame, filter) = {
            let mut inner = self.inner.lock();
            if inner.state != CameraState::Live {
                self.events
                    .notify_error("Camera Error", "Camera is not live.");
                return Err(SessionError::NotLive.into());
            }
            let session = match inner.session.as_ref() {
                Some(session) => session,
                None => {
                    self.events
                        .notify_error("Camera Error", "Camera is not live.");
                    return Err(SessionError::NotLive.into());
                }
            };
            let frame = session.grab_frame()?;
            let filter = session.filter();
            inner.state = CameraState::Capturing;
            (frame, filter)
        };

        let outcome = self.analyze_frame(frame, filter).await;

        let mut inner = self.inner.lock();
        match outcome {
            Ok(result) => {
                if inner.state != CameraState::Capturing {
                    debug!("Capture superseded by stop; result discarded");
                    return Ok(None);
                }
                inner.state = CameraState::Live;
                inner.result = Some(result.clone());
                drop(inner);
                self.events
                    .notify_info("Analysis Complete", "Live camera capture has been analyzed.");
                Ok(Some(result))
            }
            Err(e) => {
                if inner.state == CameraState::Capturing {
                    inner.state = CameraState::Live;
                }
                Err(e)
            }
        }
    }

    async fn analyze_frame(&self, frame: RawFrame, filter: FilterKind) -> Result<AnalysisResult> {
        let rendered = filter.apply(frame);
        let jpeg = rendered.encode_jpeg()?;
        let asset = MediaAsset::new("camera-capture.jpg", MediaKind::CameraFrame, jpeg);

        let request = self.request_counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.events.publish(DefakexEvent::AnalysisStarted {
            request,
            kind: MediaKind::CameraFrame,
        });

        let result = self.provider.analyze(&asset).await?;
        self.events.publish(DefakexEvent::AnalysisCompleted {
            request,
            is_real: result.is_real,
        });
        Ok(result)
    }

    /// Release the capture session unconditionally, clear any stored
    /// result, and return to `Stopped`. Safe from every state.
    pub fn stop(&self) {
        let was_active = {
            let mut inner = self.inner.lock();
            let had_session = inner.session.is_some();
            if let Some(mut session) = inner.session.take() {
                session.release();
            }
            inner.result = None;
            let was_active = had_session || inner.state != CameraState::Stopped;
            inner.state = CameraState::Stopped;
            was_active
        };
        if was_active {
            self.events
                .publish(DefakexEvent::CameraStatusChanged { live: false });
        }
    }
}
