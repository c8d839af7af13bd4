use crate::config::CameraConfig;
use crate::error::{DefakexError, PermissionError, Result, SessionError};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// A single track of an open camera stream. Handles are cheap clones
/// sharing one liveness flag, so a holder can observe a track after the
/// owning widget is gone.
#[derive(Debug, Clone)]
pub struct StreamTrack {
    id: Uuid,
    label: String,
    live: Arc<AtomicBool>,
}

impl StreamTrack {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Halt the track. Idempotent.
    pub fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            debug!("Stream track '{}' ({}) stopped", self.label, self.id);
        }
    }
}

/// Uncompressed RGB frame grabbed from a live stream
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// RGB8 pixel data, `width * height * 3` bytes
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Encode the frame as JPEG for transmission
    pub fn encode_jpeg(&self) -> Result<Vec<u8>> {
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| DefakexError::system("Frame buffer does not match its dimensions"))?;
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, 85);
        encoder
            .encode_image(&img)
            .map_err(|e| DefakexError::system(format!("JPEG encoding failed: {}", e)))?;
        Ok(buf)
    }
}

/// Source of current frames for an open stream
pub trait FrameSource: Send + Sync {
    fn grab(&self) -> Result<RawFrame>;
}

/// An open camera stream: its tracks plus a frame source
pub struct CameraStream {
    tracks: Vec<StreamTrack>,
    source: Box<dyn FrameSource>,
}

impl CameraStream {
    pub fn new(tracks: Vec<StreamTrack>, source: Box<dyn FrameSource>) -> Self {
        Self { tracks, source }
    }

    pub fn tracks(&self) -> &[StreamTrack] {
        &self.tracks
    }

    pub fn live_track_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    /// Grab the current frame. Fails once the tracks have been halted.
    pub fn grab_frame(&self) -> Result<RawFrame> {
        if self.live_track_count() == 0 {
            return Err(SessionError::NotLive.into());
        }
        self.source.grab()
    }

    /// Halt every track
    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

/// Camera acquisition seam. The product's real camera lives behind a
/// browser permission prompt; implementations model the grant/deny
/// outcome of that request.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request camera access and open a stream honoring the constraints
    async fn open(
        &self,
        constraints: &CameraConfig,
    ) -> std::result::Result<CameraStream, PermissionError>;
}

/// Camera producing generated gradient frames, used wherever no real
/// capture pipeline is attached (demos, tests).
#[derive(Debug, Default)]
pub struct SyntheticCamera;

impl SyntheticCamera {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CameraDevice for SyntheticCamera {
    async fn open(
        &self,
        constraints: &CameraConfig,
    ) -> std::result::Result<CameraStream, PermissionError> {
        let (width, height) = constraints.resolution;
        info!(
            "Opening synthetic camera stream ({}x{} @ {}fps)",
            width, height, constraints.fps
        );

        let track = StreamTrack::new("synthetic-video-0");
        let source = SyntheticSource {
            width,
            height,
            frame_counter: AtomicU64::new(0),
        };
        Ok(CameraStream::new(vec![track], Box::new(source)))
    }
}

struct SyntheticSource {
    width: u32,
    height: u32,
    frame_counter: AtomicU64,
}

impl FrameSource for SyntheticSource {
    fn grab(&self) -> Result<RawFrame> {
        let frame_id = self.frame_counter.fetch_add(1, Ordering::Relaxed);
        let shift = (frame_id % 256) as u8;

        // Moving diagonal gradient so consecutive grabs differ
        let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                data.push(((x as u64 + frame_id) % 256) as u8);
                data.push(((y as u64 + frame_id) % 256) as u8);
                data.push(((x + y) % 256) as u8 ^ shift);
            }
        }

        Ok(RawFrame {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// Device that refuses access, modeling a dismissed permission prompt
#[derive(Debug, Default)]
pub struct DeniedCamera;

impl DeniedCamera {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CameraDevice for DeniedCamera {
    async fn open(
        &self,
        _constraints: &CameraConfig,
    ) -> std::result::Result<CameraStream, PermissionError> {
        Err(PermissionError::CameraDenied {
            details: "permission request dismissed".to_string(),
        })
    }
}
