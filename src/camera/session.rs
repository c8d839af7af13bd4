use super::device::{CameraStream, RawFrame, StreamTrack};
use super::filter::FilterKind;
use crate::error::Result;
use tracing::debug;
use uuid::Uuid;

/// An open camera stream plus the selected cosmetic filter. At most one
/// session exists per widget; every track is released exactly once on
/// every exit path, including drop.
pub struct CaptureSession {
    id: Uuid,
    stream: CameraStream,
    filter: FilterKind,
    released: bool,
}

impl CaptureSession {
    pub fn new(stream: CameraStream) -> Self {
        let id = Uuid::new_v4();
        debug!(
            "Capture session {} opened with {} track(s)",
            id,
            stream.tracks().len()
        );
        Self {
            id,
            stream,
            filter: FilterKind::default(),
            released: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterKind) {
        self.filter = filter;
    }

    pub fn grab_frame(&self) -> Result<RawFrame> {
        self.stream.grab_frame()
    }

    pub fn live_track_count(&self) -> usize {
        self.stream.live_track_count()
    }

    /// Cloned track handles for external observation
    pub fn track_handles(&self) -> Vec<StreamTrack> {
        self.stream.tracks().to_vec()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Halt every stream track. Runs at most once; later calls are no-ops.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.stream.stop_all();
        self.released = true;
        debug!("Capture session {} released", self.id);
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}
