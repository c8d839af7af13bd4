mod device;
mod filter;
mod session;
mod widget;

pub use device::{CameraDevice, CameraStream, DeniedCamera, FrameSource, RawFrame, StreamTrack, SyntheticCamera};
pub use filter::FilterKind;
pub use session::CaptureSession;
pub use widget::{CameraState, CameraWidget};
