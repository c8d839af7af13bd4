pub mod app;
pub mod camera;
pub mod chatbot;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod media;
pub mod theme;
pub mod upload;

pub use app::DefakexApp;
pub use camera::{
    CameraDevice, CameraState, CameraStream, CameraWidget, CaptureSession, DeniedCamera,
    FilterKind, FrameSource, RawFrame, StreamTrack, SyntheticCamera,
};
pub use chatbot::{ChatMessage, Chatbot};
pub use client::{AnalysisClient, AnalysisProvider, SimulatedAnalysis, WireResponse};
pub use config::{DefakexConfig, EndpointStyle};
pub use error::{
    DefakexError, PermissionError, Result, SessionError, TransportError, ValidationError,
};
pub use events::{DefakexEvent, EventBus, EventFilter, EventReceiver, Severity};
pub use media::{AnalysisResult, MediaAsset, MediaKind, PreviewHandle};
pub use theme::{StyleTokens, Theme, ThemeContext};
pub use upload::{UploadState, UploadWidget};
