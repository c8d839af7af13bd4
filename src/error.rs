use crate::media::MediaKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DefakexError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("System error: {message}")]
    System { message: String },
}

impl DefakexError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }
}

/// Local input validation failures. Handled before any request leaves the
/// process; never corrupts widget state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge {
        kind: MediaKind,
        size: u64,
        limit: u64,
    },

    #[error("No file selected")]
    NoFileSelected,

    #[error("Malformed base64 data URL")]
    MalformedDataUrl,
}

/// Failures talking to the external detection endpoint. Notified once,
/// never retried automatically.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {details}")]
    Connect { details: String },

    #[error("API error: {status}")]
    Status { status: u16 },

    #[error("Malformed response body: {details}")]
    MalformedBody { details: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Camera access was refused by the device layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("Camera access denied: {details}")]
    CameraDenied { details: String },
}

/// Capture-session lifecycle violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A capture session is already open")]
    AlreadyOpen,

    #[error("Camera is not live")]
    NotLive,
}

pub type Result<T> = std::result::Result<T, DefakexError>;
