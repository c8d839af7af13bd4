use crate::error::{Result, ValidationError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Media kinds the analysis contract distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    Image,
    Video,
    CameraFrame,
}

impl MediaKind {
    /// Path segment used by the modern endpoint layout
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::CameraFrame => "camera",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::CameraFrame => "camera frame",
        };
        f.write_str(name)
    }
}

/// A transient reference to a user-provided file or captured frame.
/// The payload is shared so clones handed to an in-flight request stay
/// cheap.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub name: String,
    pub kind: MediaKind,
    data: Arc<Vec<u8>>,
}

impl MediaAsset {
    pub fn new<S: Into<String>>(name: S, kind: MediaKind, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind,
            data: Arc::new(data),
        }
    }

    /// Read an asset from disk (binary entry point)
    pub async fn from_path<P: AsRef<Path>>(path: P, kind: MediaKind) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, kind, data))
    }

    /// Decode a captured camera frame from a base64 data URL
    /// (`data:image/jpeg;base64,...`) into binary form.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let (meta, payload) = url
            .split_once(',')
            .ok_or(ValidationError::MalformedDataUrl)?;
        if !meta.ends_with(";base64") {
            return Err(ValidationError::MalformedDataUrl.into());
        }
        let data = BASE64
            .decode(payload.trim())
            .map_err(|_| ValidationError::MalformedDataUrl)?;
        Ok(Self::new(
            "camera-capture.jpg",
            MediaKind::CameraFrame,
            data,
        ))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    /// MIME type guessed from the file name, falling back to a kind-level
    /// default for extension-less captures
    pub fn mime(&self) -> String {
        mime_guess::from_path(&self.name)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| {
                match self.kind {
                    MediaKind::Video => "video/mp4",
                    MediaKind::Image | MediaKind::CameraFrame => "image/jpeg",
                }
                .to_string()
            })
    }
}

/// Local preview reference for a selected asset. Revoked when the asset
/// is replaced or the owning widget is torn down.
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    revoked: bool,
}

impl PreviewHandle {
    pub fn for_asset(asset: &MediaAsset) -> Self {
        Self {
            url: format!("preview://{}/{}", Uuid::new_v4(), asset.name),
            revoked: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Release the preview reference. Idempotent.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

/// Normalized verdict produced by the analysis boundary. Immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub is_real: bool,
    pub confidence: f64,
    pub details: Option<String>,
}

impl AnalysisResult {
    /// Verdict string as rendered by the result display
    pub fn verdict(&self) -> &'static str {
        if self.is_real {
            "AUTHENTIC"
        } else {
            "MANIPULATED"
        }
    }

    /// Confidence as a rounded percentage for display
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}
