use crate::media::{AnalysisResult, MediaKind};
use serde::Deserialize;

/// The two response shapes observed from the detection endpoint. The
/// legacy shape carries only a prediction string; the structured shape
/// carries a real score. Both are resolved here so the rest of the
/// system only ever sees [`AnalysisResult`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireResponse {
    Structured {
        is_real: bool,
        confidence: f64,
        details: Option<String>,
    },
    Legacy {
        prediction: String,
    },
}

impl WireResponse {
    /// Normalize into an [`AnalysisResult`].
    ///
    /// The legacy shape has no score, so the configured placeholder
    /// confidences stand in: `placeholder_real` for an authentic verdict,
    /// `placeholder_fake` for a manipulated one. Structured confidences
    /// are clamped into `[0, 1]`.
    pub fn normalize(
        self,
        kind: MediaKind,
        placeholder_real: f64,
        placeholder_fake: f64,
    ) -> AnalysisResult {
        match self {
            WireResponse::Structured {
                is_real,
                confidence,
                details,
            } => AnalysisResult {
                is_real,
                confidence: confidence.clamp(0.0, 1.0),
                details,
            },
            WireResponse::Legacy { prediction } => {
                let is_real = prediction == "REAL";
                let prefix = match kind {
                    MediaKind::Image => "Analysis complete.",
                    MediaKind::Video => "Video analysis complete.",
                    MediaKind::CameraFrame => "Camera analysis complete.",
                };
                AnalysisResult {
                    is_real,
                    confidence: if is_real {
                        placeholder_real
                    } else {
                        placeholder_fake
                    },
                    details: Some(format!("{} Model prediction: {}", prefix, prediction)),
                }
            }
        }
    }
}
