mod http;
mod response;
mod simulated;

pub use http::AnalysisClient;
pub use response::WireResponse;
pub use simulated::SimulatedAnalysis;

use crate::error::Result;
use crate::media::{AnalysisResult, MediaAsset};
use async_trait::async_trait;

/// Seam between the capture widgets and whatever produces verdicts: the
/// HTTP client, the camera simulation, or a test stub.
///
/// Contract: resolve to a normalized [`AnalysisResult`] or fail with a
/// transport-class error, raising exactly one user-facing notification on
/// failure before propagating it. No retries.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, asset: &MediaAsset) -> Result<AnalysisResult>;
}
