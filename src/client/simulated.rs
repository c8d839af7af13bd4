use super::AnalysisProvider;
use crate::error::Result;
use crate::media::{AnalysisResult, MediaAsset};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

const REAL_DETAILS: &str =
    "Live analysis shows natural facial expressions and consistent lighting patterns.";
const FAKE_DETAILS: &str =
    "Analysis detected potential manipulation in facial expressions and unnatural eye movements.";

/// Simulation-mode provider for the camera path: a randomized verdict
/// with no backend call. Only ever wired in when the configuration asks
/// for it explicitly, never mixed with real inference results.
pub struct SimulatedAnalysis {
    delay: Duration,
}

impl SimulatedAnalysis {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl AnalysisProvider for SimulatedAnalysis {
    async fn analyze(&self, asset: &MediaAsset) -> Result<AnalysisResult> {
        debug!(
            "Simulating analysis of {} ({} bytes)",
            asset.kind,
            asset.size_bytes()
        );
        tokio::time::sleep(self.delay).await;

        let (is_real, confidence) = {
            let mut rng = rand::thread_rng();
            (rng.gen_bool(0.5), rng.gen_range(0.5..0.95))
        };

        Ok(AnalysisResult {
            is_real,
            confidence,
            details: Some(
                if is_real { REAL_DETAILS } else { FAKE_DETAILS }.to_string(),
            ),
        })
    }
}
