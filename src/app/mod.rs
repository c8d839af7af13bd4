use crate::camera::{CameraDevice, CameraWidget, SyntheticCamera};
use crate::chatbot::Chatbot;
use crate::client::{AnalysisClient, AnalysisProvider, SimulatedAnalysis};
use crate::config::DefakexConfig;
use crate::error::Result;
use crate::events::EventBus;
use crate::theme::ThemeContext;
use crate::upload::UploadWidget;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application shell: wires the analysis client, the capture widgets,
/// the chatbot, and the theme context over one shared event bus. Owns
/// no business logic of its own.
pub struct DefakexApp {
    config: DefakexConfig,
    events: EventBus,
    pub upload: Arc<UploadWidget>,
    pub camera: Arc<CameraWidget>,
    pub chatbot: Arc<Chatbot>,
    pub theme: Arc<ThemeContext>,
}

impl DefakexApp {
    /// Build the shell with the synthetic camera device
    pub fn new(config: DefakexConfig) -> Result<Self> {
        Self::with_camera_device(config, Arc::new(SyntheticCamera::new()))
    }

    /// Build the shell around a specific camera device
    pub fn with_camera_device(
        config: DefakexConfig,
        device: Arc<dyn CameraDevice>,
    ) -> Result<Self> {
        config.validate()?;

        let events = EventBus::new(config.system.event_bus_capacity);

        let client: Arc<dyn AnalysisProvider> =
            Arc::new(AnalysisClient::new(config.analysis.clone(), events.clone())?);

        // Uploads always talk to the real endpoint; the camera path only
        // simulates when the configuration asks for it explicitly
        let camera_provider: Arc<dyn AnalysisProvider> = if config.analysis.simulate_camera {
            info!("Camera captures are answered by the simulated provider");
            Arc::new(SimulatedAnalysis::new(Duration::from_millis(
                config.analysis.simulated_delay_ms,
            )))
        } else {
            Arc::clone(&client)
        };

        let upload = Arc::new(UploadWidget::new(
            config.upload.clone(),
            Arc::clone(&client),
            events.clone(),
        ));
        let camera = Arc::new(CameraWidget::new(
            config.camera.clone(),
            device,
            camera_provider,
            events.clone(),
        ));
        let chatbot = Arc::new(Chatbot::new(config.chat.clone()));
        let theme = Arc::new(ThemeContext::new(config.theme.initial, events.clone()));

        Ok(Self {
            config,
            events,
            upload,
            camera,
            chatbot,
            theme,
        })
    }

    pub fn config(&self) -> &DefakexConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn instant_config() -> DefakexConfig {
        let mut config = DefakexConfig::default();
        config.analysis.simulated_delay_ms = 0;
        config.chat.response_delay_ms = 0;
        config
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = DefakexConfig::default();
        config.analysis.base_url = String::new();
        assert!(DefakexApp::new(config).is_err());
    }

    #[tokio::test]
    async fn test_simulated_camera_flow() {
        let app = DefakexApp::new(instant_config()).unwrap();

        app.camera.start().await.unwrap();
        let result = app.camera.capture_and_analyze().await.unwrap().unwrap();

        // Simulation-mode verdicts carry the simulated confidence range
        assert!((0.5..0.95).contains(&result.confidence));
        assert!(result.details.is_some());

        app.camera.stop();
        assert_eq!(app.camera.live_track_count(), 0);
    }

    #[tokio::test]
    async fn test_shell_seeds_theme_and_transcript() {
        let mut config = instant_config();
        config.theme.initial = Theme::Purple;

        let app = DefakexApp::new(config).unwrap();
        assert_eq!(app.theme.current(), Theme::Purple);

        let transcript = app.chatbot.transcript();
        assert_eq!(transcript.len(), 1);
        assert!(transcript[0].is_bot);
    }
}
