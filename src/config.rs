use crate::theme::Theme;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefakexConfig {
    pub analysis: AnalysisConfig,
    pub upload: UploadConfig,
    pub camera: CameraConfig,
    pub chat: ChatConfig,
    pub theme: ThemeConfig,
    pub system: SystemConfig,
}

/// Which path layout the detection endpoint speaks.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStyle {
    /// Everything goes to `POST /predict-video/` regardless of media kind.
    Legacy,
    /// Per-kind routes under `POST /analyze/{image,video,camera}`.
    Modern,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalysisConfig {
    /// Base URL of the external detection service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Endpoint path layout (legacy or modern)
    #[serde(default = "default_endpoint_style")]
    pub endpoint_style: EndpointStyle,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Confidence assigned when the endpoint reports an authentic verdict
    /// without a score
    #[serde(default = "default_placeholder_confidence_real")]
    pub placeholder_confidence_real: f64,

    /// Confidence assigned when the endpoint reports a manipulated verdict
    /// without a score
    #[serde(default = "default_placeholder_confidence_fake")]
    pub placeholder_confidence_fake: f64,

    /// Answer camera captures with a simulated verdict instead of calling
    /// the detection service
    #[serde(default = "default_simulate_camera")]
    pub simulate_camera: bool,

    /// Artificial delay applied by the simulated provider, in milliseconds
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    /// Size ceiling for video uploads, in bytes
    #[serde(default = "default_max_video_bytes")]
    pub max_video_bytes: u64,

    /// Size ceiling for image uploads and camera frames, in bytes
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Requested capture resolution (width, height)
    #[serde(default = "default_camera_resolution")]
    pub resolution: (u32, u32),

    /// Requested frames per second
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatConfig {
    /// Delay before the assistant reply is appended, in milliseconds
    #[serde(default = "default_chat_delay_ms")]
    pub response_delay_ms: u64,

    /// Message the transcript is seeded with
    #[serde(default = "default_chat_greeting")]
    pub greeting: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ThemeConfig {
    /// Theme selected at startup
    #[serde(default = "default_theme")]
    pub initial: Theme,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

impl DefakexConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("defakex.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("analysis.base_url", default_base_url())?
            .set_default("analysis.endpoint_style", "legacy")?
            .set_default("analysis.timeout_seconds", default_timeout_seconds() as i64)?
            .set_default(
                "analysis.placeholder_confidence_real",
                default_placeholder_confidence_real(),
            )?
            .set_default(
                "analysis.placeholder_confidence_fake",
                default_placeholder_confidence_fake(),
            )?
            .set_default("analysis.simulate_camera", default_simulate_camera())?
            .set_default("analysis.simulated_delay_ms", default_simulated_delay_ms() as i64)?
            .set_default("upload.max_video_bytes", default_max_video_bytes() as i64)?
            .set_default("upload.max_image_bytes", default_max_image_bytes() as i64)?
            .set_default(
                "camera.resolution",
                vec![default_camera_resolution().0, default_camera_resolution().1],
            )?
            .set_default("camera.fps", default_camera_fps())?
            .set_default("chat.response_delay_ms", default_chat_delay_ms() as i64)?
            .set_default("chat.greeting", default_chat_greeting())?
            .set_default("theme.initial", "teal")?
            .set_default(
                "system.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables with DEFAKEX_ prefix
            .add_source(Environment::with_prefix("DEFAKEX").separator("_"))
            .build()?;

        let config: DefakexConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.base_url.is_empty() {
            return Err(ConfigError::Message(
                "Analysis base_url must not be empty".to_string(),
            ));
        }

        if !self.analysis.base_url.starts_with("http://")
            && !self.analysis.base_url.starts_with("https://")
        {
            return Err(ConfigError::Message(
                "Analysis base_url must be an http(s) URL".to_string(),
            ));
        }

        if self.analysis.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Analysis timeout_seconds must be greater than 0".to_string(),
            ));
        }

        for (name, value) in [
            (
                "placeholder_confidence_real",
                self.analysis.placeholder_confidence_real,
            ),
            (
                "placeholder_confidence_fake",
                self.analysis.placeholder_confidence_fake,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Message(format!(
                    "Analysis {} must lie in [0, 1]",
                    name
                )));
            }
        }

        if self.upload.max_video_bytes == 0 || self.upload.max_image_bytes == 0 {
            return Err(ConfigError::Message(
                "Upload size ceilings must be greater than 0".to_string(),
            ));
        }

        if self.camera.resolution.0 == 0 || self.camera.resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Camera resolution must be greater than 0".to_string(),
            ));
        }

        if self.camera.fps == 0 {
            return Err(ConfigError::Message(
                "Camera fps must be greater than 0".to_string(),
            ));
        }

        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for DefakexConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig {
                base_url: default_base_url(),
                endpoint_style: default_endpoint_style(),
                timeout_seconds: default_timeout_seconds(),
                placeholder_confidence_real: default_placeholder_confidence_real(),
                placeholder_confidence_fake: default_placeholder_confidence_fake(),
                simulate_camera: default_simulate_camera(),
                simulated_delay_ms: default_simulated_delay_ms(),
            },
            upload: UploadConfig {
                max_video_bytes: default_max_video_bytes(),
                max_image_bytes: default_max_image_bytes(),
            },
            camera: CameraConfig {
                resolution: default_camera_resolution(),
                fps: default_camera_fps(),
            },
            chat: ChatConfig {
                response_delay_ms: default_chat_delay_ms(),
                greeting: default_chat_greeting(),
            },
            theme: ThemeConfig {
                initial: default_theme(),
            },
            system: SystemConfig {
                event_bus_capacity: default_event_bus_capacity(),
            },
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_endpoint_style() -> EndpointStyle {
    EndpointStyle::Legacy
}
fn default_timeout_seconds() -> u64 {
    30
}
fn default_placeholder_confidence_real() -> f64 {
    0.7
}
fn default_placeholder_confidence_fake() -> f64 {
    0.8
}
fn default_simulate_camera() -> bool {
    true
}
fn default_simulated_delay_ms() -> u64 {
    2000
}

fn default_max_video_bytes() -> u64 {
    100 * 1024 * 1024
}
fn default_max_image_bytes() -> u64 {
    20 * 1024 * 1024
}

fn default_camera_resolution() -> (u32, u32) {
    (1280, 720)
}
fn default_camera_fps() -> u32 {
    30
}

fn default_chat_delay_ms() -> u64 {
    600
}
fn default_chat_greeting() -> String {
    "Hello! I'm your DeFakeX assistant. How can I help you today?".to_string()
}

fn default_theme() -> Theme {
    Theme::Teal
}

fn default_event_bus_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validates() {
        let config = DefakexConfig::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.analysis.base_url, "http://localhost:8000");
        assert_eq!(config.analysis.endpoint_style, EndpointStyle::Legacy);
        assert_eq!(config.upload.max_video_bytes, 100 * 1024 * 1024);
        assert_eq!(config.upload.max_image_bytes, 20 * 1024 * 1024);
        assert_eq!(config.chat.response_delay_ms, 600);
        assert_eq!(config.theme.initial, Theme::Teal);
    }

    #[test]
    fn test_placeholder_confidence_bounds() {
        let mut config = DefakexConfig::default();
        config.analysis.placeholder_confidence_fake = 1.5;
        assert!(config.validate().is_err());

        config.analysis.placeholder_confidence_fake = 0.8;
        config.analysis.placeholder_confidence_real = -0.1;
        assert!(config.validate().is_err());

        config.analysis.placeholder_confidence_real = 0.7;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_validation() {
        let mut config = DefakexConfig::default();
        config.analysis.base_url = String::new();
        assert!(config.validate().is_err());

        config.analysis.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.analysis.base_url = "https://detect.example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let mut config = DefakexConfig::default();
        config.upload.max_image_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[analysis]\nbase_url = \"http://127.0.0.1:9000\"\nendpoint_style = \"modern\"\nsimulate_camera = false\n\n[chat]\nresponse_delay_ms = 5"
        )
        .unwrap();

        let config = DefakexConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.analysis.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.analysis.endpoint_style, EndpointStyle::Modern);
        assert!(!config.analysis.simulate_camera);
        assert_eq!(config.chat.response_delay_ms, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.upload.max_video_bytes, 100 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = DefakexConfig::load_from_file("does-not-exist.toml").unwrap();
        assert_eq!(config.analysis.base_url, default_base_url());
        assert!(config.analysis.simulate_camera);
    }
}
