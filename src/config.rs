use anyhow::{Context, Result};
use serde::Deserialize;

/// Application configuration.
///
/// Every field has a default so the app runs with no config file at all;
/// a TOML file and `COPILOT_*` environment variables can override any of it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub stt: SttConfig,
    pub llm: LlmConfig,
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            stt: SttConfig::default(),
            llm: LlmConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Preferred capture sample rate (Hz)
    pub sample_rate: u32,
    /// Recording cap in seconds; capture stops accumulating past this
    pub max_duration_secs: u64,
    /// Case-insensitive substring used to pick the loopback input device
    pub device_hint: String,
    /// Output WAV path, overwritten on every recording
    pub output_path: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            max_duration_secs: 60,
            device_hint: "monitor".to_string(),
            output_path: "answer.wav".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Speech recognition endpoint (Google speech-api v2 wire format)
    pub endpoint: String,
    /// API key; recognition is refused without one
    pub api_key: Option<String>,
    /// BCP-47 language tag passed to the recognizer
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://www.google.com/speech-api/v2/recognize".to_string(),
            api_key: None,
            language: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat-completion endpoint (Ollama wire format)
    pub url: String,
    pub model: String,
    pub system_prompt: String,
    /// Generation length cap (tokens)
    pub num_predict: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434/api/chat".to_string(),
            model: "phi3:mini".to_string(),
            system_prompt: "You are an interview copilot. Give concise, point-wise answers in simple English."
                .to_string(),
            num_predict: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 480.0,
            window_height: 700.0,
        }
    }
}

impl Config {
    /// Load configuration, layering an optional TOML file and environment
    /// variables (`COPILOT_LLM__MODEL=...`) over the defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("COPILOT").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        Ok(settings.try_deserialize()?)
    }
}
