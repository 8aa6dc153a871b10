pub mod audio;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod stt;
pub mod ui;

pub use audio::{RecordedAudio, Recorder};
pub use config::Config;
pub use llm::OllamaClient;
pub use pipeline::{Pipeline, PipelineOutput};
pub use stt::{SpeechClient, API_ERROR, NO_SPEECH};
pub use ui::CopilotApp;
