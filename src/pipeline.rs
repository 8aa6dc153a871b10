use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::llm::OllamaClient;
use crate::stt::SpeechClient;

/// Result of one transcribe-then-generate run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub transcript: String,
    pub answer: String,
}

/// The transcribe-then-generate pipeline.
///
/// Sequential by design: the transcript feeds the completion. Recognition
/// sentinels ("Could not understand audio.", "Google API error.") are still
/// sent to the model so the user always gets both halves of the display.
pub struct Pipeline {
    stt: SpeechClient,
    llm: OllamaClient,
    wav_path: PathBuf,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            stt: SpeechClient::new(&config.stt),
            llm: OllamaClient::new(&config.llm),
            wav_path: PathBuf::from(&config.audio.output_path),
        }
    }

    pub async fn run(&self) -> Result<PipelineOutput> {
        let transcript = self.stt.transcribe(&self.wav_path).await?;
        info!("Transcript: {}", transcript);

        let answer = self.llm.generate(&transcript).await?;
        info!("Generated answer ({} chars)", answer.len());

        Ok(PipelineOutput { transcript, answer })
    }

    /// Run the pipeline on `runtime`, delivering the result over `tx`.
    ///
    /// The UI polls the channel's receiver each frame, so its thread never
    /// blocks on the network calls. Fire-and-forget: no cancellation.
    pub fn spawn(
        self: Arc<Self>,
        runtime: &tokio::runtime::Handle,
        tx: mpsc::Sender<Result<PipelineOutput>>,
    ) {
        runtime.spawn(async move {
            let result = self.run().await;
            if let Err(e) = &result {
                error!("Pipeline failed: {:#}", e);
            }
            // The UI may have shut down; nothing to do if the send fails.
            let _ = tx.send(result);
        });
    }
}
