use anyhow::{Context, Result};
use eframe::egui;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::audio::{find_monitor_device, select_input_config, Recorder};
use crate::config::Config;
use crate::pipeline::{Pipeline, PipelineOutput};

/// Where the app is in the record → save → generate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing recorded yet (or the last recording failed)
    Idle,
    /// Capture stream is live
    Recording,
    /// A WAV is on disk and ready for the pipeline
    Saved,
    /// Pipeline task is in flight
    Generating,
}

/// The desktop app: one scrollable output label and three buttons.
///
/// Lives on the main thread; the cpal stream inside `Recorder` is not `Send`,
/// so all recording control happens here and only the pipeline result
/// crosses threads (over the mpsc channel).
pub struct CopilotApp {
    config: Config,
    runtime: tokio::runtime::Handle,
    pipeline: Arc<Pipeline>,
    recorder: Option<Recorder>,
    phase: Phase,
    display: String,
    pending: Option<mpsc::Receiver<Result<PipelineOutput>>>,
}

impl CopilotApp {
    pub fn new(config: Config, runtime: tokio::runtime::Handle) -> Self {
        let pipeline = Arc::new(Pipeline::new(&config));

        Self {
            config,
            runtime,
            pipeline,
            recorder: None,
            phase: Phase::Idle,
            display: "Press Start to record speaker audio.".to_string(),
            pending: None,
        }
    }

    fn start_recording(&mut self) {
        match self.try_start_recording() {
            Ok(recorder) => {
                self.recorder = Some(recorder);
                self.phase = Phase::Recording;
                self.display = "Recording speaker audio...".to_string();
            }
            Err(e) => {
                error!("Failed to start recording: {:#}", e);
                self.phase = Phase::Idle;
                self.display = format!("Error:\n{:#}", e);
            }
        }
    }

    fn try_start_recording(&self) -> Result<Recorder> {
        let audio = &self.config.audio;
        let host = cpal::default_host();

        let device = find_monitor_device(&host, &audio.device_hint)?;
        let stream_config = select_input_config(&device, audio.sample_rate)?;

        Recorder::start(
            &device,
            stream_config,
            Duration::from_secs(audio.max_duration_secs),
        )
        .context("Failed to start capture")
    }

    fn stop_recording(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };

        let audio = recorder.stop();
        if audio.samples.is_empty() {
            self.phase = Phase::Idle;
            self.display = "Error:\nNothing was captured.".to_string();
            return;
        }

        match crate::audio::write_wav(&self.config.audio.output_path, &audio) {
            Ok(()) => {
                self.phase = Phase::Saved;
                self.display = format!(
                    "Speaker recording saved ({:.1}s).\nClick Generate.",
                    audio.duration_seconds()
                );
            }
            Err(e) => {
                error!("Failed to save recording: {:#}", e);
                self.phase = Phase::Idle;
                self.display = format!("Error:\n{:#}", e);
            }
        }
    }

    fn generate(&mut self) {
        info!("Starting transcribe-then-generate pipeline");
        self.phase = Phase::Generating;
        self.display = "Processing...".to_string();

        let (tx, rx) = mpsc::channel();
        Arc::clone(&self.pipeline).spawn(&self.runtime, tx);
        self.pending = Some(rx);
    }

    fn poll_pipeline(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(output)) => {
                self.display = format!(
                    "Interviewer said:\n{}\n\nSuggested answer:\n{}",
                    output.transcript, output.answer
                );
                self.phase = Phase::Saved;
                self.pending = None;
            }
            Ok(Err(e)) => {
                self.display = format!("Error:\n{:#}", e);
                self.phase = Phase::Saved;
                self.pending = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.display = "Error:\nPipeline task was dropped.".to_string();
                self.phase = Phase::Saved;
                self.pending = None;
            }
        }
    }
}

impl eframe::App for CopilotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.phase == Phase::Generating {
            self.poll_pipeline();
        }

        // The 60s cap acts as the Stop button when nobody presses it.
        if self.phase == Phase::Recording {
            let status = self
                .recorder
                .as_ref()
                .map(|r| (r.at_capacity(), r.elapsed()));
            if let Some((at_capacity, elapsed)) = status {
                if at_capacity {
                    info!("Recording cap reached, stopping");
                    self.stop_recording();
                } else {
                    self.display = format!(
                        "Recording speaker audio... {:.0}s / {}s",
                        elapsed.as_secs_f64(),
                        self.config.audio.max_duration_secs
                    );
                }
            }
        }

        egui::TopBottomPanel::bottom("controls")
            .min_height(56.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.columns(3, |columns| {
                    let can_start = self.phase != Phase::Recording;
                    let can_generate = self.phase == Phase::Saved;
                    let can_stop = self.phase == Phase::Recording;

                    if columns[0]
                        .add_enabled(can_start, egui::Button::new("Start"))
                        .clicked()
                    {
                        self.start_recording();
                    }

                    if columns[1]
                        .add_enabled(can_generate, egui::Button::new("Generate"))
                        .clicked()
                    {
                        self.generate();
                    }

                    if columns[2]
                        .add_enabled(can_stop, egui::Button::new("Stop"))
                        .clicked()
                    {
                        self.stop_recording();
                    }
                });
                ui.add_space(8.0);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add(egui::Label::new(self.display.clone()).wrap());
                });
        });

        // Keep the timer and spinner text fresh without user input.
        if matches!(self.phase, Phase::Recording | Phase::Generating) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
