use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleFormat, SupportedStreamConfig};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// A finished recording: raw f32 samples, interleaved per channel.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl RecordedAudio {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

/// An in-progress recording.
///
/// Owns the live cpal stream, so it must stay on the thread that created it
/// (the stream is not `Send`). The audio callback appends into a shared
/// buffer until the cap is reached; `stop()` drops the stream and takes
/// whatever was captured.
pub struct Recorder {
    stream: cpal::Stream,
    buffer: Arc<Mutex<Vec<f32>>>,
    sample_rate: u32,
    channels: u16,
    max_samples: usize,
    started: Instant,
    max_duration: Duration,
}

impl Recorder {
    /// Start capturing from `device` with the given stream config.
    ///
    /// Samples are converted to f32 regardless of the device's native
    /// format. Once `max_duration` worth of samples has accumulated the
    /// callback stops appending; the stream itself keeps running until
    /// `stop()` so the device is released in one place.
    pub fn start(
        device: &Device,
        config: SupportedStreamConfig,
        max_duration: Duration,
    ) -> Result<Self> {
        let sample_rate = config.sample_rate().0;
        let channels = config.channels();
        let sample_format = config.sample_format();
        let stream_config: cpal::StreamConfig = config.into();

        let max_samples =
            max_duration.as_secs() as usize * sample_rate as usize * channels as usize;
        let buffer = Arc::new(Mutex::new(Vec::with_capacity(max_samples.min(1 << 24))));

        let err_fn = |err| warn!("Audio stream error: {}", err);

        let stream = match sample_format {
            SampleFormat::F32 => {
                let buffer = Arc::clone(&buffer);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        append_capped(&buffer, data.iter().copied(), max_samples);
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::I16 => {
                let buffer = Arc::clone(&buffer);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let converted = data.iter().map(|&s| s as f32 / i16::MAX as f32);
                        append_capped(&buffer, converted, max_samples);
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::U16 => {
                let buffer = Arc::clone(&buffer);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[u16], _: &cpal::InputCallbackInfo| {
                        let converted = data
                            .iter()
                            .map(|&s| (s as f32 - 32768.0) / 32768.0);
                        append_capped(&buffer, converted, max_samples);
                    },
                    err_fn,
                    None,
                )
            }
            other => anyhow::bail!("Unsupported audio sample format: {:?}", other),
        }
        .context("Failed to build input stream")?;

        stream.play().context("Failed to start input stream")?;

        info!(
            "Recording started: {}Hz, {} channels, cap {}s",
            sample_rate,
            channels,
            max_duration.as_secs()
        );

        Ok(Self {
            stream,
            buffer,
            sample_rate,
            channels,
            max_samples,
            started: Instant::now(),
            max_duration,
        })
    }

    /// Stop capturing and take the recorded samples.
    pub fn stop(self) -> RecordedAudio {
        drop(self.stream);

        let samples = {
            let mut buf = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *buf)
        };

        info!(
            "Recording stopped: {} samples ({:.1}s)",
            samples.len(),
            samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
        );

        RecordedAudio {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Time since the recording started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the buffer has hit its cap (or the wall clock has passed it).
    pub fn at_capacity(&self) -> bool {
        if self.started.elapsed() >= self.max_duration {
            return true;
        }
        self.buffer
            .lock()
            .map(|buf| buf.len() >= self.max_samples)
            .unwrap_or(true)
    }
}

/// Append samples to the shared buffer, never growing past `max_samples`.
/// Runs on the audio callback thread.
fn append_capped(
    buffer: &Arc<Mutex<Vec<f32>>>,
    samples: impl Iterator<Item = f32>,
    max_samples: usize,
) {
    if let Ok(mut buf) = buffer.lock() {
        let remaining = max_samples.saturating_sub(buf.len());
        if remaining > 0 {
            buf.extend(samples.take(remaining));
        }
    }
}
