use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::capture::RecordedAudio;

/// Downmix interleaved samples to mono by averaging each frame.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Scale float samples to the full 16-bit range by the peak absolute value.
///
/// A silent buffer (zero peak) is cast directly instead of dividing by zero;
/// a non-finite peak (NaN/inf leaked in by a driver) gets the same treatment.
pub fn normalize_to_i16(samples: &[f32]) -> Vec<i16> {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));

    if peak > 0.0 && peak.is_finite() {
        let scale = 32767.0 / peak;
        samples
            .iter()
            .map(|&s| ((s * scale).clamp(-32768.0, 32767.0)) as i16)
            .collect()
    } else {
        samples.iter().map(|&s| s as i16).collect()
    }
}

/// Write a recording to `path` as a mono 16-bit PCM WAV, normalized to peak.
///
/// `WavWriter::create` truncates, so the file always holds the most recent
/// recording.
pub fn write_wav(path: impl AsRef<Path>, audio: &RecordedAudio) -> Result<()> {
    let path = path.as_ref();

    let mono = downmix_to_mono(&audio.samples, audio.channels);
    let pcm = normalize_to_i16(&mono);

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for sample in &pcm {
        writer
            .write_sample(*sample)
            .context("Failed to write sample to WAV")?;
    }

    writer.finalize().context("Failed to finalize WAV file")?;

    info!(
        "Saved recording: {} ({} samples, {}Hz mono)",
        path.display(),
        pcm.len(),
        audio.sample_rate
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_stereo_frames() {
        let samples = vec![0.5, -0.5, 1.0, 0.0, -0.2, -0.4];
        let mono = downmix_to_mono(&samples, 2);
        assert_eq!(mono.len(), 3);
        assert!((mono[0] - 0.0).abs() < 1e-6);
        assert!((mono[1] - 0.5).abs() < 1e-6);
        assert!((mono[2] - (-0.3)).abs() < 1e-6);
    }

    #[test]
    fn downmix_passes_mono_through() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn normalize_scales_peak_to_full_range() {
        let samples = vec![0.0, 0.25, -0.5];
        let pcm = normalize_to_i16(&samples);
        assert_eq!(pcm[0], 0);
        // Peak 0.5 maps to the full 16-bit range.
        assert_eq!(pcm[2], -32767);
        assert!((pcm[1] as i32 - 16383).abs() <= 1);
    }

    #[test]
    fn normalize_guards_zero_peak() {
        let samples = vec![0.0; 8];
        let pcm = normalize_to_i16(&samples);
        assert!(pcm.iter().all(|&s| s == 0));
    }

    #[test]
    fn normalize_guards_non_finite_peak() {
        let samples = vec![0.0, f32::NAN, 0.0];
        let pcm = normalize_to_i16(&samples);
        assert_eq!(pcm.len(), 3);
    }
}
