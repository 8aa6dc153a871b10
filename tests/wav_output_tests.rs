// Integration tests for the WAV artifact lifecycle.
//
// The WAV file is the app's only persisted state: mono, 16-bit, normalized,
// and overwritten on every recording.

use anyhow::Result;
use hound::WavReader;
use interview_copilot::audio::{write_wav, RecordedAudio};
use tempfile::TempDir;

/// A short sine-ish recording with a known peak.
fn test_recording(seconds: f64, sample_rate: u32, channels: u16, peak: f32) -> RecordedAudio {
    let frames = (seconds * sample_rate as f64) as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);

    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let value = peak * (2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32;
        for _ in 0..channels {
            samples.push(value);
        }
    }

    RecordedAudio {
        samples,
        sample_rate,
        channels,
    }
}

#[test]
fn wav_exists_and_is_nonempty_after_write() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("answer.wav");

    let audio = test_recording(0.5, 44100, 2, 0.3);
    write_wav(&path, &audio)?;

    let metadata = std::fs::metadata(&path)?;
    assert!(metadata.len() > 44, "WAV should be larger than its header");

    Ok(())
}

#[test]
fn wav_is_mono_16bit_at_source_rate() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("answer.wav");

    let audio = test_recording(0.25, 48000, 2, 0.5);
    write_wav(&path, &audio)?;

    let reader = WavReader::open(&path)?;
    let spec = reader.spec();

    assert_eq!(spec.channels, 1, "Output should be downmixed to mono");
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(spec.sample_rate, 48000, "Source rate should be preserved");

    // Stereo frames collapse 2:1.
    assert_eq!(reader.len() as usize, audio.samples.len() / 2);

    Ok(())
}

#[test]
fn wav_is_overwritten_by_next_recording() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("answer.wav");

    write_wav(&path, &test_recording(1.0, 44100, 1, 0.4))?;
    let first_len = WavReader::open(&path)?.len();

    write_wav(&path, &test_recording(0.1, 44100, 1, 0.4))?;
    let second_len = WavReader::open(&path)?.len();

    assert!(
        second_len < first_len,
        "Second (shorter) recording should fully replace the first"
    );

    Ok(())
}

#[test]
fn normalization_scales_to_full_range() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("answer.wav");

    // Quiet input: peak well below full scale.
    write_wav(&path, &test_recording(0.1, 44100, 1, 0.05))?;

    let reader = WavReader::open(&path)?;
    let peak = reader
        .into_samples::<i16>()
        .map(|s| s.map(|v| (v as i32).abs()))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .max()
        .unwrap_or(0);

    assert!(
        peak >= 32700,
        "Peak should be scaled near full 16-bit range, got {}",
        peak
    );

    Ok(())
}

#[test]
fn silent_recording_writes_silence() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("answer.wav");

    let audio = RecordedAudio {
        samples: vec![0.0; 4410],
        sample_rate: 44100,
        channels: 1,
    };
    write_wav(&path, &audio)?;

    let reader = WavReader::open(&path)?;
    for sample in reader.into_samples::<i16>() {
        assert_eq!(sample?, 0);
    }

    Ok(())
}
