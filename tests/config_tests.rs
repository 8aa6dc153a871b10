// Integration tests for configuration loading.

use anyhow::Result;
use interview_copilot::Config;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn defaults_apply_without_a_file() -> Result<()> {
    let config = Config::load(None)?;

    assert_eq!(config.audio.sample_rate, 44100);
    assert_eq!(config.audio.max_duration_secs, 60);
    assert_eq!(config.audio.device_hint, "monitor");
    assert_eq!(config.audio.output_path, "answer.wav");
    assert_eq!(config.stt.language, "en-US");
    assert!(config.stt.api_key.is_none());
    assert_eq!(config.llm.url, "http://localhost:11434/api/chat");
    assert_eq!(config.llm.model, "phi3:mini");
    assert_eq!(config.llm.num_predict, 150);

    Ok(())
}

#[test]
fn missing_file_is_not_an_error() -> Result<()> {
    let config = Config::load(Some("/nonexistent/copilot-config"))?;
    assert_eq!(config.audio.device_hint, "monitor");
    Ok(())
}

#[test]
fn toml_file_overrides_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("copilot.toml");

    let mut file = std::fs::File::create(&path)?;
    writeln!(
        file,
        r#"
[audio]
max_duration_secs = 30
device_hint = "loopback"

[llm]
model = "llama3"

[stt]
api_key = "test-key"
"#
    )?;

    let config = Config::load(path.to_str())?;

    assert_eq!(config.audio.max_duration_secs, 30);
    assert_eq!(config.audio.device_hint, "loopback");
    assert_eq!(config.llm.model, "llama3");
    assert_eq!(config.stt.api_key.as_deref(), Some("test-key"));

    // Untouched sections keep their defaults.
    assert_eq!(config.audio.sample_rate, 44100);
    assert_eq!(config.llm.num_predict, 150);

    Ok(())
}
