// Cloud speech recognition against the Google speech-api v2 endpoint.
//
// The endpoint takes raw PCM (`audio/l16`) and answers with one JSON object
// per line; lines with an empty `result` array are keep-alives and the real
// hypothesis arrives in a later line.

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use tracing::{info, warn};

use crate::config::SttConfig;

/// Returned when the recognizer produced no hypothesis for the audio.
pub const NO_SPEECH: &str = "Could not understand audio.";

/// Returned when the recognition service could not be reached or errored.
pub const API_ERROR: &str = "Google API error.";

/// Client for the cloud speech-recognition endpoint.
pub struct SpeechClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    language: String,
}

impl SpeechClient {
    pub fn new(config: &SttConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    /// Transcribe a 16-bit PCM WAV file.
    ///
    /// Recognition failures come back as the sentinel strings (`NO_SPEECH`,
    /// `API_ERROR`) so the pipeline can still show something to the user;
    /// only local problems (unreadable file, missing API key) are `Err`.
    pub async fn transcribe(&self, wav_path: &Path) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .context("Speech API key not configured (stt.api_key)")?;

        let (pcm, sample_rate) = read_wav_pcm(wav_path)?;

        let url = format!(
            "{}?client=chromium&lang={}&key={}",
            self.endpoint, self.language, api_key
        );

        info!(
            "Transcribing {} ({} bytes, {}Hz)",
            wav_path.display(),
            pcm.len(),
            sample_rate
        );

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, format!("audio/l16; rate={}", sample_rate))
            .body(pcm)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let body = match response {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read speech API response: {}", e);
                    return Ok(API_ERROR.to_string());
                }
            },
            Err(e) => {
                warn!("Speech API request failed: {}", e);
                return Ok(API_ERROR.to_string());
            }
        };

        Ok(parse_recognize_response(&body))
    }
}

/// Read our WAV artifact back as little-endian PCM bytes plus sample rate.
fn read_wav_pcm(path: &Path) -> Result<(Vec<u8>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read audio samples")?;

    let pcm = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

    Ok((pcm, spec.sample_rate))
}

/// Extract the best transcript from the line-delimited response body.
fn parse_recognize_response(body: &str) -> String {
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparseable speech API line: {}", e);
                continue;
            }
        };

        let transcript = value
            .get("result")
            .and_then(|r| r.as_array())
            .and_then(|results| results.first())
            .and_then(|first| first.get("alternative"))
            .and_then(|a| a.as_array())
            .and_then(|alts| alts.first())
            .and_then(|alt| alt.get("transcript"))
            .and_then(|t| t.as_str());

        if let Some(transcript) = transcript {
            return transcript.to_string();
        }
    }

    NO_SPEECH.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transcript_after_keepalive_line() {
        let body = concat!(
            "{\"result\":[]}\n",
            "{\"result\":[{\"alternative\":[{\"transcript\":\"tell me about yourself\",",
            "\"confidence\":0.92}],\"final\":true}],\"result_index\":0}\n",
        );
        assert_eq!(parse_recognize_response(body), "tell me about yourself");
    }

    #[test]
    fn takes_first_alternative() {
        let body = "{\"result\":[{\"alternative\":[\
                     {\"transcript\":\"first\"},{\"transcript\":\"second\"}]}]}";
        assert_eq!(parse_recognize_response(body), "first");
    }

    #[test]
    fn empty_results_map_to_no_speech() {
        assert_eq!(parse_recognize_response("{\"result\":[]}\n"), NO_SPEECH);
        assert_eq!(parse_recognize_response(""), NO_SPEECH);
    }

    #[test]
    fn garbage_lines_are_skipped() {
        let body = "not json\n{\"result\":[{\"alternative\":[{\"transcript\":\"ok\"}]}]}";
        assert_eq!(parse_recognize_response(body), "ok");
    }
}
