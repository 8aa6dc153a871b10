use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::LlmConfig;

/// A single chat message in the Ollama wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: GenerationOptions,
}

#[derive(Debug, Serialize)]
struct GenerationOptions {
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Client for a local Ollama-compatible chat-completion endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    url: String,
    model: String,
    system_prompt: String,
    num_predict: u32,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            num_predict: config.num_predict,
        }
    }

    /// Ask the model for a suggested answer to the transcript.
    pub async fn generate(&self, transcript: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: transcript.to_string(),
                },
            ],
            stream: false,
            options: GenerationOptions {
                num_predict: self.num_predict,
            },
        };

        info!("Requesting completion from {} ({})", self.url, self.model);

        let response: ChatResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Chat-completion request failed")?
            .error_for_status()
            .context("Chat-completion endpoint returned an error")?
            .json()
            .await
            .context("Failed to parse chat-completion response")?;

        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_matches_wire_format() {
        let request = ChatRequest {
            model: "phi3:mini".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "prompt".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "question".to_string(),
                },
            ],
            stream: false,
            options: GenerationOptions { num_predict: 150 },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "phi3:mini");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 150);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "question");
    }

    #[test]
    fn response_content_is_extracted() {
        let body = r#"{
            "model": "phi3:mini",
            "message": { "role": "assistant", "content": "1. Lead with impact." },
            "done": true
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message.content, "1. Lead with impact.");
    }
}
