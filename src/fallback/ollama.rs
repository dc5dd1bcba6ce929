use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fallback::LanguageModel;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "qwen2.5:1.5b";

/// Ollama `/api/generate` backend, asked for JSON output.
pub struct OllamaBackend {
    pub endpoint: String,
    pub model: String,
    client: reqwest::blocking::Client,
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'static str,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaBackend {
    pub fn new(endpoint: &str, model: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            client,
        }
    }
}

impl LanguageModel for OllamaBackend {
    fn complete(&self, prompt: &str) -> Option<String> {
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "querying language model");

        let response = match self.client.post(&self.endpoint).json(&request).send() {
            Ok(r) => r,
            Err(e) => {
                warn!("language model request failed: {}", e);
                return None;
            }
        };

        match response.json::<OllamaResponse>() {
            Ok(body) => Some(body.response),
            Err(e) => {
                warn!("language model returned an unreadable body: {}", e);
                None
            }
        }
    }
}
