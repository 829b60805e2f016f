//! Local generative backend (self-hosted inference endpoint)
//!
//! Same prompt-and-classify pattern as the remote backend, but against a
//! local `/api/generate` endpoint with no structured-output contract: the
//! model answers in free text and the normalizer's label coercion does
//! the rest. Local inference gets a shorter latency budget than the
//! hosted path.

use crate::backend::Backend;
use async_trait::async_trait;
use medroute_core::{Error, RawResponse, Result, DEFAULT_LABELS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configuration for the local generative backend
#[derive(Debug, Clone)]
pub struct LocalConfig {
    /// Local inference endpoint base URL
    pub base_url: String,

    /// Model identifier (as known to the local server)
    pub model: String,

    /// Labels offered to the model in the prompt
    pub labels: Vec<String>,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Backend that classifies via a locally hosted generative model
pub struct LocalGenerativeBackend {
    name: String,
    client: reqwest::Client,
    base_url: String,
    model: String,
    labels: Vec<String>,
}

impl LocalGenerativeBackend {
    /// Create a backend from configuration
    pub fn new(config: LocalConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: "local-generative".to_string(),
            client,
            base_url: config.base_url,
            model: config.model,
            labels: config.labels,
        })
    }

    fn build_prompt(&self, message: &str) -> String {
        format!(
            "You are a medical message classifier. Respond with only the category name.\n\n\
             Classify this patient message into ONE category: {}.\n\n\
             Message: \"{}\"\n\n\
             Respond with ONLY the category name. If multiple concerns exist, \
             choose the PRIMARY one.",
            self.labels.join(", "),
            message
        )
    }
}

#[async_trait]
impl Backend for LocalGenerativeBackend {
    async fn invoke(&self, message: &str) -> Result<RawResponse> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: self.build_prompt(message),
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                num_predict: 20,
            },
        };

        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::backend(format!(
                "generate request failed with status {status}"
            )));
        }

        let generation: GenerateResponse = response.json().await.map_err(map_transport_error)?;
        let text = generation.response.trim().to_lowercase();

        debug!(model = %self.model, raw = %text, "received generation");

        Ok(RawResponse::from_text(text))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn map_transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::backend(format!("generate request failed: {e}"))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_labels_and_message() {
        let backend = LocalGenerativeBackend::new(LocalConfig::default()).unwrap();
        let prompt = backend.build_prompt("the app won't load");

        assert!(prompt.contains("billing, clinical_advice, scheduling"));
        assert!(prompt.contains("Message: \"the app won't load\""));
        assert!(prompt.contains("ONLY the category name"));
    }

    #[test]
    fn test_request_body_disables_streaming() {
        let body = GenerateRequest {
            model: "llama3",
            prompt: "classify this".to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                num_predict: 20,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.0);
        assert_eq!(json["options"]["num_predict"], 20);
    }

    #[test]
    fn test_generate_response_parses() {
        let generation: GenerateResponse =
            serde_json::from_str(r#"{"model": "llama3", "response": "scheduling", "done": true}"#)
                .unwrap();
        assert_eq!(generation.response, "scheduling");
    }
}
