//! Remote generative backend (hosted chat-completions endpoint)
//!
//! Sends the message inside an instructional template and requests a
//! structured JSON verdict (`category`, `reasoning`, `message`) with
//! deterministic sampling. A completion that is not valid JSON is not
//! fatal: the whole completion text becomes the label candidate and the
//! normalizer's coercion takes it from there.

use crate::backend::Backend;
use async_trait::async_trait;
use medroute_core::{Error, RawResponse, Result, DEFAULT_LABELS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default instructional template. `{labels}` and `{message}` are
/// substituted at call time.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
Classify this patient message into ONE category: {labels}.

Message: \"{message}\"

If multiple concerns exist, choose the PRIMARY one. Respond with valid JSON \
only, with fields \"category\", \"reasoning\", and \"message\" (a short \
sentence telling the patient where they are being redirected).";

const SYSTEM_PROMPT: &str =
    "You are a medical message classifier. Always respond with valid JSON only.";

/// Configuration for the remote generative backend
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Chat-completions API base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Bearer token, if the endpoint requires one
    pub api_key: Option<String>,

    /// Labels offered to the model in the prompt
    pub labels: Vec<String>,

    /// Instructional template override
    pub prompt_template: Option<String>,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1".to_string(),
            api_key: None,
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
            prompt_template: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Backend that classifies via a hosted chat-completions endpoint
pub struct RemoteGenerativeBackend {
    name: String,
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    labels: Vec<String>,
    prompt_template: String,
}

impl RemoteGenerativeBackend {
    /// Create a backend from configuration.
    ///
    /// The HTTP client is built once with the configured timeout and
    /// reused for every call.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: "remote-generative".to_string(),
            client,
            base_url: config.base_url,
            model: config.model,
            api_key: config.api_key,
            labels: config.labels,
            prompt_template: config
                .prompt_template
                .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
        })
    }
}

#[async_trait]
impl Backend for RemoteGenerativeBackend {
    async fn invoke(&self, message: &str) -> Result<RawResponse> {
        let prompt = render_prompt(&self.prompt_template, &self.labels, message);

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
            max_tokens: 150,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::backend(format!(
                "chat completion request failed with status {status}"
            )));
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(map_transport_error)?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| Error::backend("chat completion contained no choices"))?;

        debug!(model = %self.model, raw = %content, "received completion");

        Ok(parse_completion(&content))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Substitute `{labels}` and `{message}` into an instructional template
fn render_prompt(template: &str, labels: &[String], message: &str) -> String {
    template
        .replace("{labels}", &labels.join(", "))
        .replace("{message}", message)
}

/// Interpret a completion body.
///
/// Well-formed verdicts carry the label candidate in `category`; anything
/// else degrades to the entire completion text as the candidate.
fn parse_completion(content: &str) -> RawResponse {
    match serde_json::from_str::<Verdict>(content) {
        Ok(verdict) => RawResponse {
            text: verdict.category.to_lowercase(),
            reasoning: Some(verdict.reasoning).filter(|r| !r.is_empty()),
            message: Some(verdict.message).filter(|m| !m.is_empty()),
            scores: None,
        },
        Err(e) => {
            debug!(error = %e, "completion was not valid JSON, using raw text");
            RawResponse::from_text(content.to_lowercase())
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::backend(format!("chat completion request failed: {e}"))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Verdict {
    #[serde(default)]
    category: String,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    message: String,
}
