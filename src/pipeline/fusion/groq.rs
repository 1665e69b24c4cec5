use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::ReasoningClient;
use super::FusionError;

/// Default OpenAI-compatible chat-completions base URL.
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Near-zero temperature keeps the extraction deterministic across runs.
const TEMPERATURE: f32 = 0.05;
const MAX_TOKENS: u32 = 2000;

/// Groq chat-completions client (OpenAI-compatible wire format).
///
/// Constructed once at process start and injected into the normalizer.
pub struct GroqClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl GroqClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Build a client from GROQ_API_KEY (and optional GROQ_API_URL).
    /// Returns None when no key is configured.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GROQ_API_KEY").ok()?;
        let base_url =
            std::env::var("GROQ_API_URL").unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string());
        Some(Self::new(&base_url, &api_key, DEFAULT_TIMEOUT_SECS))
    }
}

/// Request body for POST /chat/completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response body from POST /chat/completions
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

#[async_trait]
impl ReasoningClient for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, FusionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FusionError::Timeout(self.timeout_secs)
                } else {
                    FusionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FusionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| FusionError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| FusionError::ResponseParsing("reply contained no choices".into()))
    }
}

/// Mock reasoning client for testing: canned reply or canned failure.
pub struct MockReasoningClient {
    outcome: Result<String, String>,
}

impl MockReasoningClient {
    pub fn new(reply: &str) -> Self {
        Self {
            outcome: Ok(reply.to_string()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
        }
    }
}

#[async_trait]
impl ReasoningClient for MockReasoningClient {
    async fn complete(&self, _prompt: &str) -> Result<String, FusionError> {
        match &self.outcome {
            Ok(reply) => Ok(reply.clone()),
            Err(reason) => Err(FusionError::HttpClient(reason.clone())),
        }
    }
}
