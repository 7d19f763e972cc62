//! Thin chat-completions client used by the brainstorm, enrichment, and
//! generation adapters. Plain text, JSON-object, and strict structured
//! output modes.

pub mod error;
pub mod schema;
pub mod types;
pub mod util;

pub use error::{LlmError, Result};
pub use schema::StructuredOutput;

use std::time::Duration;

use tracing::debug;

use types::{ChatRequest, ChatResponse, ResponseFormat, WireMessage};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_TOKENS: u32 = 16_000;

pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Free-text completion.
    pub async fn chat(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        self.send(system, user, temperature, None).await
    }

    /// Completion constrained to a JSON object.
    pub async fn chat_json(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        self.send(system, user, temperature, Some(ResponseFormat::json_object()))
            .await
    }

    /// Completion constrained to the strict schema of `T`, deserialized.
    pub async fn structured<T: StructuredOutput>(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<T> {
        let format = ResponseFormat::json_schema(&T::type_name(), T::strict_schema());
        let raw = self.send(system, user, temperature, Some(format)).await?;
        Ok(serde_json::from_str(util::strip_code_blocks(&raw))?)
    }

    async fn send(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        response_format: Option<ResponseFormat>,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![WireMessage::system(system), WireMessage::user(user)],
            temperature: Some(temperature),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            response_format,
        };

        debug!(model = %self.model, "LLM chat request");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}
