//! Gemini `generateContent` client.
//!
//! Authentication is an API key sent in the `x-goog-api-key` header; it never
//! appears in the request URL. Thinking models tag intermediate reasoning
//! parts with `thought: true`; those are dropped and only the final answer
//! text is returned.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

/// Gemini v1beta REST API base.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Variable holding the API key.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const API_KEY_HEADER: &str = "x-goog-api-key";

/// One text generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("GEMINI_API_KEY is not set. Export your Gemini API key and restart the server.")]
    MissingApiKey,

    #[error("request to Gemini failed: {0}")]
    Transport(reqwest::Error),

    #[error("API key rejected. Check your Gemini API key configuration. {0}")]
    Unauthorized(String),

    #[error("rate limit exceeded, try again in a few moments. {0}")]
    RateLimited(String),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gemini returned no text ({0})")]
    EmptyResponse(String),
}

impl GenerateError {
    /// The service could not be reached or would not accept our credentials.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey | Self::Transport(_) | Self::Unauthorized(_)
        )
    }
}

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;

    /// Whether credentials are present. Used for status reporting only.
    fn is_configured(&self) -> bool {
        true
    }
}

/// HTTP client for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GeminiClient {
    /// Create with explicit configuration. A blank key counts as missing.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        }
    }

    fn api_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Request body for a single user turn.
    pub fn request_body(request: &GenerationRequest) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_output_tokens
            }
        })
    }

    /// Final answer text of the first candidate, thought parts excluded.
    pub fn extract_text(response: &Value) -> Option<String> {
        let parts = response["candidates"][0]["content"]["parts"].as_array()?;

        let text: String = parts
            .iter()
            .filter(|p| !p["thought"].as_bool().unwrap_or(false))
            .filter_map(|p| p["text"].as_str())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Explain why a successful response carried no text.
    fn empty_reason(response: &Value) -> String {
        if let Some(reason) = response["promptFeedback"]["blockReason"].as_str() {
            return format!("prompt blocked: {}", reason);
        }
        match response["candidates"][0]["finishReason"].as_str() {
            Some(reason) => format!("finish reason: {}", reason),
            None => "no candidates".to_string(),
        }
    }

    /// Map a non-success HTTP response to an error.
    pub fn classify_error(status: StatusCode, body: &str) -> GenerateError {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                GenerateError::Unauthorized(message)
            }
            StatusCode::BAD_REQUEST if message.to_lowercase().contains("api key") => {
                GenerateError::Unauthorized(message)
            }
            StatusCode::TOO_MANY_REQUESTS => GenerateError::RateLimited(message),
            _ => GenerateError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        let api_key = self.api_key.as_deref().ok_or(GenerateError::MissingApiKey)?;

        tracing::debug!(
            model = %request.model,
            temperature = request.temperature,
            "calling Gemini"
        );

        let response = self
            .client
            .post(self.api_url(&request.model))
            .header(API_KEY_HEADER, api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(Self::classify_error(status, &body));
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| GenerateError::Api {
            status: status.as_u16(),
            message: format!("malformed response body: {}", e),
        })?;
        Self::extract_text(&json)
            .ok_or_else(|| GenerateError::EmptyResponse(Self::empty_reason(&json)))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Transport errors carry no URL.
fn transport(e: reqwest::Error) -> GenerateError {
    GenerateError::Transport(e.without_url())
}
