use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{PlannerError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// One prompt in, one text out. Implemented by [`GeminiClient`] and by
/// test stubs driving the generator without a network.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Thin client for the Gemini `generateContent` REST endpoint.
///
/// Single-shot by design: a failed call is surfaced to the caller and the
/// generation request aborts. No retries, no backoff.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| PlannerError::Model(format!("Failed to build HTTP client: {err}")))?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
            }
        });

        let response = client
            .post(self.request_url())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| PlannerError::Model(format!("HTTP request failed: {err}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| PlannerError::Model(format!("Failed to read response: {err}")))?;

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|err| PlannerError::Model(format!("Failed to parse JSON: {err}")))?;

        if !status.is_success() {
            let api_message = response_json
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or(response_text.clone());

            return Err(PlannerError::Model(format!(
                "HTTP {status} error: {api_message}"
            )));
        }

        response_json
            .get("candidates")
            .and_then(|candidates| candidates.get(0))
            .and_then(|candidate| candidate.pointer("/content/parts/0/text"))
            .and_then(|value| value.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                PlannerError::Model("Model response contained no candidate text".to_string())
            })
    }
}
