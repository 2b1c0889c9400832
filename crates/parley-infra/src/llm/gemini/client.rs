//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google
//! Gemini.
//!
//! Sends requests to the generative-language REST API with the
//! `x-goog-api-key` header. Supports both non-streaming (`complete`) and
//! streaming (`stream`) modes.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::pin::Pin;
use std::time::Duration;

use futures_util::Stream;
use secrecy::{ExposeSecret, SecretString};

use parley_core::llm::provider::LlmProvider;
use parley_types::llm::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, StreamEvent,
};

use super::streaming::create_gemini_stream;
use super::types::{GeminiContent, GeminiPart, GeminiRequest, GenerationConfig};

/// Google Gemini LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-1.5-flash-latest")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model,
        }
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for the given model method.
    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.base_url)
    }

    /// Resolve the model to use: per-request override or the configured one.
    fn resolve_model<'a>(&'a self, request: &'a CompletionRequest) -> &'a str {
        if request.model.is_empty() {
            &self.model
        } else {
            &request.model
        }
    }

    /// Convert a generic [`CompletionRequest`] into a [`GeminiRequest`].
    ///
    /// The flattened prompt becomes one user content block; images become
    /// inline-data parts ahead of the text. An empty prompt (image-only
    /// turn) emits no text part.
    fn to_gemini_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let mut parts: Vec<GeminiPart> = request
            .images
            .iter()
            .map(|img| GeminiPart::inline_data(img.mime_type.clone(), img.data.clone()))
            .collect();

        if !request.prompt.is_empty() {
            parts.push(GeminiPart::text(request.prompt.clone()));
        }

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
            system_instruction: request.system.as_ref().map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(system.clone())],
            }),
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: Some(request.max_tokens),
            }),
        }
    }
}

// GeminiProvider intentionally does NOT derive Debug to prevent accidental
// exposure of internal state.

/// Map a non-success HTTP status to an [`LlmError`].
pub(super) fn error_for_status(status: reqwest::StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited,
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = self.resolve_model(request);
        let body = self.to_gemini_request(request);
        let url = self.url(model, "generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, error_body));
        }

        let gemini_resp: super::types::GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = gemini_resp.collect_text();
        if gemini_resp.candidates.is_empty() {
            return Err(LlmError::Provider {
                message: "response contained no candidates".to_string(),
            });
        }

        let finish_reason = gemini_resp.candidates[0]
            .finish_reason
            .as_deref()
            .map(|s| s.parse().unwrap_or(FinishReason::Other))
            .unwrap_or(FinishReason::Stop);

        Ok(CompletionResponse {
            content,
            model: gemini_resp
                .model_version
                .unwrap_or_else(|| model.to_string()),
            finish_reason,
        })
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let model = self.resolve_model(&request);
        let url = format!("{}?alt=sse", self.url(model, "streamGenerateContent"));
        let body = self.to_gemini_request(&request);

        create_gemini_stream(&self.client, &url, body, &self.api_key)
    }
}
