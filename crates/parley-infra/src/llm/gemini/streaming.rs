//! SSE stream adapter for `streamGenerateContent`.
//!
//! With `alt=sse` the API emits `data:` frames, each holding a partial
//! [`GeminiResponse`] whose candidate parts carry the next text delta. The
//! adapter maps frames to [`StreamEvent::TextDelta`] as they arrive and
//! yields [`StreamEvent::Done`] when the SSE stream ends.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};

use parley_types::llm::{LlmError, StreamEvent};

use super::client::error_for_status;
use super::types::{GeminiRequest, GeminiResponse};

/// Create a streaming SSE connection to the Gemini API.
///
/// Returns a `Stream` of [`StreamEvent`]s. The request is not sent until
/// the stream is first polled.
///
/// # Arguments
///
/// * `client` - Shared reqwest HTTP client
/// * `url` - Full API URL including `?alt=sse`
/// * `body` - Serialized Gemini request
/// * `api_key` - API key wrapped in SecretString
pub fn create_gemini_stream(
    client: &reqwest::Client,
    url: &str,
    body: GeminiRequest,
    api_key: &SecretString,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    let request = client
        .post(url)
        .header("x-goog-api-key", api_key.expose_secret())
        .header("content-type", "application/json")
        .json(&body);

    Box::pin(async_stream::try_stream! {
        let response = request.send().await.map_err(|e| LlmError::Provider {
            message: format!("HTTP request failed: {e}"),
        })?;
        let response = check_status(response).await?;

        let mut events = response.bytes_stream().eventsource();

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| LlmError::Stream(e.to_string()))?;
            if event.data.trim().is_empty() {
                continue;
            }

            let chunk: GeminiResponse = serde_json::from_str(&event.data)
                .map_err(|e| LlmError::Deserialization(format!("stream chunk: {e}")))?;

            for candidate in &chunk.candidates {
                let Some(content) = &candidate.content else {
                    continue;
                };
                for part in &content.parts {
                    if let Some(text) = &part.text {
                        if !text.is_empty() {
                            yield StreamEvent::TextDelta { text: text.clone() };
                        }
                    }
                }
            }
        }

        yield StreamEvent::Done;
    })
}

/// Pass a successful response through, or map the status and body to an
/// [`LlmError`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, error_body))
}
