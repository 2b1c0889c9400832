//! LLM provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait
//! defined in `parley-core` for the Google Gemini generative-language API,
//! and a small factory ([`create_provider`]) that constructs the
//! process-wide provider from the chat configuration.
//!
//! [`LlmProvider`]: parley_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::config::ChatConfig;

use self::gemini::GeminiProvider;

/// Create the type-erased provider singleton from configuration.
///
/// Constructed once at startup and shared across requests via `AppState`.
pub fn create_provider(config: &ChatConfig, api_key: SecretString) -> BoxLlmProvider {
    BoxLlmProvider::new(GeminiProvider::new(api_key, config.model.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_is_gemini() {
        let provider = create_provider(
            &ChatConfig::default(),
            SecretString::from("test-key-not-real"),
        );
        assert_eq!(provider.name(), "gemini");
    }
}
