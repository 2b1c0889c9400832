//! Chat configuration for Parley.
//!
//! `ChatConfig` represents the top-level `config.toml` that controls the
//! model, system prompt, and session defaults. All fields have sensible
//! defaults; a missing file is equivalent to an empty one.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// System prompt injected into every completion request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Hours until a newly created session expires.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,

    /// Sampling temperature for completions.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens the provider may generate per reply.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful and friendly AI assistant in a chat application.\n\
     \n\
     Your role is to:\n\
     - Provide helpful, accurate, and thoughtful responses\n\
     - Maintain a professional yet conversational tone\n\
     - Be concise but thorough in your answers\n\
     - Ask clarifying questions when needed\n\
     - Admit when you don't know something rather than making up information\n\
     \n\
     Keep the conversation natural and engaging."
        .to_string()
}

fn default_session_ttl_hours() -> u32 {
    24
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: default_system_prompt(),
            session_ttl_hours: default_session_ttl_hours(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}
