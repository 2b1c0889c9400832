//! Google Gemini provider.
//!
//! Talks to the generative-language REST API (`generateContent` for full
//! completions, `streamGenerateContent?alt=sse` for token streams).

mod client;
mod streaming;
pub mod types;

pub use client::GeminiProvider;
