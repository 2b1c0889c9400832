//! Infrastructure layer for Parley.
//!
//! Contains implementations of the traits defined in `parley-core`:
//! SQLite storage with WAL mode and split read/write pools, and the Gemini
//! LLM provider (reqwest + SSE streaming).

pub mod llm;
pub mod sqlite;
