//! Shared domain types for Parley.
//!
//! This crate holds the data shapes used across the workspace: chat sessions
//! and messages, LLM request/response types, error enums, and configuration.
//! It depends only on serde/chrono/uuid -- never on IO or framework crates.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
