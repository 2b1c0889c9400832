//! Chat session and message persistence abstractions for Parley.
//!
//! Defines the `ChatRepository` trait the infrastructure layer implements,
//! the `ChatService` orchestrating session lifecycle and message
//! persistence, the conversation prompt builder, and image payload
//! validation.

pub mod image;
pub mod prompt;
pub mod repository;
pub mod service;
