//! HTTP/REST API layer for Parley.
//!
//! Axum-based JSON API at `/api/` with CORS, request tracing, and an SSE
//! streaming chat endpoint.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
