//! Application layer for Parley: clap CLI and axum REST API.
//!
//! Exposed as a library so integration tests can build the router against
//! scripted providers and temporary databases.

pub mod cli;
pub mod http;
pub mod state;
