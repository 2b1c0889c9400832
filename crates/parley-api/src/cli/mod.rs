//! CLI argument definitions and command handlers.

pub mod cleanup;
pub mod status;

use clap::{ArgAction, Parser, Subcommand};

/// Parley: a session-based chat API backed by Gemini.
#[derive(Debug, Parser)]
#[command(name = "parley", version, about = "Session-based chat API backed by Gemini")]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 3001)]
        port: u16,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: String,
    },

    /// Delete all sessions whose expiry has passed
    Cleanup,

    /// Show storage status
    Status,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
