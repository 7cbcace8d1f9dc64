//! Command-line interface definition for Cogito
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the HTTP server, the interactive chat loop,
//! one-shot questions, and history inspection.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cogito - rule-based conversational responder
///
/// Answers arithmetic, date/time, and recall questions over HTTP or in
/// the terminal, and remembers every exchange in a local database.
#[derive(Parser, Debug, Clone)]
#[command(name = "cogito")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the conversation database path
    #[arg(long, env = "COGITO_DB")]
    pub db_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Cogito
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP chat server
    Serve {
        /// Override the bind host from config
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port from config
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start an interactive chat session in the terminal
    Chat,

    /// Ask a single question and print the reply
    Ask {
        /// The message to send
        message: String,
    },

    /// Show recent conversation history
    History {
        /// Number of turns to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Only show turns containing this keyword (case-insensitive)
        #[arg(short, long)]
        keyword: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            db_path: None,
            command: Commands::Chat,
        }
    }
}
