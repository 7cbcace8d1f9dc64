//! Cogito - rule-based conversational responder library
//!
//! This library provides the core functionality for the Cogito responder:
//! intent classification, safe arithmetic evaluation, durable conversation
//! memory, and the dispatch layer that ties them together.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `intent`: intent classification over an ordered rule table
//! - `eval`: tokenizer, parser, and reducer for arithmetic expressions
//! - `storage`: append-only SQLite log of conversation turns
//! - `responder`: fixed time/date and self-description answers
//! - `dispatch`: the orchestrator behind `handle_message`
//! - `server`: HTTP transport (axum)
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use cogito::config::Config;
//! use cogito::dispatch::Dispatcher;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let dispatcher = Dispatcher::new(&config)?;
//!     println!("{}", dispatcher.handle_message("2 + 3 * 4"));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod eval;
pub mod intent;
pub mod responder;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{CogitoError, Result};
pub use eval::{EvalError, Evaluator, Value};
pub use intent::{classify, Intent};
pub use storage::{Sender, Turn, TurnStore};
