//! Command handlers for the Cogito CLI
//!
//! Each submodule implements one subcommand. Handlers own their
//! dispatcher: the store is opened once per invocation and dropped at
//! exit.

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::Result;

// History inspection command
pub mod history;

// Serve command handler
pub mod serve {
    //! HTTP server command handler

    use super::*;

    /// Run the HTTP chat server
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `host` - Optional override for the bind host
    /// * `port` - Optional override for the bind port
    pub async fn run_serve(
        mut config: Config,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<()> {
        if let Some(host) = host {
            config.server.host = host;
        }
        if let Some(port) = port {
            config.server.port = port;
        }

        let dispatcher = Dispatcher::new(&config)?;
        crate::server::serve(&config.server, dispatcher).await
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Creates a dispatcher and runs a readline-based interactive loop
    //! that submits each line to it. `exit` or `quit` (or Ctrl-D) leaves
    //! the session; the conversation is persisted like any other.

    use super::*;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    pub fn run_chat(config: Config) -> Result<()> {
        let dispatcher = Dispatcher::new(&config)?;

        // Create readline instance
        let mut rl = DefaultEditor::new()?;

        println!();
        println!("{}", "Cogito interactive chat".bold());
        println!(
            "Ask me arithmetic, the date or time, or what we talked about earlier. \
             Type {} to leave.",
            "exit".cyan()
        );
        println!();

        loop {
            match rl.readline("you> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed.eq_ignore_ascii_case("exit")
                        || trimmed.eq_ignore_ascii_case("quit")
                    {
                        break;
                    }

                    rl.add_history_entry(trimmed)?;

                    let reply = dispatcher.handle_message(trimmed);
                    println!("{} {}", "bot>".green(), reply);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    tracing::error!(%err, "readline failed");
                    break;
                }
            }
        }

        println!("Goodbye.");
        Ok(())
    }
}

// One-shot question command handler
pub mod ask {
    //! One-shot dispatch: send a single message and print the reply.

    use super::*;

    /// Send one message and print the reply to stdout
    ///
    /// The exchange is persisted, so a later `history` or recall query
    /// will see it.
    pub fn run_ask(config: Config, message: &str) -> Result<()> {
        let dispatcher = Dispatcher::new(&config)?;
        println!("{}", dispatcher.handle_message(message));
        Ok(())
    }
}
