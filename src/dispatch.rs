//! Intent dispatch: the reasoning layer behind every exchange
//!
//! The [`Dispatcher`] owns the evaluator and the turn store. It classifies
//! raw input, delegates to the matching handler, persists both sides of the
//! exchange, and always returns a reply string: evaluator failures become
//! plain-language replies and store failures are logged without surfacing
//! raw errors to the user.

use crate::config::Config;
use crate::error::Result;
use crate::eval::Evaluator;
use crate::intent::{classify, Intent};
use crate::responder;
use crate::storage::{Sender, Turn, TurnStore};

/// Routes classified intents to their handlers and logs the exchange
///
/// Cheap to clone; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    evaluator: Evaluator,
    store: TurnStore,
}

impl Dispatcher {
    /// Create a dispatcher from configuration
    ///
    /// Opens (or creates) the turn store at the configured location.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be initialized.
    pub fn new(config: &Config) -> Result<Self> {
        let store = TurnStore::open(&config.storage, &config.recall)?;
        Ok(Self::with_store(Evaluator::new(&config.evaluator), store))
    }

    /// Create a dispatcher over an existing store
    pub fn with_store(evaluator: Evaluator, store: TurnStore) -> Self {
        Self { evaluator, store }
    }

    /// The underlying turn store
    pub fn store(&self) -> &TurnStore {
        &self.store
    }

    /// Handle one user message and return the reply text
    ///
    /// This is the single boundary operation with the transport layer:
    /// synchronous, and it always returns a string. After the reply is
    /// computed, the user turn and the bot turn are appended to the store
    /// in that order. Recall requests are logged like any other turn so
    /// that "what did I ask before" remains discoverable.
    pub fn handle_message(&self, text: &str) -> String {
        let trimmed = text.trim();
        let intent = classify(trimmed);
        tracing::debug!(?intent, "classified message");

        let reply = self.answer(&intent);

        // Persist after answering so a recall request reports the
        // conversation as it stood when the question was asked.
        self.log_turn(Sender::User, trimmed);
        self.log_turn(Sender::Bot, &reply);

        reply
    }

    fn answer(&self, intent: &Intent) -> String {
        match intent {
            Intent::Arithmetic(expression) => match self.evaluator.evaluate(expression) {
                Ok(value) => format!("The result is {}.", value),
                Err(err) => {
                    tracing::debug!(%err, "expression rejected");
                    format!("I couldn't evaluate that: {}.", err)
                }
            },
            Intent::TimeQuery => responder::now_time(),
            Intent::DateQuery => responder::now_date(),
            Intent::RecallRequest(count) => self.recall_reply(count.unwrap_or(0)),
            Intent::SelfDescribe => responder::describe(),
            Intent::Unknown(_) => responder::FALLBACK.to_string(),
        }
    }

    /// Format a recall window as a numbered transcript
    ///
    /// A count of zero means the configured default window.
    fn recall_reply(&self, count: usize) -> String {
        let turns = match self.store.recall(count) {
            Ok(turns) => turns,
            Err(err) => {
                tracing::error!(%err, "failed to read conversation history");
                return "I couldn't reach my memory just now; please try again.".to_string();
            }
        };

        if turns.is_empty() {
            return "There is no previous conversation yet.".to_string();
        }

        let mut lines = vec!["Here is our recent conversation history:".to_string()];
        for (i, turn) in turns.iter().enumerate() {
            lines.push(format_turn(i + 1, turn));
        }
        lines.join("\n")
    }

    fn log_turn(&self, sender: Sender, text: &str) {
        // A write failure is non-fatal: the reply has already been
        // computed and is still returned to the user.
        if let Err(err) = self.store.append(sender, text) {
            tracing::error!(%err, %sender, "failed to persist turn");
        }
    }
}

fn format_turn(index: usize, turn: &Turn) -> String {
    match turn.sender {
        Sender::User => format!("{}. You said: '{}'", index, turn.text),
        Sender::Bot => format!("{}. I said: '{}'", index, turn.text),
    }
}
