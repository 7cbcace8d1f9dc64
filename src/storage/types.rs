//! Data types for persisted conversation turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the conversation produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human user
    User,
    /// The responder
    Bot,
}

impl Sender {
    /// Stable string form used in the database `sender` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    /// Parse the database string form
    ///
    /// Unknown values map to `Bot` so a corrupted row never aborts a
    /// recall; the row text is still returned.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "user" => Sender::User,
            _ => Sender::Bot,
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted conversation exchange unit
///
/// Immutable once written: the store is append-only, and ordering by `id`
/// equals insertion order equals chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Monotonically increasing identifier, assigned by the store
    pub id: i64,
    /// Creation time, assigned by the store at write time
    pub timestamp: DateTime<Utc>,
    /// Who produced the message
    pub sender: Sender,
    /// The message content
    pub text: String,
}
