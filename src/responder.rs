//! Fixed responders: temporal answers and self-description
//!
//! These are the stateless leaves of the dispatch layer. Time and date use
//! the host clock formatted with fixed patterns (`%H:%M:%S`, `%Y-%m-%d`);
//! the self-description is a constant capability statement.

use chrono::Local;

/// The fixed self-description text
///
/// Enumerates the capabilities and states the disclaimer that the bot only
/// answers what it can reason about.
pub const DESCRIPTION: &str = "I am a small rule-based assistant. I run entirely on simple logic \
without access to external APIs or large models. I can evaluate arithmetic expressions, tell \
the current date and time, and recall our conversation history, but I only answer what I can \
reason about.";

/// The fixed fallback reply for input the bot cannot reason about
pub const FALLBACK: &str = "I'm sorry, I don't have enough information to answer that. I rely on \
simple reasoning rather than vast knowledge.";

/// Format the current local time as a sentence
///
/// The time itself uses the fixed `%H:%M:%S` format.
pub fn now_time() -> String {
    format!(
        "The current time is {} (local time).",
        Local::now().format("%H:%M:%S")
    )
}

/// Format the current local date as a sentence
///
/// The date itself uses the fixed `%Y-%m-%d` format.
pub fn now_date() -> String {
    format!(
        "Today's date is {} (local time).",
        Local::now().format("%Y-%m-%d")
    )
}

/// The capability statement
pub fn describe() -> String {
    DESCRIPTION.to_string()
}
