//! History inspection command
//!
//! Prints recent conversation turns as a table, optionally filtered by a
//! case-insensitive keyword.

use crate::config::Config;
use crate::error::Result;
use crate::storage::{Turn, TurnStore};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle the `history` command
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `limit` - Number of most recent turns to show (ignored with a keyword)
/// * `keyword` - When set, show every turn containing the keyword instead
pub fn handle_history(config: &Config, limit: usize, keyword: Option<&str>) -> Result<()> {
    let store = TurnStore::open(&config.storage, &config.recall)?;

    let turns = match keyword {
        Some(keyword) => store.recall_by_keyword(keyword)?,
        None => store.recall(limit)?,
    };

    if turns.is_empty() {
        println!("{}", "No conversation history found.".yellow());
        return Ok(());
    }

    print_turns(&turns);
    Ok(())
}

fn print_turns(turns: &[Turn]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "When".bold(),
        "Who".bold(),
        "Text".bold()
    ]);

    for turn in turns {
        let when = turn.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let text = if turn.text.chars().count() > 60 {
            let truncated: String = turn.text.chars().take(57).collect();
            format!("{}...", truncated)
        } else {
            turn.text.clone()
        };

        table.add_row(prettytable::row![
            turn.id.to_string().cyan(),
            when,
            turn.sender,
            text
        ]);
    }

    println!("\nConversation history:");
    table.printstd();
    println!();
}
