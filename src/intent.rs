//! Intent classification for user messages
//!
//! Turns free text into a structured [`Intent`] by running an ordered
//! table of matching rules; the first rule to match wins. Classification
//! is total: input that matches no rule becomes [`Intent::Unknown`], so
//! this function never fails.
//!
//! Priority order is fixed: arithmetic expression shape, date/time
//! keywords, recall keywords, self-description keywords, fallback.

use regex::Regex;
use std::sync::OnceLock;

/// The classified category of a user message
///
/// Exactly one variant is produced per input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// An arithmetic expression to evaluate
    Arithmetic(String),
    /// A request for the current time
    TimeQuery,
    /// A request for the current date
    DateQuery,
    /// A request to recall prior turns, with an optional count
    RecallRequest(Option<usize>),
    /// A request for the bot to describe itself
    SelfDescribe,
    /// Anything the bot cannot reason about; carries the original text
    Unknown(String),
}

/// One classification rule: a predicate over the input paired with an
/// intent constructor. `lowered` is the trimmed, lowercased input;
/// `trimmed` preserves the original casing for intents that carry text.
type Rule = fn(trimmed: &str, lowered: &str) -> Option<Intent>;

/// The ordered rule table. First match wins.
const RULES: &[Rule] = &[
    match_arithmetic,
    match_date,
    match_time,
    match_recall,
    match_self_describe,
];

/// Classify a user message into an [`Intent`]
///
/// Matching is case-insensitive and tolerant of surrounding whitespace.
///
/// # Examples
///
/// ```
/// use cogito::intent::{classify, Intent};
///
/// assert_eq!(classify("2+2"), Intent::Arithmetic("2+2".to_string()));
/// assert_eq!(classify("what time is it"), Intent::TimeQuery);
/// assert_eq!(classify("asdkjh"), Intent::Unknown("asdkjh".to_string()));
/// ```
pub fn classify(text: &str) -> Intent {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();

    for rule in RULES {
        if let Some(intent) = rule(trimmed, &lowered) {
            return intent;
        }
    }

    Intent::Unknown(trimmed.to_string())
}

fn arithmetic_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^[0-9\s.+\-*/%()]+$").expect("valid regex"))
}

fn first_integer() -> &'static Regex {
    static INTEGER: OnceLock<Regex> = OnceLock::new();
    INTEGER.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

/// Arithmetic shape: only grammar characters, with at least one digit and
/// one operator. The evaluator still has the final word on validity.
fn match_arithmetic(trimmed: &str, _lowered: &str) -> Option<Intent> {
    if trimmed.is_empty() || !arithmetic_shape().is_match(trimmed) {
        return None;
    }

    let has_digit = trimmed.chars().any(|c| c.is_ascii_digit());
    let has_operator = trimmed.chars().any(|c| matches!(c, '+' | '-' | '*' | '/' | '%'));
    if has_digit && has_operator {
        Some(Intent::Arithmetic(trimmed.to_string()))
    } else {
        None
    }
}

fn match_date(_trimmed: &str, lowered: &str) -> Option<Intent> {
    const KEYWORDS: &[&str] = &["date", "today", "day"];
    contains_any(lowered, KEYWORDS).then_some(Intent::DateQuery)
}

fn match_time(_trimmed: &str, lowered: &str) -> Option<Intent> {
    const KEYWORDS: &[&str] = &["time", "hour", "minute", "clock"];
    contains_any(lowered, KEYWORDS).then_some(Intent::TimeQuery)
}

fn match_recall(_trimmed: &str, lowered: &str) -> Option<Intent> {
    const KEYWORDS: &[&str] = &[
        "history",
        "memory",
        "remember",
        "recall",
        "conversation",
        "what did i",
    ];
    if !contains_any(lowered, KEYWORDS) {
        return None;
    }

    // "show the last 3 turns" carries an explicit window.
    let count = first_integer()
        .find(lowered)
        .and_then(|m| m.as_str().parse::<usize>().ok());

    Some(Intent::RecallRequest(count))
}

fn match_self_describe(_trimmed: &str, lowered: &str) -> Option<Intent> {
    const KEYWORDS: &[&str] = &[
        "who are you",
        "what are you",
        "your name",
        "about yourself",
        "describe yourself",
    ];
    contains_any(lowered, KEYWORDS).then_some(Intent::SelfDescribe)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_arithmetic() {
        assert_eq!(classify("2+2"), Intent::Arithmetic("2+2".to_string()));
        assert_eq!(
            classify("  (1 + 2) * 3  "),
            Intent::Arithmetic("(1 + 2) * 3".to_string())
        );
        assert_eq!(
            classify("7 // 2"),
            Intent::Arithmetic("7 // 2".to_string())
        );
    }

    #[test]
    fn test_classify_digits_without_operator_are_unknown() {
        assert_eq!(classify("42"), Intent::Unknown("42".to_string()));
    }

    #[test]
    fn test_classify_operator_without_digits_is_unknown() {
        assert_eq!(classify("+-*"), Intent::Unknown("+-*".to_string()));
    }

    #[test]
    fn test_classify_time_query() {
        assert_eq!(classify("what time is it"), Intent::TimeQuery);
        assert_eq!(classify("WHAT TIME IS IT?"), Intent::TimeQuery);
        assert_eq!(classify("current hour please"), Intent::TimeQuery);
    }

    #[test]
    fn test_classify_date_query() {
        assert_eq!(classify("what's the date"), Intent::DateQuery);
        assert_eq!(classify("what day is today"), Intent::DateQuery);
    }

    #[test]
    fn test_classify_date_wins_over_time() {
        // Both keyword groups present; date has priority in the rule table.
        assert_eq!(classify("what time is it today"), Intent::DateQuery);
    }

    #[test]
    fn test_classify_recall_without_count() {
        assert_eq!(classify("show me our history"), Intent::RecallRequest(None));
        assert_eq!(
            classify("do you remember what we said"),
            Intent::RecallRequest(None)
        );
    }

    #[test]
    fn test_classify_recall_with_count() {
        assert_eq!(
            classify("show the last 3 turns of our conversation"),
            Intent::RecallRequest(Some(3))
        );
    }

    #[test]
    fn test_classify_self_describe() {
        assert_eq!(classify("who are you"), Intent::SelfDescribe);
        assert_eq!(classify("tell me about yourself"), Intent::SelfDescribe);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("asdkjh"), Intent::Unknown("asdkjh".to_string()));
    }

    #[test]
    fn test_classify_unknown_preserves_original_casing() {
        assert_eq!(
            classify("  AsDkJh  "),
            Intent::Unknown("AsDkJh".to_string())
        );
    }

    #[test]
    fn test_classify_arithmetic_wins_over_keywords() {
        // Pure expression shape takes priority even though "2-2" is short.
        assert_eq!(classify("2-2"), Intent::Arithmetic("2-2".to_string()));
    }

    #[test]
    fn test_classify_empty_input_is_unknown() {
        assert_eq!(classify(""), Intent::Unknown(String::new()));
        assert_eq!(classify("   "), Intent::Unknown(String::new()));
    }

    #[test]
    fn test_classify_injection_text_is_not_arithmetic() {
        // Letters break the shape rule; this routes to Unknown, never
        // to the evaluator as code.
        assert_eq!(
            classify("__import__('os')"),
            Intent::Unknown("__import__('os')".to_string())
        );
    }

    #[test]
    fn test_classify_is_total() {
        for input in ["", "!!!", "ünïcödé", "\n\t", "2 +", "%%%% 9"] {
            // Every input classifies to exactly one variant without panicking.
            let _ = classify(input);
        }
    }
}
