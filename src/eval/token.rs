//! Tokenizer for the arithmetic expression grammar
//!
//! Scans an expression string left to right into a flat token sequence.
//! The grammar is deliberately tiny: numeric literals, the operators
//! `+ - * / % ** //`, and parentheses. Any other character fails with
//! [`EvalError::InvalidToken`], which is what keeps arbitrary input
//! (`__import__('os')`, SQL fragments, ...) from ever reaching the parser.

use super::{EvalError, Value};

/// A single lexical token of the expression grammar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal, integer or floating point
    Number(Value),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `//`
    SlashSlash,
    /// `%`
    Percent,
    /// `**`
    StarStar,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

/// Tokenize an expression string
///
/// # Arguments
///
/// * `input` - The raw expression text
///
/// # Returns
///
/// Returns the token sequence in source order.
///
/// # Errors
///
/// Returns [`EvalError::InvalidToken`] for any character that is not part
/// of the grammar, and [`EvalError::Syntax`] for malformed numeric
/// literals (for example a second decimal point).
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (token, consumed) = scan_number(&chars, i)?;
            tokens.push(token);
            i += consumed;
            continue;
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    i += 1;
                    Token::StarStar
                } else {
                    Token::Star
                }
            }
            '/' => {
                if chars.get(i + 1) == Some(&'/') {
                    i += 1;
                    Token::SlashSlash
                } else {
                    Token::Slash
                }
            }
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(EvalError::InvalidToken {
                    character: other,
                    position: i,
                })
            }
        };

        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

/// Scan a numeric literal starting at `start`
///
/// Returns the token and the number of characters consumed. Integer
/// literals that do not fit in `i64` fall back to floating point; the
/// evaluator's magnitude bound rejects them later if they are too large.
fn scan_number(chars: &[char], start: usize) -> Result<(Token, usize), EvalError> {
    let mut end = start;
    let mut seen_dot = false;
    let mut seen_digit = false;

    while end < chars.len() {
        let c = chars[end];
        if c.is_ascii_digit() {
            seen_digit = true;
            end += 1;
        } else if c == '.' {
            if seen_dot {
                return Err(EvalError::Syntax(format!(
                    "malformed number at position {}",
                    start
                )));
            }
            seen_dot = true;
            end += 1;
        } else {
            break;
        }
    }

    if !seen_digit {
        return Err(EvalError::Syntax(format!(
            "malformed number at position {}",
            start
        )));
    }

    let text: String = chars[start..end].iter().collect();
    let value = if seen_dot {
        let parsed = text
            .parse::<f64>()
            .map_err(|_| EvalError::Syntax(format!("malformed number at position {}", start)))?;
        Value::Float(parsed)
    } else {
        match text.parse::<i64>() {
            Ok(n) => Value::Int(n),
            // Longer digit runs than i64 can hold; let the overflow bound decide.
            Err(_) => Value::Float(
                text.parse::<f64>().map_err(|_| {
                    EvalError::Syntax(format!("malformed number at position {}", start))
                })?,
            ),
        }
    };

    Ok((Token::Number(value), end - start))
}
