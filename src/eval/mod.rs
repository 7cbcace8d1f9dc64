//! Safe arithmetic expression evaluation
//!
//! This module answers arithmetic questions without executing arbitrary
//! code. An expression passes through three stages: the tokenizer rejects
//! anything outside the grammar, the parser builds an AST with bounded
//! nesting, and the reducer folds the tree bottom-up with checked
//! arithmetic. Every failure is a value of [`EvalError`]; nothing in here
//! panics on user input.
//!
//! # Examples
//!
//! ```
//! use cogito::eval::{Evaluator, Value};
//!
//! let evaluator = Evaluator::default();
//! assert_eq!(evaluator.evaluate("2 + 3 * 4").unwrap(), Value::Int(14));
//! assert_eq!(evaluator.evaluate("7 // 2").unwrap(), Value::Int(3));
//! ```

use std::fmt;
use thiserror::Error;

use crate::config::EvaluatorConfig;

pub mod parser;
pub mod token;

use parser::{BinaryOp, Expr, UnaryOp};

/// Evaluation failure taxonomy
///
/// All variants are recoverable: the dispatcher turns each one into a
/// plain-language reply, so the `Display` text is written to read well
/// inside a sentence shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A character outside the supported grammar
    #[error("unsupported character '{character}' at position {position}")]
    InvalidToken {
        /// The offending character
        character: char,
        /// Zero-based offset within the expression
        position: usize,
    },

    /// Structurally invalid expression
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Division, floor division or modulo by zero
    #[error("division by zero is undefined")]
    DivisionByZero,

    /// Operation with no real-number result
    #[error("no real result from {0}")]
    InvalidOperation(String),

    /// Result magnitude beyond the configured bound
    #[error("the result is too large to represent")]
    Overflow,

    /// Input rejected before evaluation for size or nesting
    #[error("the expression is too complex ({0})")]
    TooComplex(String),
}

/// A computed numeric value
///
/// Integer arithmetic stays in `Int` until an operation demands fractional
/// precision (`/`, a fractional literal, or a negative exponent), at which
/// point it promotes to `Float`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Exact integer
    Int(i64),
    /// Floating point
    Float(f64),
}

impl Value {
    fn as_f64(self) -> f64 {
        match self {
            Value::Int(n) => n as f64,
            Value::Float(x) => x,
        }
    }
}

// Largest f64 below which every integral value is exactly representable.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

impl fmt::Display for Value {
    /// Integral floats print without the fractional tail, so `10 / 5`
    /// renders as `2` rather than `2.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.fract() == 0.0 && x.abs() < EXACT_INT_LIMIT => {
                write!(f, "{}", *x as i64)
            }
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Arithmetic expression evaluator with configured complexity bounds
///
/// Pure and stateless: safe to share across threads and reuse for any
/// number of expressions.
#[derive(Debug, Clone)]
pub struct Evaluator {
    max_expression_length: usize,
    max_depth: usize,
    overflow_bound: f64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(&EvaluatorConfig::default())
    }
}

impl Evaluator {
    /// Create an evaluator from configuration
    pub fn new(config: &EvaluatorConfig) -> Self {
        Self {
            max_expression_length: config.max_expression_length,
            max_depth: config.max_depth,
            overflow_bound: config.overflow_bound,
        }
    }

    /// Evaluate an arithmetic expression string
    ///
    /// # Arguments
    ///
    /// * `input` - The raw expression text
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TooComplex`] before any parsing when the input
    /// exceeds the configured length, and the other [`EvalError`] variants
    /// for tokenizer, parser, and reduction failures.
    pub fn evaluate(&self, input: &str) -> Result<Value, EvalError> {
        let trimmed = input.trim();

        // Length gate runs first so adversarial input is rejected before
        // any unbounded work begins.
        if trimmed.chars().count() > self.max_expression_length {
            return Err(EvalError::TooComplex(format!(
                "expressions are limited to {} characters",
                self.max_expression_length
            )));
        }

        if trimmed.is_empty() {
            return Err(EvalError::Syntax("empty expression".to_string()));
        }

        let tokens = token::tokenize(trimmed)?;
        let expr = parser::parse(&tokens, self.max_depth)?;
        self.reduce(&expr)
    }

    /// Fold an expression tree bottom-up into a single value
    fn reduce(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => self.check(*value),
            Expr::Unary { op, operand } => {
                let value = self.reduce(operand)?;
                match op {
                    UnaryOp::Pos => Ok(value),
                    UnaryOp::Neg => match value {
                        Value::Int(n) => n
                            .checked_neg()
                            .map(Value::Int)
                            .ok_or(EvalError::Overflow),
                        Value::Float(x) => Ok(Value::Float(-x)),
                    },
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.reduce(lhs)?;
                let rhs = self.reduce(rhs)?;
                let result = self.apply(*op, lhs, rhs)?;
                self.check(result)
            }
        }
    }

    fn apply(&self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        use Value::{Float, Int};

        match op {
            BinaryOp::Add => match (lhs, rhs) {
                (Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or(EvalError::Overflow),
                _ => Ok(Float(lhs.as_f64() + rhs.as_f64())),
            },
            BinaryOp::Sub => match (lhs, rhs) {
                (Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or(EvalError::Overflow),
                _ => Ok(Float(lhs.as_f64() - rhs.as_f64())),
            },
            BinaryOp::Mul => match (lhs, rhs) {
                (Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or(EvalError::Overflow),
                _ => Ok(Float(lhs.as_f64() * rhs.as_f64())),
            },
            BinaryOp::Div => {
                let divisor = rhs.as_f64();
                if divisor == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Float(lhs.as_f64() / divisor))
            }
            BinaryOp::FloorDiv => match (lhs, rhs) {
                (Int(_), Int(0)) => Err(EvalError::DivisionByZero),
                (Int(a), Int(b)) => floor_div(a, b).map(Int).ok_or(EvalError::Overflow),
                _ => {
                    let divisor = rhs.as_f64();
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    Ok(Float((lhs.as_f64() / divisor).floor()))
                }
            },
            BinaryOp::Mod => match (lhs, rhs) {
                (Int(_), Int(0)) => Err(EvalError::DivisionByZero),
                (Int(a), Int(b)) => floor_mod(a, b).map(Int).ok_or(EvalError::Overflow),
                _ => {
                    let divisor = rhs.as_f64();
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    let dividend = lhs.as_f64();
                    Ok(Float(dividend - divisor * (dividend / divisor).floor()))
                }
            },
            BinaryOp::Pow => self.power(lhs, rhs),
        }
    }

    fn power(&self, base: Value, exponent: Value) -> Result<Value, EvalError> {
        use Value::{Float, Int};

        if let (Int(b), Int(e)) = (base, exponent) {
            if e >= 0 {
                let e = u32::try_from(e).map_err(|_| EvalError::Overflow)?;
                return b.checked_pow(e).map(Int).ok_or(EvalError::Overflow);
            }
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            // Negative integer exponent: fall through to floating point.
        }

        let b = base.as_f64();
        let e = exponent.as_f64();

        if b < 0.0 && e.fract() != 0.0 {
            return Err(EvalError::InvalidOperation(
                "a negative base with a fractional exponent".to_string(),
            ));
        }
        if b == 0.0 && e < 0.0 {
            return Err(EvalError::DivisionByZero);
        }

        Ok(Float(b.powf(e)))
    }

    /// Reject values beyond the configured magnitude bound
    fn check(&self, value: Value) -> Result<Value, EvalError> {
        let magnitude = value.as_f64();
        if !magnitude.is_finite() || magnitude.abs() > self.overflow_bound {
            return Err(EvalError::Overflow);
        }
        Ok(value)
    }
}

/// Floor division for integers: quotient rounded toward negative infinity
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

/// Floor modulo for integers: remainder takes the divisor's sign
fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        // r and b have opposite signs here, so the sum cannot overflow.
        Some(r + b)
    } else {
        Some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Result<Value, EvalError> {
        Evaluator::default().evaluate(input)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), Value::Int(14));
    }

    #[test]
    fn test_floor_division() {
        assert_eq!(eval("7 // 2").unwrap(), Value::Int(3));
        assert_eq!(eval("-7 // 2").unwrap(), Value::Int(-4));
        assert_eq!(eval("7 // -2").unwrap(), Value::Int(-4));
        assert_eq!(eval("7.5 // 2").unwrap(), Value::Float(3.0));
    }

    #[test]
    fn test_modulo_takes_divisor_sign() {
        assert_eq!(eval("7 % 3").unwrap(), Value::Int(1));
        assert_eq!(eval("-7 % 3").unwrap(), Value::Int(2));
        assert_eq!(eval("7 % -3").unwrap(), Value::Int(-2));
    }

    #[test]
    fn test_exponentiation() {
        assert_eq!(eval("2 ** 10").unwrap(), Value::Int(1024));
        // Right-associative: 2 ** (3 ** 2) = 512
        assert_eq!(eval("2 ** 3 ** 2").unwrap(), Value::Int(512));
    }

    #[test]
    fn test_negative_exponent_promotes_to_float() {
        assert_eq!(eval("2 ** -1").unwrap(), Value::Float(0.5));
    }

    #[test]
    fn test_unary_minus_binds_looser_than_pow() {
        assert_eq!(eval("-2 ** 2").unwrap(), Value::Int(-4));
        assert_eq!(eval("(-2) ** 2").unwrap(), Value::Int(4));
    }

    #[test]
    fn test_true_division_is_float() {
        assert_eq!(eval("1 / 2").unwrap(), Value::Float(0.5));
        assert_eq!(eval("10 / 5").unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("10 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("10 // 0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("10 % 0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("10 / 0.0"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_zero_to_negative_power() {
        assert_eq!(eval("0 ** -1"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_negative_base_fractional_exponent() {
        assert!(matches!(
            eval("(0 - 2) ** 0.5"),
            Err(EvalError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_nested_exponentiation_overflows() {
        assert_eq!(eval("9 ** 9 ** 9"), Err(EvalError::Overflow));
    }

    #[test]
    fn test_integer_overflow() {
        assert_eq!(
            eval("9223372036854775807 + 1"),
            Err(EvalError::Overflow)
        );
    }

    #[test]
    fn test_magnitude_bound() {
        // Within i64 but beyond the default 1e15 bound.
        assert_eq!(eval("1000000000 * 10000000"), Err(EvalError::Overflow));
    }

    #[test]
    fn test_length_limit() {
        let long = "1+".repeat(200) + "1";
        assert!(matches!(eval(&long), Err(EvalError::TooComplex(_))));
    }

    #[test]
    fn test_length_limit_checked_before_tokenizing() {
        // Invalid characters past the length bound must still report
        // TooComplex, proving the gate runs first.
        let long = format!("{}@", "1".repeat(300));
        assert!(matches!(eval(&long), Err(EvalError::TooComplex(_))));
    }

    #[test]
    fn test_empty_expression() {
        assert!(matches!(eval(""), Err(EvalError::Syntax(_))));
        assert!(matches!(eval("   "), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_invalid_token_surface() {
        assert!(matches!(
            eval("2; DROP TABLE"),
            Err(EvalError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_parenthesized_arithmetic() {
        assert_eq!(eval("(2 + 3) * (4 - 1)").unwrap(), Value::Int(15));
    }

    #[test]
    fn test_float_arithmetic() {
        assert_eq!(eval("0.1 + 0.2").unwrap(), Value::Float(0.1 + 0.2));
        assert_eq!(eval("1.5 * 2").unwrap(), Value::Float(3.0));
    }

    #[test]
    fn test_value_display_collapses_integral_floats() {
        assert_eq!(Value::Float(2.0).to_string(), "2");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Int(-4).to_string(), "-4");
    }

    #[test]
    fn test_custom_limits() {
        let config = EvaluatorConfig {
            max_expression_length: 5,
            max_depth: 32,
            overflow_bound: 1e15,
        };
        let evaluator = Evaluator::new(&config);
        assert!(matches!(
            evaluator.evaluate("1 + 2 + 3"),
            Err(EvalError::TooComplex(_))
        ));
        assert_eq!(evaluator.evaluate("1 + 2").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_floor_div_helper_edge_cases() {
        assert_eq!(floor_div(i64::MIN, -1), None);
        assert_eq!(floor_div(-9, 3), Some(-3));
        assert_eq!(floor_div(-10, 3), Some(-4));
    }

    #[test]
    fn test_errors_are_user_presentable() {
        // Every variant's Display is shown verbatim to the user.
        let messages = [
            eval("10 / 0").unwrap_err().to_string(),
            eval("2 +").unwrap_err().to_string(),
            eval("2 $ 2").unwrap_err().to_string(),
        ];
        for message in messages {
            assert!(!message.contains("panic"));
            assert!(!message.is_empty());
        }
    }
}
