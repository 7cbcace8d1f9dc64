//! Recursive descent parser for arithmetic expressions
//!
//! Builds an [`Expr`] tree from the token stream with standard precedence:
//! exponentiation binds tightest and is right-associative, then the
//! multiplicative group (`* / % //`), then the additive group (`+ -`), all
//! left-associative. A unary sign binds looser than `**` on its left
//! (`-2 ** 2` is `-(2 ** 2)`) but is permitted in the exponent (`2 ** -1`).
//!
//! Recursion depth is capped so that a pathological input cannot blow the
//! stack; exceeding the cap fails with [`EvalError::TooComplex`].

use super::token::Token;
use super::{EvalError, Value};

/// Binary operator node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (true division, always fractional)
    Div,
    /// `//` (floor division)
    FloorDiv,
    /// `%` (floor modulo, remainder takes the divisor's sign)
    Mod,
    /// `**`
    Pow,
}

/// Unary operator node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Pos,
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Literal(Value),
    /// Unary operation over a subtree
    Unary {
        /// Operator kind
        op: UnaryOp,
        /// Operand subtree
        operand: Box<Expr>,
    },
    /// Binary operation over two subtrees
    Binary {
        /// Operator kind
        op: BinaryOp,
        /// Left operand subtree
        lhs: Box<Expr>,
        /// Right operand subtree
        rhs: Box<Expr>,
    },
}

/// Parse a token stream into an expression tree
///
/// # Arguments
///
/// * `tokens` - Tokens in source order, as produced by the tokenizer
/// * `max_depth` - Maximum nesting depth before rejecting the input
///
/// # Errors
///
/// Returns [`EvalError::Syntax`] for dangling operators, unbalanced
/// parentheses, or trailing tokens, and [`EvalError::TooComplex`] when the
/// tree would nest deeper than `max_depth`.
pub fn parse(tokens: &[Token], max_depth: usize) -> Result<Expr, EvalError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };

    let expr = parser.additive()?;
    if let Some(token) = parser.peek() {
        return Err(EvalError::Syntax(format!(
            "unexpected token {:?} after expression",
            token
        )));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(EvalError::TooComplex(format!(
                "nesting depth exceeds {}",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// additive := multiplicative (("+" | "-") multiplicative)*
    fn additive(&mut self) -> Result<Expr, EvalError> {
        self.enter()?;
        let mut lhs = self.multiplicative()?;

        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinaryOp::Add),
            Some(Token::Minus) => Some(BinaryOp::Sub),
            _ => None,
        } {
            self.advance();
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        self.leave();
        Ok(lhs)
    }

    /// multiplicative := factor (("*" | "/" | "//" | "%") factor)*
    fn multiplicative(&mut self) -> Result<Expr, EvalError> {
        self.enter()?;
        let mut lhs = self.factor()?;

        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinaryOp::Mul),
            Some(Token::Slash) => Some(BinaryOp::Div),
            Some(Token::SlashSlash) => Some(BinaryOp::FloorDiv),
            Some(Token::Percent) => Some(BinaryOp::Mod),
            _ => None,
        } {
            self.advance();
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        self.leave();
        Ok(lhs)
    }

    /// factor := ("+" | "-") factor | power
    fn factor(&mut self) -> Result<Expr, EvalError> {
        self.enter()?;
        let expr = match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(self.factor()?),
                }
            }
            Some(Token::Plus) => {
                self.advance();
                Expr::Unary {
                    op: UnaryOp::Pos,
                    operand: Box::new(self.factor()?),
                }
            }
            _ => self.power()?,
        };
        self.leave();
        Ok(expr)
    }

    /// power := atom ("**" factor)?
    ///
    /// The right operand is a `factor`, which makes `**` right-associative
    /// and allows a signed exponent.
    fn power(&mut self) -> Result<Expr, EvalError> {
        self.enter()?;
        let base = self.atom()?;

        let expr = if self.peek() == Some(&Token::StarStar) {
            self.advance();
            let exponent = self.factor()?;
            Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            }
        } else {
            base
        };

        self.leave();
        Ok(expr)
    }

    /// atom := NUMBER | "(" additive ")"
    fn atom(&mut self) -> Result<Expr, EvalError> {
        self.enter()?;
        let expr = match self.advance() {
            Some(Token::Number(value)) => Expr::Literal(value),
            Some(Token::LParen) => {
                let inner = self.additive()?;
                match self.advance() {
                    Some(Token::RParen) => inner,
                    Some(token) => {
                        return Err(EvalError::Syntax(format!(
                            "expected ')' but found {:?}",
                            token
                        )))
                    }
                    None => return Err(EvalError::Syntax("unbalanced parentheses".to_string())),
                }
            }
            Some(token) => {
                return Err(EvalError::Syntax(format!(
                    "unexpected token {:?}",
                    token
                )))
            }
            None => return Err(EvalError::Syntax("unexpected end of expression".to_string())),
        };
        self.leave();
        Ok(expr)
    }
}
