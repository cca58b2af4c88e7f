//! Tokenizer and recursive-descent parser for calculator expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := NUMBER | IDENT | IDENT '(' args? ')' | '(' expr ')'
//! args    := expr (',' expr)*
//! ```
//!
//! The parser only builds a tree. Names are resolved later against a closed
//! symbol table, so nothing here can reach outside the expression.
//!
//! Runs of `+ -` and `* /` are kept flat in [`Expr::Chain`] rather than as a
//! left-leaning tree, so the tree is only as deep as the parentheses, signs
//! and powers that [`MAX_NESTING`] bounds, however many operands there are.

use std::fmt;

use crate::error::EvaluationError;

/// Deepest nesting of parentheses, unary signs and powers accepted by the parser.
pub(crate) const MAX_NESTING: usize = 200;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {}", n),
            Self::Ident(name) => write!(f, "name '{}'", name),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::Caret => f.write_str("'^'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
        }
    }
}

/// Left-associative operators that can appear in a [`Expr::Chain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed expression tree.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    Name(String),
    Negate(Box<Expr>),
    /// `base ^ exponent`
    Power(Box<Expr>, Box<Expr>),
    /// A first operand followed by operator/operand pairs, applied left to right.
    Chain(Box<Expr>, Vec<(BinaryOp, Expr)>),
    Call(String, Vec<Expr>),
}

/// Split the input into tokens paired with their character offsets.
pub(crate) fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, EvaluationError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        let start = pos;

        let token = match c {
            c if c.is_whitespace() => {
                pos += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let text = read_number(&chars, &mut pos);
                let value = text
                    .parse::<f64>()
                    .map_err(|_| EvaluationError::MalformedNumber(text.clone()))?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_')
                {
                    pos += 1;
                }
                let name: String = chars[start..pos].iter().collect();
                tokens.push((Token::Ident(name), start));
                continue;
            }
            'π' => Token::Ident("pi".to_string()),
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(pos + 1) == Some(&'*') => {
                pos += 1;
                Token::Caret
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            other => {
                return Err(EvaluationError::UnexpectedCharacter {
                    ch: other,
                    position: start,
                });
            }
        };

        pos += 1;
        tokens.push((token, start));
    }

    Ok(tokens)
}

/// Read a decimal numeral with an optional exponent, advancing `pos`.
fn read_number(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && (chars[*pos].is_ascii_digit() || chars[*pos] == '.') {
        *pos += 1;
    }

    // Only treat 'e' as an exponent marker when digits follow it.
    if matches!(chars.get(*pos), Some('e' | 'E')) {
        let mut look = *pos + 1;
        if matches!(chars.get(look), Some('+' | '-')) {
            look += 1;
        }
        if chars.get(look).is_some_and(char::is_ascii_digit) {
            *pos = look;
            while *pos < chars.len() && chars[*pos].is_ascii_digit() {
                *pos += 1;
            }
        }
    }

    chars[start..*pos].iter().collect()
}

/// Parse an expression string into a tree.
pub(crate) fn parse(input: &str) -> Result<Expr, EvaluationError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvaluationError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some((token, position)) => Err(EvaluationError::UnexpectedToken {
            found: token.to_string(),
            position: *position,
        }),
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self) -> EvaluationError {
        match self.tokens.get(self.pos) {
            Some((token, position)) => EvaluationError::UnexpectedToken {
                found: token.to_string(),
                position: *position,
            },
            None => EvaluationError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), EvaluationError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn descend(&mut self) -> Result<(), EvaluationError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(EvaluationError::TooDeep(MAX_NESTING));
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<Expr, EvaluationError> {
        self.descend()?;
        let first = self.parse_term()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.parse_term()?));
        }
        self.depth -= 1;
        Ok(chain(first, rest))
    }

    fn parse_term(&mut self) -> Result<Expr, EvaluationError> {
        let first = self.parse_unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.parse_unary()?));
        }
        Ok(chain(first, rest))
    }

    fn parse_unary(&mut self) -> Result<Expr, EvaluationError> {
        self.descend()?;
        let expr = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Expr::Negate(Box::new(self.parse_unary()?))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()?
            }
            _ => self.parse_power()?,
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn parse_power(&mut self) -> Result<Expr, EvaluationError> {
        let base = self.parse_primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            // right-associative, and the exponent may carry its own sign
            let exponent = self.parse_unary()?;
            return Ok(Expr::Power(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, EvaluationError> {
        let Some(token) = self.peek().cloned() else {
            return Err(EvaluationError::UnexpectedEnd);
        };

        match token {
            Token::Number(value) => {
                self.pos += 1;
                Ok(Expr::Number(value))
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => {
                self.pos += 1;
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let args = self.parse_args()?;
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Name(name))
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Arguments after an opening parenthesis, consuming the closing one.
    fn parse_args(&mut self) -> Result<Vec<Expr>, EvaluationError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(_) => {
                    self.pos -= 1;
                    return Err(self.unexpected());
                }
                None => return Err(EvaluationError::UnexpectedEnd),
            }
        }
    }
}

fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    if rest.is_empty() {
        first
    } else {
        Expr::Chain(Box::new(first), rest)
    }
}
