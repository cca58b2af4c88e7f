//! Sandboxed expression evaluation.
//!
//! Names resolve only against [`SYMBOLS`]. There is no fallback scope, so an
//! expression can compute a number and nothing else.

use std::f64::consts::{E, PI};

use serde::Serialize;
use tracing::debug;

use super::operations::{self, AngleUnit, LogBase};
use super::parser::{BinaryOp, Expr, parse};
use crate::error::EvaluationError;

/// Number of arguments a function accepts.
#[derive(Clone, Copy, Debug)]
enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exactly(k) => n == k,
            Self::Between(lo, hi) => (lo..=hi).contains(&n),
            Self::AtLeast(k) => n >= k,
            Self::Any => true,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Exactly(1) => "exactly 1",
            Self::Exactly(2) => "exactly 2",
            Self::Between(1, 2) => "1 or 2",
            Self::AtLeast(1) => "at least 1",
            _ => "any number of",
        }
    }
}

type Builtin = fn(&[f64]) -> Result<f64, EvaluationError>;

#[derive(Clone, Copy)]
enum Symbol {
    Constant(f64),
    Function(Arity, Builtin),
}

/// Every name an expression may refer to.
const SYMBOLS: &[(&str, Symbol)] = &[
    ("pi", Symbol::Constant(PI)),
    ("e", Symbol::Constant(E)),
    ("abs", Symbol::Function(Arity::Exactly(1), builtin_abs)),
    ("round", Symbol::Function(Arity::Between(1, 2), builtin_round)),
    ("min", Symbol::Function(Arity::AtLeast(1), builtin_min)),
    ("max", Symbol::Function(Arity::AtLeast(1), builtin_max)),
    ("sum", Symbol::Function(Arity::Any, builtin_sum)),
    ("pow", Symbol::Function(Arity::Exactly(2), builtin_pow)),
    ("sqrt", Symbol::Function(Arity::Exactly(1), builtin_sqrt)),
    ("sin", Symbol::Function(Arity::Exactly(1), builtin_sin)),
    ("cos", Symbol::Function(Arity::Exactly(1), builtin_cos)),
    ("tan", Symbol::Function(Arity::Exactly(1), builtin_tan)),
    ("log", Symbol::Function(Arity::Between(1, 2), builtin_log)),
    ("log10", Symbol::Function(Arity::Exactly(1), builtin_log10)),
    ("exp", Symbol::Function(Arity::Exactly(1), builtin_exp)),
    ("factorial", Symbol::Function(Arity::Exactly(1), builtin_factorial)),
    ("degrees", Symbol::Function(Arity::Exactly(1), builtin_degrees)),
    ("radians", Symbol::Function(Arity::Exactly(1), builtin_radians)),
];

fn lookup(name: &str) -> Option<Symbol> {
    SYMBOLS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, symbol)| *symbol)
}

/// Names of every function an expression may call.
pub fn function_names() -> impl Iterator<Item = &'static str> {
    SYMBOLS
        .iter()
        .filter(|(_, symbol)| matches!(symbol, Symbol::Function(..)))
        .map(|(name, _)| *name)
}

/// A successfully evaluated expression.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    /// The expression text, trimmed.
    pub expression: String,
    /// The numeric value.
    pub result: f64,
}

/// Evaluate a mathematical expression.
pub fn evaluate_expression(input: &str) -> Result<Evaluation, EvaluationError> {
    let expression = input.trim().to_string();
    let tree = parse(&expression)?;
    let result = eval(&tree)?;
    debug!(%expression, result, "evaluated expression");
    Ok(Evaluation { expression, result })
}

fn eval(expr: &Expr) -> Result<f64, EvaluationError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Name(name) => match lookup(name) {
            Some(Symbol::Constant(value)) => Ok(value),
            Some(Symbol::Function(..)) => Err(EvaluationError::MissingCall(name.clone())),
            None => Err(EvaluationError::UnknownIdentifier(name.clone())),
        },
        Expr::Negate(inner) => Ok(-eval(inner)?),
        Expr::Power(base, exponent) => checked_pow(eval(base)?, eval(exponent)?),
        Expr::Chain(first, rest) => rest
            .iter()
            .try_fold(eval(first)?, |acc, (op, operand)| {
                apply_binary(*op, acc, eval(operand)?)
            }),
        Expr::Call(name, args) => match lookup(name) {
            Some(Symbol::Function(arity, builtin)) => {
                if !arity.accepts(args.len()) {
                    return Err(EvaluationError::Arity {
                        name: name.clone(),
                        expected: arity.describe(),
                        found: args.len(),
                    });
                }
                let values = args.iter().map(eval).collect::<Result<Vec<_>, _>>()?;
                builtin(&values)
            }
            Some(Symbol::Constant(_)) => Err(EvaluationError::NotCallable(name.clone())),
            None => Err(EvaluationError::UnknownIdentifier(name.clone())),
        },
    }
}

fn apply_binary(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
    match op {
        BinaryOp::Add => Ok(operations::add(lhs, rhs)),
        BinaryOp::Sub => Ok(operations::subtract(lhs, rhs)),
        BinaryOp::Mul => Ok(operations::multiply(lhs, rhs)),
        BinaryOp::Div => {
            operations::divide(lhs, rhs).map_err(|_| EvaluationError::DivisionByZero)
        }
    }
}

/// Zero raised to a negative power is a division by zero, not infinity.
fn checked_pow(base: f64, exponent: f64) -> Result<f64, EvaluationError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvaluationError::DivisionByZero);
    }
    Ok(operations::power(base, exponent))
}

fn builtin_abs(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(args[0].abs())
}

/// Round half to even, optionally to a number of decimal places.
fn builtin_round(args: &[f64]) -> Result<f64, EvaluationError> {
    let x = args[0];
    let Some(&digits) = args.get(1) else {
        return Ok(x.round_ties_even());
    };
    if digits.fract() != 0.0 || !digits.is_finite() {
        return Err(EvaluationError::InvalidArgument {
            name: "round".to_string(),
            reason: "digit count must be an integer",
        });
    }
    if !x.is_finite() {
        return Ok(x);
    }
    // Beyond these the factor itself overflows to infinity.
    if digits > f64::MAX_10_EXP as f64 {
        return Ok(x);
    }
    if digits < -(f64::MAX_10_EXP as f64) {
        return Ok(0.0_f64.copysign(x));
    }

    let digits = digits as i32;
    if digits >= 0 {
        let factor = 10f64.powi(digits);
        let scaled = x * factor;
        if !scaled.is_finite() {
            // Too large to carry that many decimals, so already exact.
            return Ok(x);
        }
        Ok(scaled.round_ties_even() / factor)
    } else {
        let factor = 10f64.powi(-digits);
        Ok(((x / factor).round_ties_even() * factor).copysign(x))
    }
}

fn builtin_min(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(args.iter().copied().fold(f64::INFINITY, f64::min))
}

fn builtin_max(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

fn builtin_sum(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(args.iter().sum())
}

fn builtin_pow(args: &[f64]) -> Result<f64, EvaluationError> {
    checked_pow(args[0], args[1])
}

fn builtin_sqrt(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(operations::square_root(args[0])?)
}

fn builtin_sin(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(operations::sin(args[0], AngleUnit::Radians))
}

fn builtin_cos(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(operations::cos(args[0], AngleUnit::Radians))
}

fn builtin_tan(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(operations::tan(args[0], AngleUnit::Radians))
}

/// `log(x)` is the natural log; `log(x, base)` uses the given base.
fn builtin_log(args: &[f64]) -> Result<f64, EvaluationError> {
    let base = match args.get(1) {
        Some(&b) => LogBase::Custom(b),
        None => LogBase::Natural,
    };
    Ok(operations::logarithm(args[0], base)?)
}

fn builtin_log10(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(operations::logarithm(args[0], LogBase::Ten)?)
}

fn builtin_exp(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(args[0].exp())
}

fn builtin_factorial(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(operations::factorial(args[0])?)
}

fn builtin_degrees(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(operations::degrees(args[0]))
}

fn builtin_radians(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(operations::radians(args[0]))
}
