//! Arithmetic and scientific operations.
//!
//! Every function here is pure. Functions with a restricted domain return
//! `Result<f64, DomainError>`; the rest return the platform's float result,
//! infinities and NaN included.

use std::f64::consts::E;
use std::fmt;

use super::format::NumberFormat;
use crate::error::DomainError;

/// Largest `n` whose factorial is finite in an `f64`.
const MAX_FINITE_FACTORIAL: f64 = 170.0;

/// Unit of the angle passed to a trigonometric function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Convert an angle in this unit to radians.
    pub fn to_radians(self, x: f64) -> f64 {
        match self {
            Self::Radians => x,
            Self::Degrees => x.to_radians(),
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Radians => "rad",
            Self::Degrees => "°",
        }
    }
}

/// Base of a logarithm.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LogBase {
    #[default]
    Ten,
    Natural,
    Custom(f64),
}

impl From<f64> for LogBase {
    fn from(base: f64) -> Self {
        if base == 10.0 {
            Self::Ten
        } else if base == E {
            Self::Natural
        } else {
            Self::Custom(base)
        }
    }
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

pub fn divide(a: f64, b: f64) -> Result<f64, DomainError> {
    if b == 0.0 {
        return Err(DomainError::DivisionByZero);
    }
    Ok(a / b)
}

pub fn power(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

pub fn square(x: f64) -> f64 {
    x * x
}

pub fn square_root(x: f64) -> Result<f64, DomainError> {
    if x < 0.0 {
        return Err(DomainError::NegativeSquareRoot);
    }
    Ok(x.sqrt())
}

/// Logarithm of `x` in the given base.
pub fn logarithm(x: f64, base: LogBase) -> Result<f64, DomainError> {
    if x <= 0.0 || x.is_nan() {
        return Err(DomainError::NonPositiveLogarithm);
    }
    match base {
        LogBase::Ten => Ok(x.log10()),
        LogBase::Natural => natural_log(x),
        LogBase::Custom(b) if b == 10.0 => Ok(x.log10()),
        LogBase::Custom(b) if b == E => natural_log(x),
        LogBase::Custom(b) => {
            if b <= 0.0 || b == 1.0 || b.is_nan() {
                return Err(DomainError::InvalidLogBase(b));
            }
            Ok(x.ln() / b.ln())
        }
    }
}

pub fn natural_log(x: f64) -> Result<f64, DomainError> {
    if x <= 0.0 || x.is_nan() {
        return Err(DomainError::NonPositiveLogarithm);
    }
    Ok(x.ln())
}

pub fn sin(x: f64, unit: AngleUnit) -> f64 {
    unit.to_radians(x).sin()
}

pub fn cos(x: f64, unit: AngleUnit) -> f64 {
    unit.to_radians(x).cos()
}

pub fn tan(x: f64, unit: AngleUnit) -> f64 {
    unit.to_radians(x).tan()
}

/// `n!` for a non-negative integral `n`. Overflows to infinity past 170.
pub fn factorial(n: f64) -> Result<f64, DomainError> {
    if n < 0.0 {
        return Err(DomainError::NegativeFactorial);
    }
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(DomainError::NonIntegerFactorial);
    }
    if n > MAX_FINITE_FACTORIAL {
        return Ok(f64::INFINITY);
    }
    Ok((2..=n as u64).fold(1.0, |acc, k| acc * k as f64))
}

pub fn percentage(value: f64, percent: f64) -> f64 {
    (value * percent) / 100.0
}

pub fn degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

pub fn radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// A single operation together with its operands.
///
/// `Display` renders the history description with default number formatting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operation {
    Add(f64, f64),
    Subtract(f64, f64),
    Multiply(f64, f64),
    Divide(f64, f64),
    Power(f64, f64),
    Square(f64),
    SquareRoot(f64),
    Logarithm(f64, LogBase),
    NaturalLog(f64),
    Sin(f64, AngleUnit),
    Cos(f64, AngleUnit),
    Tan(f64, AngleUnit),
    Factorial(f64),
    Percentage { value: f64, percent: f64 },
}

impl Operation {
    /// Compute the result of this operation.
    pub fn compute(&self) -> Result<f64, DomainError> {
        match *self {
            Self::Add(a, b) => Ok(add(a, b)),
            Self::Subtract(a, b) => Ok(subtract(a, b)),
            Self::Multiply(a, b) => Ok(multiply(a, b)),
            Self::Divide(a, b) => divide(a, b),
            Self::Power(a, b) => Ok(power(a, b)),
            Self::Square(x) => Ok(square(x)),
            Self::SquareRoot(x) => square_root(x),
            Self::Logarithm(x, base) => logarithm(x, base),
            Self::NaturalLog(x) => natural_log(x),
            Self::Sin(x, unit) => Ok(sin(x, unit)),
            Self::Cos(x, unit) => Ok(cos(x, unit)),
            Self::Tan(x, unit) => Ok(tan(x, unit)),
            Self::Factorial(n) => factorial(n),
            Self::Percentage { value, percent } => Ok(percentage(value, percent)),
        }
    }
}

impl Operation {
    /// History description with operands rendered by `format`.
    pub fn describe(&self, format: &NumberFormat) -> String {
        let n = |v: f64| format.format(v);
        match *self {
            Self::Add(a, b) => format!("{} + {}", n(a), n(b)),
            Self::Subtract(a, b) => format!("{} - {}", n(a), n(b)),
            Self::Multiply(a, b) => format!("{} * {}", n(a), n(b)),
            Self::Divide(a, b) => format!("{} / {}", n(a), n(b)),
            Self::Power(a, b) => format!("{} ^ {}", n(a), n(b)),
            Self::Square(x) => format!("{}²", n(x)),
            Self::SquareRoot(x) => format!("√{}", n(x)),
            Self::Logarithm(x, LogBase::Ten) => format!("log({})", n(x)),
            Self::Logarithm(x, LogBase::Natural) | Self::NaturalLog(x) => format!("ln({})", n(x)),
            Self::Logarithm(x, LogBase::Custom(b)) => format!("log_{}({})", n(b), n(x)),
            Self::Sin(x, unit) => format!("sin({}{})", n(x), unit.suffix()),
            Self::Cos(x, unit) => format!("cos({}{})", n(x), unit.suffix()),
            Self::Tan(x, unit) => format!("tan({}{})", n(x), unit.suffix()),
            Self::Factorial(x) => format!("{}!", n(x)),
            Self::Percentage { value, percent } => format!("{}% of {}", n(percent), n(value)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(&NumberFormat::default()))
    }
}
