//! Error types shared by the calculator core and its front-ends.

use thiserror::Error;

/// An operation was asked to work outside its mathematical domain.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Cannot divide by zero")]
    DivisionByZero,
    #[error("Cannot take square root of negative number")]
    NegativeSquareRoot,
    #[error("Logarithm undefined for non-positive numbers")]
    NonPositiveLogarithm,
    #[error("Invalid logarithm base {0}")]
    InvalidLogBase(f64),
    #[error("Factorial undefined for negative numbers")]
    NegativeFactorial,
    #[error("Factorial only defined for integers")]
    NonIntegerFactorial,
}

/// An expression could not be parsed or evaluated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },
    #[error("malformed number '{0}'")]
    MalformedNumber(String),
    #[error("unexpected {found} at position {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("name '{0}' is not defined")]
    UnknownIdentifier(String),
    #[error("'{0}' is a constant and cannot be called")]
    NotCallable(String),
    #[error("'{0}' is a function and must be called with arguments")]
    MissingCall(String),
    #[error("{name}() takes {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: &'static str,
        found: usize,
    },
    #[error("{name}() {reason}")]
    InvalidArgument { name: String, reason: &'static str },
    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// User-supplied text is not a number.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("'{0}' is not a valid number")]
pub struct InputFormatError(pub String);

/// Any failure a calculator interaction can report.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CalcError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Invalid expression: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    InputFormat(#[from] InputFormatError),
}

/// Parse user text into a number, trimming surrounding whitespace.
pub fn parse_number(text: &str) -> Result<f64, InputFormatError> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| InputFormatError(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42.5 "), Ok(42.5));
        assert_eq!(parse_number("-3"), Ok(-3.0));
        assert_eq!(
            parse_number("abc"),
            Err(InputFormatError("abc".to_string()))
        );
        assert!(parse_number("").is_err());
    }

    #[test]
    fn test_messages() {
        let err: CalcError = DomainError::DivisionByZero.into();
        assert_eq!(err.to_string(), "Cannot divide by zero");

        let err: CalcError = EvaluationError::UnknownIdentifier("os".into()).into();
        assert_eq!(err.to_string(), "Invalid expression: name 'os' is not defined");

        let err: CalcError = EvaluationError::from(DomainError::NegativeSquareRoot).into();
        assert_eq!(
            err.to_string(),
            "Invalid expression: Cannot take square root of negative number"
        );
    }
}
