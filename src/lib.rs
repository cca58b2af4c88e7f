//! Scientific calculator core with a text menu and a keypad front-end.
//!
//! The [`calculator`] module holds everything that computes: operations,
//! memory, history and the sandboxed expression evaluator. [`ui`] drives a
//! [`calculator::Calculator`] session from user input.

pub mod calculator;
pub mod config;
pub mod error;
pub mod ui;

pub use calculator::{Calculator, evaluate_expression};
pub use error::{CalcError, DomainError, EvaluationError, InputFormatError};
