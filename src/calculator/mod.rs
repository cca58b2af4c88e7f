//! Calculator core.
//!
//! This module provides:
//! - Arithmetic and scientific operations with domain checks
//! - A memory register and a calculation history
//! - Sandboxed evaluation of expression strings
//! - Detection of input that looks like an expression

mod detection;
mod evaluation;
mod format;
mod history;
mod memory;
mod operations;
mod parser;
mod session;

pub use detection::looks_like_expression;
pub use evaluation::{Evaluation, evaluate_expression, function_names};
pub use format::{NumberFormat, format_number};
pub use history::{DEFAULT_HISTORY_WINDOW, EMPTY_HISTORY_MESSAGE, History, HistoryEntry};
pub use memory::Memory;
pub use operations::{
    AngleUnit, LogBase, Operation, add, cos, degrees, divide, factorial, logarithm, multiply,
    natural_log, percentage, power, radians, sin, square, square_root, subtract, tan,
};
pub use session::Calculator;
