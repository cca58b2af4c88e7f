//! A calculator session: one memory register and one history log.

use tracing::{debug, warn};

use super::evaluation::{Evaluation, evaluate_expression};
use super::format::NumberFormat;
use super::history::{DEFAULT_HISTORY_WINDOW, History};
use super::memory::Memory;
use super::operations::Operation;
use crate::error::{DomainError, EvaluationError};

/// Calculator state shared by every front-end.
///
/// Successful operations and evaluations are recorded in the history;
/// failures leave it untouched.
#[derive(Clone, Debug)]
pub struct Calculator {
    memory: Memory,
    history: History,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl Calculator {
    /// Create a session whose history views show `history_window` entries.
    pub fn new(history_window: usize) -> Self {
        Self::with_format(history_window, NumberFormat::default())
    }

    /// Like [`Calculator::new`], with history descriptions and views rendered
    /// by `format`.
    pub fn with_format(history_window: usize, format: NumberFormat) -> Self {
        Self {
            memory: Memory::new(),
            history: History::with_format(history_window, format),
        }
    }

    /// Compute an operation and record it.
    pub fn apply(&mut self, operation: Operation) -> Result<f64, DomainError> {
        match operation.compute() {
            Ok(result) => {
                debug!(%operation, result, "applied operation");
                let description = operation.describe(self.history.format());
                self.history.record(description, result);
                Ok(result)
            }
            Err(e) => {
                warn!(%operation, error = %e, "operation rejected");
                Err(e)
            }
        }
    }

    /// Evaluate an expression and record it.
    pub fn evaluate(&mut self, expression: &str) -> Result<Evaluation, EvaluationError> {
        match evaluate_expression(expression) {
            Ok(evaluation) => {
                self.history
                    .record(evaluation.expression.clone(), evaluation.result);
                Ok(evaluation)
            }
            Err(e) => {
                warn!(expression = expression.trim(), error = %e, "expression rejected");
                Err(e)
            }
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Clear memory and history.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::history::EMPTY_HISTORY_MESSAGE;
    use crate::calculator::operations::{AngleUnit, LogBase};

    #[test]
    fn test_apply_records_success() {
        let mut calc = Calculator::default();
        assert_eq!(calc.apply(Operation::Add(2.0, 3.0)), Ok(5.0));
        assert_eq!(calc.apply(Operation::Logarithm(8.0, LogBase::Custom(2.0))).map(f64::round), Ok(3.0));
        assert_eq!(calc.history().len(), 2);
        assert_eq!(calc.history().entries()[0].to_string(), "2 + 3 = 5");
    }

    #[test]
    fn test_apply_failure_is_not_recorded() {
        let mut calc = Calculator::default();
        assert_eq!(
            calc.apply(Operation::Divide(1.0, 0.0)),
            Err(DomainError::DivisionByZero)
        );
        assert_eq!(
            calc.apply(Operation::SquareRoot(-4.0)),
            Err(DomainError::NegativeSquareRoot)
        );
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_evaluate_records_expression_text() {
        let mut calc = Calculator::default();
        let evaluation = calc.evaluate(" sqrt(16) + 1 ").unwrap();
        assert_eq!(evaluation.result, 5.0);
        assert_eq!(calc.history().show(), "sqrt(16) + 1 = 5");

        assert!(calc.evaluate("import os").is_err());
        assert_eq!(calc.history().len(), 1);
    }

    #[test]
    fn test_memory_is_independent_of_history() {
        let mut calc = Calculator::default();
        calc.memory_mut().store(12.0);
        calc.apply(Operation::Sin(0.0, AngleUnit::Degrees)).unwrap();
        assert_eq!(calc.memory().recall(), 12.0);
        calc.memory_mut().clear();
        assert_eq!(calc.memory().recall(), 0.0);
        assert_eq!(calc.history().len(), 1);
    }

    #[test]
    fn test_history_follows_number_format() {
        let format = NumberFormat {
            precision: 2,
            thousands_separator: false,
        };
        let mut calc = Calculator::with_format(10, format);
        calc.apply(Operation::Divide(1.0, 3.0)).unwrap();
        calc.apply(Operation::Add(0.256, 1.0)).unwrap();
        assert_eq!(calc.history().show(), "1 / 3 = 0.33\n0.26 + 1 = 1.26");
    }

    #[test]
    fn test_reset() {
        let mut calc = Calculator::new(3);
        calc.memory_mut().store(1.0);
        calc.evaluate("1 + 1").unwrap();
        calc.reset();
        assert_eq!(calc.memory().recall(), 0.0);
        assert_eq!(calc.history().show(), EMPTY_HISTORY_MESSAGE);
        assert_eq!(calc.history().window(), 3);
    }
}
