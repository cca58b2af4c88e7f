//! Button-driven calculator.
//!
//! Models a desk calculator keypad: a single-line display, one pending binary
//! operator with immediate execution, scientific function keys working on the
//! displayed value (trig in degrees), constants, memory keys and a history
//! view. Rendering is left to whatever drives it.

use std::f64::consts::{E, PI};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::calculator::{AngleUnit, Calculator, LogBase, Operation};
use crate::error::{CalcError, parse_number};

/// Binary operator waiting for its right-hand operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl PendingOp {
    fn operation(self, lhs: f64, rhs: f64) -> Operation {
        match self {
            Self::Add => Operation::Add(lhs, rhs),
            Self::Subtract => Operation::Subtract(lhs, rhs),
            Self::Multiply => Operation::Multiply(lhs, rhs),
            Self::Divide => Operation::Divide(lhs, rhs),
            Self::Power => Operation::Power(lhs, rhs),
        }
    }
}

/// Function key applied to the displayed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKey {
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
    Sqrt,
    Square,
}

impl FunctionKey {
    fn operation(self, x: f64) -> Operation {
        match self {
            Self::Sin => Operation::Sin(x, AngleUnit::Degrees),
            Self::Cos => Operation::Cos(x, AngleUnit::Degrees),
            Self::Tan => Operation::Tan(x, AngleUnit::Degrees),
            Self::Log => Operation::Logarithm(x, LogBase::Ten),
            Self::Ln => Operation::NaturalLog(x),
            Self::Sqrt => Operation::SquareRoot(x),
            Self::Square => Operation::Square(x),
        }
    }
}

/// One keypad button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Point,
    Operator(PendingOp),
    Equals,
    Function(FunctionKey),
    Pi,
    Euler,
    Negate,
    Clear,
    MemoryStore,
    MemoryRecall,
    MemoryClear,
    History,
    ClearHistory,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            d if d.len() == 1 && d.as_bytes()[0].is_ascii_digit() => {
                Self::Digit(d.as_bytes()[0] as char)
            }
            "." => Self::Point,
            "+" => Self::Operator(PendingOp::Add),
            "-" | "−" => Self::Operator(PendingOp::Subtract),
            "*" | "×" => Self::Operator(PendingOp::Multiply),
            "/" | "÷" => Self::Operator(PendingOp::Divide),
            "^" => Self::Operator(PendingOp::Power),
            "=" => Self::Equals,
            "sin" => Self::Function(FunctionKey::Sin),
            "cos" => Self::Function(FunctionKey::Cos),
            "tan" => Self::Function(FunctionKey::Tan),
            "log" => Self::Function(FunctionKey::Log),
            "ln" => Self::Function(FunctionKey::Ln),
            "sqrt" | "√" => Self::Function(FunctionKey::Sqrt),
            "sq" | "x²" => Self::Function(FunctionKey::Square),
            "pi" | "π" => Self::Pi,
            "e" => Self::Euler,
            "neg" | "±" => Self::Negate,
            "C" | "c" => Self::Clear,
            "MS" | "ms" => Self::MemoryStore,
            "MR" | "mr" => Self::MemoryRecall,
            "MC" | "mc" => Self::MemoryClear,
            "history" => Self::History,
            "clear-history" => Self::ClearHistory,
            other => return Err(UnknownKey(other.to_string())),
        };
        Ok(key)
    }
}

/// Parse whitespace-separated key names. Multi-digit numbers such as `12.5`
/// expand into one key per character.
pub fn parse_keys(sequence: &str) -> Result<Vec<Key>, UnknownKey> {
    let mut keys = Vec::new();
    for word in sequence.split_whitespace() {
        if let Ok(key) = word.parse::<Key>() {
            keys.push(key);
        } else if word.chars().all(|c| c.is_ascii_digit() || c == '.') {
            keys.extend(word.chars().map(|c| match c {
                '.' => Key::Point,
                d => Key::Digit(d),
            }));
        } else {
            return Err(UnknownKey(word.to_string()));
        }
    }
    Ok(keys)
}

/// Keypad state on top of a calculator session.
#[derive(Clone, Debug)]
pub struct Keypad {
    calculator: Calculator,
    display: String,
    pending: Option<PendingOp>,
    previous: f64,
    waiting_for_number: bool,
    history_view: Option<String>,
}

impl Keypad {
    pub fn new(calculator: Calculator) -> Self {
        Self {
            calculator,
            display: "0".to_string(),
            pending: None,
            previous: 0.0,
            waiting_for_number: false,
            history_view: None,
        }
    }

    /// The text currently on the display.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// `"M"` while memory holds a value, empty otherwise.
    pub fn memory_indicator(&self) -> &'static str {
        if self.calculator.memory().is_set() {
            "M"
        } else {
            ""
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn pending(&self) -> Option<PendingOp> {
        self.pending
    }

    /// History text opened by the last key, if it was `history`.
    pub fn history_view(&self) -> Option<&str> {
        self.history_view.as_deref()
    }

    /// Press one key.
    ///
    /// A failed `=` clears the keypad; other failures leave the display as is.
    pub fn press(&mut self, key: Key) -> Result<(), CalcError> {
        debug!(?key, display = %self.display, "key pressed");
        self.history_view = None;
        match key {
            Key::Digit(d) => self.type_char(d),
            Key::Point => self.type_char('.'),
            Key::Operator(op) => self.operator(op)?,
            Key::Equals => self.calculate()?,
            Key::Function(func) => {
                let value = self.display_value()?;
                let result = self.calculator.apply(func.operation(value))?;
                self.show(result);
            }
            Key::Pi => self.show(PI),
            Key::Euler => self.show(E),
            Key::Negate => {
                if let Ok(value) = self.display_value() {
                    self.display = (-value).to_string();
                }
            }
            Key::Clear => self.clear(),
            Key::MemoryStore => {
                let value = self.display_value()?;
                self.calculator.memory_mut().store(value);
            }
            Key::MemoryRecall => {
                let value = self.calculator.memory().recall();
                self.show(value);
            }
            Key::MemoryClear => self.calculator.memory_mut().clear(),
            Key::History => self.history_view = Some(self.calculator.history().show()),
            Key::ClearHistory => self.calculator.history_mut().clear(),
        }
        Ok(())
    }

    /// Press every key in order, stopping at the first failure.
    pub fn press_all(&mut self, keys: impl IntoIterator<Item = Key>) -> Result<(), CalcError> {
        keys.into_iter().try_for_each(|key| self.press(key))
    }

    fn type_char(&mut self, c: char) {
        if self.waiting_for_number {
            self.display = if c == '.' { "0.".to_string() } else { c.to_string() };
            self.waiting_for_number = false;
        } else if c == '.' {
            if !self.display.contains('.') {
                self.display.push('.');
            }
        } else if self.display == "0" {
            self.display = c.to_string();
        } else {
            self.display.push(c);
        }
    }

    fn operator(&mut self, op: PendingOp) -> Result<(), CalcError> {
        let mut current = self.display_value()?;
        if self.pending.is_some() && !self.waiting_for_number {
            self.calculate()?;
            current = self.display_value()?;
        }
        self.previous = current;
        self.pending = Some(op);
        self.waiting_for_number = true;
        Ok(())
    }

    fn calculate(&mut self) -> Result<(), CalcError> {
        let Some(op) = self.pending else {
            return Ok(());
        };
        let current = self.display_value()?;
        match self.calculator.apply(op.operation(self.previous, current)) {
            Ok(result) => {
                self.show(result);
                self.pending = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "calculation failed, clearing keypad");
                self.clear();
                Err(e.into())
            }
        }
    }

    fn show(&mut self, value: f64) {
        self.display = value.to_string();
        self.waiting_for_number = true;
    }

    fn clear(&mut self) {
        self.display = "0".to_string();
        self.pending = None;
        self.previous = 0.0;
        self.waiting_for_number = false;
    }

    fn display_value(&self) -> Result<f64, CalcError> {
        Ok(parse_number(&self.display)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::EMPTY_HISTORY_MESSAGE;
    use crate::error::DomainError;

    fn keypad() -> Keypad {
        Keypad::new(Calculator::default())
    }

    fn run(sequence: &str) -> Keypad {
        let mut keypad = keypad();
        keypad.press_all(parse_keys(sequence).unwrap()).unwrap();
        keypad
    }

    #[test]
    fn test_typing_numbers() {
        assert_eq!(run("1 2 . 5").display(), "12.5");
        assert_eq!(run("0 0 7").display(), "7");
        assert_eq!(run(". 5").display(), "0.5");
        assert_eq!(run("1 . . 2").display(), "1.2");
        assert_eq!(run("12.5").display(), "12.5");
    }

    #[test]
    fn test_simple_calculation() {
        let keypad = run("7 * 6 =");
        assert_eq!(keypad.display(), "42");
        assert_eq!(keypad.pending(), None);
        assert_eq!(keypad.calculator().history().show(), "7 * 6 = 42");
    }

    #[test]
    fn test_immediate_execution_chaining() {
        // 2 + 3 is computed when * is pressed
        let keypad = run("2 + 3 * 4 =");
        assert_eq!(keypad.display(), "20");
        assert_eq!(keypad.calculator().history().len(), 2);
    }

    #[test]
    fn test_changing_operator_does_not_compute() {
        let keypad = run("5 + - 2 =");
        assert_eq!(keypad.display(), "3");
        assert_eq!(keypad.calculator().history().len(), 1);
    }

    #[test]
    fn test_new_number_after_result() {
        let keypad = run("2 + 2 = 9");
        assert_eq!(keypad.display(), "9");
    }

    #[test]
    fn test_power() {
        assert_eq!(run("2 ^ 10 =").display(), "1024");
    }

    #[test]
    fn test_divide_by_zero_clears() {
        let mut keypad = keypad();
        let err = keypad.press_all(parse_keys("8 / 0 =").unwrap()).unwrap_err();
        assert_eq!(err, CalcError::Domain(DomainError::DivisionByZero));
        assert_eq!(keypad.display(), "0");
        assert_eq!(keypad.pending(), None);
        assert!(keypad.calculator().history().is_empty());
    }

    #[test]
    fn test_function_keys_use_degrees() {
        let keypad = run("3 0 sin");
        let value: f64 = keypad.display().parse().unwrap();
        assert!((value - 0.5).abs() < 1e-12);
        assert_eq!(keypad.calculator().history().entries()[0].description(), "sin(30°)");

        assert_eq!(run("1 0 0 log").display(), "2");
        assert_eq!(run("9 sqrt").display(), "3");
        assert_eq!(run("1 2 sq").display(), "144");
    }

    #[test]
    fn test_function_error_keeps_display() {
        let mut keypad = keypad();
        keypad.press_all(parse_keys("4 neg").unwrap()).unwrap();
        let err = keypad.press(Key::Function(FunctionKey::Sqrt)).unwrap_err();
        assert_eq!(err, CalcError::Domain(DomainError::NegativeSquareRoot));
        assert_eq!(keypad.display(), "-4");
    }

    #[test]
    fn test_constants_and_sign() {
        assert_eq!(run("pi").display(), PI.to_string());
        assert_eq!(run("e").display(), E.to_string());
        assert_eq!(run("5 neg").display(), "-5");
        assert_eq!(run("5 neg neg").display(), "5");
    }

    #[test]
    fn test_memory_keys() {
        let mut keypad = run("4 2 MS C");
        assert_eq!(keypad.memory_indicator(), "M");
        assert_eq!(keypad.display(), "0");

        keypad.press(Key::MemoryRecall).unwrap();
        assert_eq!(keypad.display(), "42");

        keypad.press(Key::MemoryClear).unwrap();
        assert_eq!(keypad.memory_indicator(), "");
        assert_eq!(keypad.calculator().memory().recall(), 0.0);
    }

    #[test]
    fn test_storing_zero_shows_indicator() {
        let keypad = run("0 MS");
        assert_eq!(keypad.memory_indicator(), "M");
    }

    #[test]
    fn test_history_keys() {
        let mut keypad = run("history");
        assert_eq!(keypad.history_view(), Some(EMPTY_HISTORY_MESSAGE));

        keypad
            .press_all(parse_keys("2 + 3 = 9 sqrt history").unwrap())
            .unwrap();
        assert_eq!(keypad.history_view(), Some("2 + 3 = 5\n√9 = 3"));
        assert_eq!(keypad.display(), "3");

        // the view closes on the next key
        keypad.press(Key::Digit('1')).unwrap();
        assert_eq!(keypad.history_view(), None);

        keypad
            .press_all(parse_keys("clear-history history").unwrap())
            .unwrap();
        assert_eq!(keypad.history_view(), Some(EMPTY_HISTORY_MESSAGE));
        assert_eq!(keypad.display(), "1");
    }

    #[test]
    fn test_clear_resets_pending() {
        let keypad = run("5 + C 3 =");
        assert_eq!(keypad.display(), "3");
        assert!(keypad.calculator().history().is_empty());
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            parse_keys("1 + π ="),
            Ok(vec![
                Key::Digit('1'),
                Key::Operator(PendingOp::Add),
                Key::Pi,
                Key::Equals
            ])
        );
        assert_eq!(parse_keys("1 % 2"), Err(UnknownKey("%".to_string())));
    }
}
