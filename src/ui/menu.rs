//! Numbered text menu over a calculator session.

use std::io::{BufRead, Write};

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::calculator::{
    AngleUnit, Calculator, LogBase, NumberFormat, Operation, looks_like_expression,
};
use crate::error::{CalcError, parse_number};

const RULE: &str = "==================================================";

/// Input ran out while the menu was waiting for a line.
#[derive(Debug, Error)]
#[error("end of input")]
struct EndOfInput;

enum Flow {
    Continue,
    Exit,
}

/// Interactive menu reading choices from `input` and writing to `output`.
pub struct Menu<R, W> {
    input: R,
    output: W,
    calculator: Calculator,
    format: NumberFormat,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, calculator: Calculator, format: NumberFormat) -> Self {
        Self {
            input,
            output,
            calculator,
            format,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Run until the user picks `0` or input ends.
    ///
    /// Calculation errors are printed and the loop continues. Only I/O
    /// failures end the loop with an error.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the Advanced Calculator!")?;

        loop {
            self.print_menu()?;

            let outcome = self
                .prompt("\nEnter your choice (0-19): ")
                .and_then(|choice| self.handle_choice(choice.trim()));

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.is::<EndOfInput>() => {
                    writeln!(self.output, "\n\nInput closed. Goodbye!")?;
                    break;
                }
                Err(e) => {
                    if let Some(calc_error) = e.downcast_ref::<CalcError>() {
                        writeln!(self.output, "Error: {}", calc_error)?;
                    } else if e.is::<std::io::Error>() {
                        return Err(e);
                    } else {
                        error!(error = %e, "unexpected menu failure");
                        writeln!(self.output, "An unexpected error occurred: {}", e)?;
                    }
                }
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        let out = &mut self.output;
        writeln!(out, "\n{}", RULE)?;
        writeln!(out, "           ADVANCED CALCULATOR")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "Basic Operations:")?;
        writeln!(out, "  1. Addition (+)")?;
        writeln!(out, "  2. Subtraction (-)")?;
        writeln!(out, "  3. Multiplication (*)")?;
        writeln!(out, "  4. Division (/)")?;
        writeln!(out, "  5. Power (^)")?;
        writeln!(out, "  6. Square Root (√)")?;
        writeln!(out, "\nScientific Functions:")?;
        writeln!(out, "  7. Logarithm (log)")?;
        writeln!(out, "  8. Natural Log (ln)")?;
        writeln!(out, "  9. Sine (sin)")?;
        writeln!(out, " 10. Cosine (cos)")?;
        writeln!(out, " 11. Tangent (tan)")?;
        writeln!(out, " 12. Factorial (!)")?;
        writeln!(out, " 13. Percentage (%)")?;
        writeln!(out, "\nMemory Functions:")?;
        writeln!(out, " 14. Memory Store (MS)")?;
        writeln!(out, " 15. Memory Recall (MR)")?;
        writeln!(out, " 16. Memory Clear (MC)")?;
        writeln!(out, "\nUtility:")?;
        writeln!(out, " 17. Show History")?;
        writeln!(out, " 18. Clear History")?;
        writeln!(out, " 19. Expression Calculator")?;
        writeln!(out, "  0. Exit")?;
        writeln!(out, "{}", RULE)?;
        Ok(())
    }

    fn handle_choice(&mut self, choice: &str) -> Result<Flow> {
        debug!(choice, "menu choice");
        match choice {
            "0" => {
                writeln!(self.output, "Thank you for using the calculator!")?;
                return Ok(Flow::Exit);
            }
            "1" => {
                let (a, b) = self.two_numbers("Enter first number: ", "Enter second number: ")?;
                self.apply(Operation::Add(a, b))?;
            }
            "2" => {
                let (a, b) = self.two_numbers("Enter first number: ", "Enter second number: ")?;
                self.apply(Operation::Subtract(a, b))?;
            }
            "3" => {
                let (a, b) = self.two_numbers("Enter first number: ", "Enter second number: ")?;
                self.apply(Operation::Multiply(a, b))?;
            }
            "4" => {
                let (a, b) = self.two_numbers("Enter dividend: ", "Enter divisor: ")?;
                self.apply(Operation::Divide(a, b))?;
            }
            "5" => {
                let (base, exponent) = self.two_numbers("Enter base: ", "Enter exponent: ")?;
                self.apply(Operation::Power(base, exponent))?;
            }
            "6" => {
                let x = self.number("Enter number: ")?;
                self.apply(Operation::SquareRoot(x))?;
            }
            "7" => {
                let x = self.number("Enter number: ")?;
                let base = self.log_base()?;
                self.apply(Operation::Logarithm(x, base))?;
            }
            "8" => {
                let x = self.number("Enter number: ")?;
                self.apply(Operation::NaturalLog(x))?;
            }
            "9" => {
                let (x, unit) = self.angle()?;
                self.apply(Operation::Sin(x, unit))?;
            }
            "10" => {
                let (x, unit) = self.angle()?;
                self.apply(Operation::Cos(x, unit))?;
            }
            "11" => {
                let (x, unit) = self.angle()?;
                self.apply(Operation::Tan(x, unit))?;
            }
            "12" => {
                let n = self.number("Enter integer: ")?;
                self.apply(Operation::Factorial(n))?;
            }
            "13" => {
                let value = self.number("Enter value: ")?;
                let percent = self.number("Enter percentage: ")?;
                self.apply(Operation::Percentage { value, percent })?;
            }
            "14" => {
                let value = self.number("Enter value to store: ")?;
                self.calculator.memory_mut().store(value);
                writeln!(self.output, "Stored {} in memory", self.format.format(value))?;
            }
            "15" => {
                let value = self.calculator.memory().recall();
                writeln!(self.output, "Memory: {}", self.format.format(value))?;
            }
            "16" => {
                self.calculator.memory_mut().clear();
                writeln!(self.output, "Memory cleared")?;
            }
            "17" => {
                let history = self.calculator.history().show();
                writeln!(self.output, "\nCalculation History:\n{}", history)?;
            }
            "18" => {
                self.calculator.history_mut().clear();
                writeln!(self.output, "History cleared")?;
            }
            "19" => {
                let expression = self.prompt("Enter mathematical expression: ")?;
                self.evaluate(&expression)?;
            }
            other if looks_like_expression(other) => self.evaluate(other)?,
            other => {
                warn!(choice = other, "invalid menu choice");
                writeln!(self.output, "Invalid choice. Please try again.")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, operation: Operation) -> Result<()> {
        let result = self
            .calculator
            .apply(operation)
            .map_err(CalcError::from)?;
        self.print_result(result)
    }

    fn evaluate(&mut self, expression: &str) -> Result<()> {
        let evaluation = self
            .calculator
            .evaluate(expression)
            .map_err(CalcError::from)?;
        self.print_result(evaluation.result)
    }

    fn print_result(&mut self, result: f64) -> Result<()> {
        writeln!(self.output, "Result: {}", self.format.format(result))?;
        Ok(())
    }

    /// Write `message` and read one line without its line ending.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(EndOfInput.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until the answer is a number.
    fn number(&mut self, message: &str) -> Result<f64> {
        loop {
            let line = self.prompt(message)?;
            match parse_number(&line) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(error = %e, "rejected numeric input");
                    writeln!(self.output, "Please enter a valid number.")?;
                }
            }
        }
    }

    fn two_numbers(&mut self, first: &str, second: &str) -> Result<(f64, f64)> {
        let a = self.number(first)?;
        let b = self.number(second)?;
        Ok((a, b))
    }

    fn angle(&mut self) -> Result<(f64, AngleUnit)> {
        let x = self.number("Enter angle: ")?;
        let answer = self.prompt("Is angle in degrees? (y/n): ")?;
        let unit = if answer.trim().to_lowercase().starts_with('y') {
            AngleUnit::Degrees
        } else {
            AngleUnit::Radians
        };
        Ok((x, unit))
    }

    fn log_base(&mut self) -> Result<LogBase> {
        let answer = self.prompt("Enter base (default 10, 'e' for natural): ")?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(LogBase::Ten);
        }
        if answer.eq_ignore_ascii_case("e") {
            return Ok(LogBase::Natural);
        }
        let base = parse_number(answer).map_err(CalcError::from)?;
        Ok(LogBase::from(base))
    }
}
