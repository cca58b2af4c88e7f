//! Tells free-form menu input apart from menu choices.
//!
//! A bare number at the menu prompt is a choice such as `7` or `19`. Text that
//! only uses expression characters and contains an operator, a call to a known
//! function or a parenthesised group goes to the evaluator instead.

use lazy_static::lazy_static;
use regex::Regex;

use super::evaluation::function_names;

lazy_static! {
    /// Every character the expression grammar can tokenize.
    static ref EXPRESSION_CHARSET: Regex =
        Regex::new(r"^[0-9\s.,+\-*/^()A-Za-z_π]+$").expect("charset pattern is valid");

    /// Digits with optional sign, grouping commas and spaces.
    static ref BARE_NUMBER: Regex =
        Regex::new(r"^-?[0-9.,][0-9.,\s]*$").expect("number pattern is valid");

    /// `+ * / ^` anywhere, or a `-` with an operand on its left.
    static ref BINARY_OPERATOR: Regex =
        Regex::new(r"[+*/^]|[0-9A-Za-z_π)]\s*-").expect("operator pattern is valid");

    /// A non-empty parenthesised group.
    static ref GROUP: Regex = Regex::new(r"\([^)]+\)").expect("group pattern is valid");

    /// A call to one of the evaluator's functions, in any letter case.
    static ref FUNCTION_CALL: Regex = {
        let names: Vec<&str> = function_names().collect();
        Regex::new(&format!(r"(?i)\b(?:{})\s*\(", names.join("|")))
            .expect("function call pattern is valid")
    };
}

/// Whether `input` should be evaluated as an expression.
///
/// Anything shorter than two characters, outside the expression charset or
/// consisting of a single number is not.
pub fn looks_like_expression(input: &str) -> bool {
    let text = input.trim();
    if text.chars().count() < 2
        || !EXPRESSION_CHARSET.is_match(text)
        || BARE_NUMBER.is_match(text)
    {
        return false;
    }

    BINARY_OPERATOR.is_match(text) || FUNCTION_CALL.is_match(text) || GROUP.is_match(text)
}
