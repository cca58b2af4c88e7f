//! Number formatting for results, history entries and operation descriptions.

/// Magnitudes outside `[SCIENTIFIC_BELOW, POSITIONAL_LIMIT)` use scientific notation.
const POSITIONAL_LIMIT: f64 = 1e15;
const SCIENTIFIC_BELOW: f64 = 1e-10;

/// Display options for numeric results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    /// Maximum number of decimal places.
    pub precision: usize,
    /// Group the integer part in threes with commas.
    pub thousands_separator: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            precision: 10,
            thousands_separator: false,
        }
    }
}

impl NumberFormat {
    /// Format a number according to these options.
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            let s = if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            return s.to_string();
        }

        let abs = value.abs();
        if abs >= POSITIONAL_LIMIT || (abs != 0.0 && abs < SCIENTIFIC_BELOW) {
            return format!("{:e}", value);
        }

        let formatted = format!("{:.*}", self.precision, value);
        let trimmed = if formatted.contains('.') {
            formatted.trim_end_matches('0').trim_end_matches('.')
        } else {
            formatted.as_str()
        };

        // "-0" after trimming tiny negatives
        let trimmed = if trimmed == "-0" { "0" } else { trimmed };

        if self.thousands_separator {
            group_thousands(trimmed)
        } else {
            trimmed.to_string()
        }
    }
}

/// Format a number with the default options (raw, no separators).
pub fn format_number(value: f64) -> String {
    NumberFormat::default().format(value)
}

/// Insert thousand separators into the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, dec_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}{}", sign, grouped, dec_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped() -> NumberFormat {
        NumberFormat {
            thousands_separator: true,
            ..NumberFormat::default()
        }
    }

    #[test]
    fn test_integers() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-120.0), "-120");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_decimals_trim_trailing_zeros() {
        assert_eq!(format_number(2.5), "2.5");
        assert!(format_number(1.0 / 3.0).starts_with("0.333"));
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_thousand_separators() {
        assert_eq!(grouped().format(1_000_000.0), "1,000,000");
        assert_eq!(grouped().format(-1234.5), "-1,234.5");
        assert_eq!(grouped().format(999.0), "999");
        assert_eq!(grouped().format(-0.5), "-0.5");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_extreme_magnitudes() {
        assert_eq!(format_number(1e300), "1e300");
        assert_eq!(format_number(1e-12), "1e-12");
    }

    #[test]
    fn test_precision() {
        let fmt = NumberFormat {
            precision: 2,
            thousands_separator: false,
        };
        assert_eq!(fmt.format(3.14159), "3.14");
    }
}
