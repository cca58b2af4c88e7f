//! Calculation history.
//!
//! Every entry is kept until the log is cleared, but views only ever expose
//! the most recent `window` entries.

use std::fmt;

use super::format::NumberFormat;

/// Shown by [`History::show`] when nothing has been recorded.
pub const EMPTY_HISTORY_MESSAGE: &str = "No calculations in history";

/// Default number of entries exposed by a history view.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// One recorded calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    description: String,
    result: f64,
}

impl HistoryEntry {
    pub fn new(description: impl Into<String>, result: f64) -> Self {
        Self {
            description: description.into(),
            result,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn result(&self) -> f64 {
        self.result
    }
}

impl HistoryEntry {
    /// `"description = result"` with the result rendered by `format`.
    pub fn render(&self, format: &NumberFormat) -> String {
        format!("{} = {}", self.description, format.format(self.result))
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&NumberFormat::default()))
    }
}

/// Ordered log of calculations with a bounded view.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    window: usize,
    format: NumberFormat,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl History {
    /// Create an empty log. A zero window is raised to one.
    pub fn new(window: usize) -> Self {
        Self::with_format(window, NumberFormat::default())
    }

    /// Create an empty log whose views render results with `format`.
    pub fn with_format(window: usize, format: NumberFormat) -> Self {
        Self {
            entries: Vec::new(),
            window: window.max(1),
            format,
        }
    }

    pub fn record(&mut self, description: impl Into<String>, result: f64) {
        self.entries.push(HistoryEntry::new(description, result));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn format(&self) -> &NumberFormat {
        &self.format
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The last `window` entries, oldest first.
    pub fn recent(&self) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(self.window);
        &self.entries[start..]
    }

    /// Formatted lines of the recent entries.
    pub fn lines(&self) -> Vec<String> {
        self.recent()
            .iter()
            .map(|entry| entry.render(&self.format))
            .collect()
    }

    /// The recent entries one per line, or [`EMPTY_HISTORY_MESSAGE`].
    pub fn show(&self) -> String {
        if self.is_empty() {
            return EMPTY_HISTORY_MESSAGE.to_string();
        }
        self.lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let history = History::default();
        assert!(history.is_empty());
        assert_eq!(history.show(), EMPTY_HISTORY_MESSAGE);
    }

    #[test]
    fn test_entry_format() {
        let mut history = History::default();
        history.record("2 + 2", 4.0);
        history.record("1 / 4", 0.25);
        assert_eq!(history.show(), "2 + 2 = 4\n1 / 4 = 0.25");
    }

    #[test]
    fn test_clear_after_records() {
        let mut history = History::default();
        for i in 0..5 {
            history.record(format!("{i} + 0"), i as f64);
        }
        history.clear();
        assert_eq!(history.len(), 0);
        assert_eq!(history.show(), EMPTY_HISTORY_MESSAGE);
    }

    #[test]
    fn test_window_keeps_last_entries_in_order() {
        let mut history = History::new(10);
        for i in 0..15 {
            history.record(format!("op{i}"), i as f64);
        }
        assert_eq!(history.len(), 15);

        let recent = history.recent();
        assert_eq!(recent.len(), 10);
        let descriptions: Vec<&str> = recent.iter().map(HistoryEntry::description).collect();
        let expected: Vec<String> = (5..15).map(|i| format!("op{i}")).collect();
        assert_eq!(descriptions, expected);

        let lines = history.lines();
        assert_eq!(lines.first().map(String::as_str), Some("op5 = 5"));
        assert_eq!(lines.last().map(String::as_str), Some("op14 = 14"));
    }

    #[test]
    fn test_views_use_configured_format() {
        let format = NumberFormat {
            precision: 2,
            thousands_separator: true,
        };
        let mut history = History::with_format(10, format);
        history.record("1 / 3", 1.0 / 3.0);
        history.record("1000 * 1234", 1_234_000.0);
        assert_eq!(history.show(), "1 / 3 = 0.33\n1000 * 1234 = 1,234,000");
        assert_eq!(history.entries()[0].to_string(), "1 / 3 = 0.3333333333");
    }

    #[test]
    fn test_zero_window_is_raised() {
        let mut history = History::new(0);
        history.record("a", 1.0);
        history.record("b", 2.0);
        assert_eq!(history.window(), 1);
        assert_eq!(history.show(), "b = 2");
    }
}
