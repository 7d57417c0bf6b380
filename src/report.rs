//! # Failure Reporter
//!
//! Builds the diagnostic for a failed assertion and hands it to a
//! [`FailureSink`]. The rendered text is the stable, parseable artifact of
//! this crate:
//!
//! ```text
//!
//! Test:            module::case(Equal)
//! Trace:           lib_test.rs:42
//! Description:     count=3
//! Result:          Not equal
//! Expected:        1         (i32)
//! Actual:          2         (i32)
//! ```
//!
//! Lines are `Label:\tValue` cells aligned into columns: each terminated cell
//! is padded to the widest cell of its column block plus [`ReportConfig::padding`].

use std::panic::Location;
use std::path::Path;

use unicode_width::UnicodeWidthStr;

use crate::message;
use crate::sink::FailureSink;
use crate::value::Value;

/// Result phrase used when no custom result is given.
pub const NOT_EQUAL: &str = "Not equal";

/// Layout settings for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// Minimum width of a column cell, padding included.
    pub min_width: usize,
    /// Spaces added after the widest cell of a column.
    pub padding: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_width: 0,
            padding: 5,
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Source position of the assertion call: file base name and line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub file: String,
    pub line: u32,
}

impl Trace {
    pub fn new(file: &str, line: u32) -> Self {
        let base = Path::new(file)
            .file_name()
            .map_or_else(|| file.to_string(), |name| name.to_string_lossy().into_owned());
        Self { file: base, line }
    }

    /// The location of the nearest caller outside `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Custom(String),
    Mismatch { expected: Value, actual: Value },
}

/// A diagnostic report for one failed assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    title: String,
    trace: Trace,
    description: Option<String>,
    outcome: Outcome,
}

impl Report {
    /// Creates a report titled `<test>(<label>)`, or just `<label>` outside a test.
    pub fn new(test_name: Option<&str>, label: &str, trace: Trace) -> Self {
        let title = match test_name {
            Some(name) => format!("{}({})", name, label),
            None => label.to_string(),
        };
        Self {
            title,
            trace,
            description: None,
            outcome: Outcome::Custom(String::new()),
        }
    }

    /// Sets the description; an empty one is omitted from the output.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Uses `result` verbatim as the `Result` line.
    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.outcome = Outcome::Custom(result.into());
        self
    }

    /// Reports `Not equal` with both values and their type names.
    pub fn with_values(mut self, expected: Value, actual: Value) -> Self {
        self.outcome = Outcome::Mismatch { expected, actual };
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = vec![
            Vec::new(),
            vec!["Test:".to_string(), self.title.clone()],
            vec![
                "Trace:".to_string(),
                format!("{}:{}", self.trace.file, self.trace.line),
            ],
        ];
        if let Some(description) = &self.description {
            rows.push(vec!["Description:".to_string(), description.clone()]);
        }
        match &self.outcome {
            Outcome::Custom(result) => {
                rows.push(vec!["Result:".to_string(), result.clone()]);
            }
            Outcome::Mismatch { expected, actual } => {
                rows.push(vec!["Result:".to_string(), NOT_EQUAL.to_string()]);
                rows.push(value_row("Expected:", expected));
                rows.push(value_row("Actual:", actual));
            }
        }
        rows
    }

    /// Renders the report with the default layout.
    pub fn render(&self) -> String {
        self.render_with(&ReportConfig::default())
    }

    pub fn render_with(&self, config: &ReportConfig) -> String {
        align(&self.rows(), config)
    }
}

fn value_row(label: &str, value: &Value) -> Vec<String> {
    vec![
        label.to_string(),
        value.to_string(),
        format!("({})", value.type_name()),
    ]
}

/// Aligns rows of cells into columns.
///
/// Every cell but the last of a row is terminated and takes part in alignment.
/// A column block is a run of consecutive rows that all have a terminated cell
/// in that column; its width is the widest cell plus padding.
fn align(rows: &[Vec<String>], config: &ReportConfig) -> String {
    let terminated = |row: &Vec<String>| row.len().saturating_sub(1);
    let columns = rows.iter().map(terminated).max().unwrap_or(0);
    let mut widths = vec![vec![0usize; columns]; rows.len()];

    for col in 0..columns {
        let mut start = 0;
        while start < rows.len() {
            if terminated(&rows[start]) <= col {
                start += 1;
                continue;
            }
            let mut end = start;
            while end < rows.len() && terminated(&rows[end]) > col {
                end += 1;
            }
            let widest = rows[start..end]
                .iter()
                .map(|row| row[col].width())
                .max()
                .unwrap_or(0);
            let width = config.min_width.max(widest + config.padding);
            for row_widths in &mut widths[start..end] {
                row_widths[col] = width;
            }
            start = end;
        }
    }

    let lines: Vec<String> = rows
        .iter()
        .zip(&widths)
        .map(|(row, row_widths)| {
            let mut line = String::new();
            for (col, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if col + 1 < row.len() {
                    let fill = row_widths[col].saturating_sub(cell.width());
                    line.push_str(&" ".repeat(fill));
                }
            }
            line
        })
        .collect();
    lines.join("\n")
}

// ============================================================================
// REPORTING
// ============================================================================

/// Reports a failed assertion and halts through `sink`.
///
/// `custom_result` is used verbatim when non-empty; otherwise the report shows
/// `Not equal` with `a` as the expected and `b` as the actual value. The trace
/// points at the caller of the assertion entry point.
///
/// # Panics
///
/// Panics with a [`crate::errors::MessageError`] when `msg_and_args` holds
/// several arguments and the first is not a string.
#[track_caller]
pub fn report<S>(
    sink: &S,
    a: &Value,
    b: &Value,
    label: &str,
    custom_result: &str,
    msg_and_args: &[Value],
) -> !
where
    S: FailureSink + ?Sized,
{
    let trace = Trace::caller();
    let description = match message::describe(msg_and_args) {
        Ok(description) => description,
        Err(err) => panic!("{}", err),
    };
    let report = Report::new(sink.test_name(), label, trace).with_description(description);
    let report = if custom_result.is_empty() {
        report.with_values(a.clone(), b.clone())
    } else {
        report.with_result(custom_result)
    };
    sink.fatal(&report.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_keeps_base_name() {
        let trace = Trace::new("/home/dev/project/tests/api_test.rs", 17);
        assert_eq!(trace.file, "api_test.rs");
        assert_eq!(trace.line, 17);
    }

    #[test]
    fn renders_mismatch() {
        let report = Report::new(Some("cart::total"), "Equal", Trace::new("cart.rs", 9))
            .with_values(Value::from(10), Value::from(12u8));
        let expected = [
            "",
            "Test:         cart::total(Equal)",
            "Trace:        cart.rs:9",
            "Result:       Not equal",
            "Expected:     10     (i32)",
            "Actual:       12     (u8)",
        ]
        .join("\n");
        assert_eq!(report.render(), expected);
    }

    #[test]
    fn renders_description_and_custom_result() {
        let report = Report::new(None, "Empty", Trace::new("src/lib.rs", 3))
            .with_description("count=3")
            .with_result("Should be empty, but was [1]");
        let expected = [
            "",
            "Test:            Empty",
            "Trace:           lib.rs:3",
            "Description:     count=3",
            "Result:          Should be empty, but was [1]",
        ]
        .join("\n");
        assert_eq!(report.render(), expected);
    }

    #[test]
    fn empty_description_is_omitted() {
        let report = Report::new(None, "Nil", Trace::new("a.rs", 1)).with_description("");
        assert_eq!(report.description(), None);
        assert!(!report.render().contains("Description:"));
    }

    #[test]
    fn nil_values_show_the_marker() {
        let report = Report::new(None, "Equal", Trace::new("a.rs", 1))
            .with_values(Value::Nil, Value::from("x"));
        let rendered = report.render();
        assert!(rendered.contains("Expected:     <nil>     (<nil>)"), "{}", rendered);
        assert!(rendered.contains("Actual:       x         (String)"), "{}", rendered);
    }

    #[test]
    fn columns_measure_display_width() {
        let rows = vec![
            vec!["k:".to_string(), "日本".to_string(), "end".to_string()],
            vec!["k:".to_string(), "ab".to_string(), "end".to_string()],
        ];
        let config = ReportConfig {
            min_width: 0,
            padding: 1,
        };
        assert_eq!(align(&rows, &config), "k: 日本 end\nk: ab   end");
    }

    #[test]
    fn min_width_applies() {
        let rows = vec![vec!["a".to_string(), "b".to_string()]];
        let config = ReportConfig {
            min_width: 4,
            padding: 1,
        };
        assert_eq!(align(&rows, &config), "a   b");
    }
}
