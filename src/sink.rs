//! # Failure Sinks
//!
//! Where a failed assertion goes. A sink names the running test (if any) and
//! halts execution once the report has been rendered.
//!
//! - [`TestContext`]: fails only the current test by panicking its thread.
//! - [`Process`]: writes the report to standard error and exits the process.

use std::io::Write;
use std::thread;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Exit status used when an assertion fails outside a test.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Receives failed assertions.
pub trait FailureSink {
    /// Name of the running test, or `None` outside a test.
    fn test_name(&self) -> Option<&str>;

    /// Emits `report` and halts. Never returns.
    fn fatal(&self, report: &str) -> !;
}

impl<S: FailureSink + ?Sized> FailureSink for &S {
    fn test_name(&self) -> Option<&str> {
        (**self).test_name()
    }

    #[track_caller]
    fn fatal(&self, report: &str) -> ! {
        (**self).fatal(report)
    }
}

// ============================================================================
// TEST-SCOPED
// ============================================================================

/// Handle for the currently running test.
///
/// # Examples
///
/// ```rust,should_panic
/// use verity::{assert, TestContext};
/// let t = TestContext::named("doc::example");
/// assert::equal(&t, 1, 2, &[]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    name: String,
}

impl TestContext {
    /// Name used when the current thread has none.
    pub const UNNAMED: &'static str = "unnamed";

    /// Context for the test running on this thread.
    ///
    /// The test harness names each test thread after the test path.
    pub fn current() -> Self {
        let name = thread::current()
            .name()
            .unwrap_or(Self::UNNAMED)
            .to_string();
        Self { name }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FailureSink for TestContext {
    fn test_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    /// Panics with the report: the test is marked failed and only its thread unwinds.
    #[track_caller]
    fn fatal(&self, report: &str) -> ! {
        panic!("{}", report)
    }
}

// ============================================================================
// PROCESS-SCOPED
// ============================================================================

/// Sink for assertions made outside any test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Process;

impl Process {
    fn color_choice() -> ColorChoice {
        if atty::is(atty::Stream::Stderr) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        }
    }

    /// Writes the report to standard error, colouring only the header line.
    fn emit(report: &str) -> std::io::Result<()> {
        let mut stderr = StandardStream::stderr(Self::color_choice());
        stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stderr, "assertion failed:")?;
        stderr.reset()?;
        let separator = if report.starts_with('\n') { "" } else { " " };
        writeln!(stderr, "{}{}", separator, report)?;
        stderr.flush()
    }
}

impl FailureSink for Process {
    fn test_name(&self) -> Option<&str> {
        None
    }

    fn fatal(&self, report: &str) -> ! {
        // nothing left to report a write failure to
        let _ = Self::emit(report);
        std::process::exit(FAILURE_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use std::panic;

    use super::*;

    #[test]
    fn current_context_uses_the_test_thread_name() {
        let t = TestContext::current();
        assert!(t.name().ends_with("current_context_uses_the_test_thread_name"));
    }

    #[test]
    fn unnamed_thread_falls_back() {
        let name = thread::spawn(|| TestContext::current().name().to_string())
            .join()
            .unwrap();
        assert_eq!(name, TestContext::UNNAMED);
    }

    #[test]
    fn test_context_fatal_panics_with_report() {
        let t = TestContext::named("sink");
        let payload = panic::catch_unwind(|| t.fatal("boom")).unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("boom"));
    }

    #[test]
    fn process_has_no_test_name() {
        assert_eq!(Process.test_name(), None);
        assert_eq!((&Process).test_name(), None);
    }
}
