//! Test harness adapter - one sink per test body, halts scoped to that body
//!
//! `run_test` is where a [`Halted`] unwind stops: the body that called a
//! hard assertion ends and the outcome is returned as a [`TestResult`].

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde::Serialize;

use crate::sink::{Halted, Recorder};

/// Outcome of one test body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestStatus {
    /// No failure recorded
    Passed,
    /// At least one assertion failed (soft or hard)
    Failed,
    /// The body panicked outside of an assertion
    Error,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "PASSED"),
            TestStatus::Failed => write!(f, "FAILED"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    /// Assertion failures in the order they were recorded
    pub failures: Vec<String>,
    /// Whether a hard assertion stopped the body
    pub halted: bool,
    /// Panic message for [`TestStatus::Error`]
    pub error: Option<String>,
    pub duration_ms: u64,
    /// RFC 3339 time taken before the body ran
    pub started_at: String,
}

impl TestResult {
    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    /// Human-readable description of what went wrong
    pub fn failure_report(&self) -> String {
        let mut report = format!("{} {}", self.name, self.status);
        if self.halted {
            report.push_str(" (halted)");
        }
        for line in self.failures.iter().chain(self.error.iter()) {
            report.push_str("\n    ");
            report.push_str(line);
        }
        report
    }
}

/// Run one test body with its own [`Recorder`]
///
/// A [`Halted`] unwind marks the test failed and halted. Any other panic
/// marks it as an error. Soft failures mark it failed.
pub fn run_test<F>(name: impl Into<String>, body: F) -> TestResult
where
    F: FnOnce(&mut Recorder),
{
    let name = name.into();
    let mut recorder = Recorder::new(name.clone());
    let started_at = chrono::Utc::now().to_rfc3339();
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut recorder)));
    let duration_ms = start.elapsed().as_millis() as u64;

    let (status, error) = match outcome {
        Ok(()) if recorder.failed() => (TestStatus::Failed, None),
        Ok(()) => (TestStatus::Passed, None),
        Err(payload) if payload.is::<Halted>() => (TestStatus::Failed, None),
        Err(payload) => (TestStatus::Error, Some(panic_message(payload.as_ref()))),
    };

    let result = TestResult {
        name,
        status,
        halted: recorder.is_halted(),
        failures: recorder.into_failures(),
        error,
        duration_ms,
        started_at,
    };
    tracing::debug!(
        test = %result.name,
        status = %result.status,
        failures = result.failures.len(),
        duration_ms = result.duration_ms,
        "test finished"
    );
    result
}

/// Run a test body from a `#[test]` function
///
/// Soft failures do not stop the body; once it returns, every recorded
/// failure is reported in a single panic.
pub fn check<F>(name: &str, body: F)
where
    F: FnOnce(&mut Recorder),
{
    let result = run_test(name, body);
    if !result.is_passed() {
        panic!("{}", result.failure_report());
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "test panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ReportSink;
    use std::time::Duration;

    #[test]
    fn test_run_test_statuses() {
        let passed = run_test("clean", |_| {});
        assert!(passed.is_passed());

        let soft = run_test("soft", |t| {
            t.record_failure("first".to_string());
            t.record_failure("second".to_string());
        });
        assert_eq!(soft.status, TestStatus::Failed);
        assert!(!soft.halted);
        assert_eq!(soft.failures, vec!["first", "second"]);

        let hard = run_test("hard", |t| {
            t.record_failure("fatal".to_string());
            t.halt();
        });
        assert_eq!(hard.status, TestStatus::Failed);
        assert!(hard.halted);
        assert_eq!(hard.failures, vec!["fatal"]);
    }

    #[test]
    fn test_panic_is_error() {
        let result = run_test("boom", |t| {
            t.record_failure("before".to_string());
            panic!("boom at {}", 3);
        });
        assert_eq!(result.status, TestStatus::Error);
        assert_eq!(result.error.as_deref(), Some("boom at 3"));
        assert_eq!(result.failures, vec!["before"]);
    }

    #[test]
    fn test_started_at_precedes_body() {
        let mut seen = None;
        let result = run_test("timing", |_| {
            std::thread::sleep(Duration::from_millis(20));
            seen = Some(chrono::Utc::now());
        });

        let started = chrono::DateTime::parse_from_rfc3339(&result.started_at).unwrap();
        assert!(started < seen.unwrap());
    }

    #[test]
    fn test_failure_report() {
        let result = run_test("t", |t| {
            t.record_failure("a = 1, want 2".to_string());
            t.halt();
        });
        assert_eq!(result.failure_report(), "t FAILED (halted)\n    a = 1, want 2");
    }

    #[test]
    #[should_panic(expected = "want 2")]
    fn test_check_panics_with_failures() {
        check("check", |t| t.record_failure("a = 1, want 2".to_string()));
    }
}
