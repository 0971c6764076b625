//! Reporting sink - the handle through which assertions report to the harness
//!
//! Every primitive borrows a sink mutably for the duration of one call. A
//! soft failure is a single `record_failure`; a hard failure is
//! `record_failure` followed by `halt`, which never returns.

use std::fmt;
use std::panic;

/// Contract between assertion primitives and the test harness
pub trait ReportSink {
    /// Record a non-fatal failure. The test keeps running.
    fn record_failure(&mut self, message: String);

    /// Stop the current test body. Sibling tests are unaffected.
    fn halt(&mut self) -> !;
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn record_failure(&mut self, message: String) {
        (**self).record_failure(message)
    }

    fn halt(&mut self) -> ! {
        (**self).halt()
    }
}

/// Unwind payload used by [`Recorder::halt`]
///
/// [`run_test`](crate::run_test) recognizes this payload and turns it into a failed (halted)
/// test instead of an errored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halted;

impl fmt::Display for Halted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test halted by a hard assertion")
    }
}

/// Sink owned by a single test
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    test_name: String,
    failures: Vec<String>,
    halted: bool,
}

impl Recorder {
    /// Create a recorder for the named test
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            failures: Vec::new(),
            halted: false,
        }
    }

    /// Name of the test this recorder belongs to
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Failure messages in the order they were recorded
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Check if any failure was recorded
    pub fn failed(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Check if a hard assertion stopped the test
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Consume the recorder, returning its failures
    pub fn into_failures(self) -> Vec<String> {
        self.failures
    }
}

impl ReportSink for Recorder {
    fn record_failure(&mut self, message: String) {
        tracing::debug!(test = %self.test_name, "assertion failed: {}", message);
        self.failures.push(message);
    }

    fn halt(&mut self) -> ! {
        self.halted = true;
        tracing::warn!(
            test = %self.test_name,
            failures = self.failures.len(),
            "halting test after hard assertion"
        );
        // resume_unwind skips the panic hook, so nothing is printed twice
        panic::resume_unwind(Box::new(Halted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::AssertUnwindSafe;

    #[test]
    fn test_recorder_collects_failures_in_order() {
        let mut recorder = Recorder::new("ordering");
        recorder.record_failure("first".to_string());
        recorder.record_failure("second".to_string());

        assert_eq!(recorder.test_name(), "ordering");
        assert!(recorder.failed());
        assert!(!recorder.is_halted());
        assert_eq!(recorder.failures(), ["first", "second"]);
    }

    #[test]
    fn test_halt_unwinds_with_sentinel() {
        let mut recorder = Recorder::new("halting");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            recorder.record_failure("fatal".to_string());
            recorder.halt();
        }));

        let payload = outcome.expect_err("halt must unwind");
        assert!(payload.is::<Halted>());
        assert!(recorder.is_halted());
        assert_eq!(recorder.into_failures(), vec!["fatal".to_string()]);
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut recorder = Recorder::new("forward");
        {
            let mut sink: &mut Recorder = &mut recorder;
            ReportSink::record_failure(&mut sink, "via reference".to_string());
        }
        assert_eq!(recorder.failures().len(), 1);
    }
}
