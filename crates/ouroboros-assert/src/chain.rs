//! Error identity through `source()` chains

use std::any::type_name;
use std::error::Error;
use std::fmt;

use crate::assertions::equals_func;
use crate::sink::ReportSink;

/// Check whether `actual`, or any error in its `source()` chain, is `expected`
///
/// A link matches when it is an `E` that compares equal to `expected`.
/// Errors of other types never match, whatever their message says.
pub fn error_chain_contains<E>(actual: &(dyn Error + 'static), expected: &E) -> bool
where
    E: Error + PartialEq + 'static,
{
    let mut current = Some(actual);
    while let Some(err) = current {
        if err.downcast_ref::<E>().is_some_and(|candidate| candidate == expected) {
            return true;
        }
        current = err.source();
    }
    false
}

/// Assert that `actual` is or wraps `expected`. Soft.
///
/// The comparison runs through [`equals_func`] over `dyn Error`, so the
/// failure reads `dyn Error = <actual>, want <expected>`: the
/// concrete type of `actual` is not known here.
pub fn assert_error_is<S, E>(sink: &mut S, expected: &E, actual: &(dyn Error + 'static)) -> bool
where
    S: ReportSink + ?Sized,
    E: Error + PartialEq + 'static,
{
    let expected_dyn: &(dyn Error + 'static) = expected;
    equals_func(sink, expected_dyn, actual, |_, actual| {
        error_chain_contains(actual, expected)
    })
}

/// Assert that `result` is `Ok`. Soft.
pub fn assert_no_error<S, T, E>(sink: &mut S, result: &Result<T, E>) -> bool
where
    S: ReportSink + ?Sized,
    E: fmt::Debug,
{
    match result {
        Ok(_) => true,
        Err(err) => {
            sink.record_failure(format!("{} = {:?}, want nil", type_name::<E>(), err));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Recorder;
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq)]
    enum StoreError {
        #[error("not found")]
        NotFound,
        #[error("conflict on {0}")]
        Conflict(String),
    }

    #[derive(Debug, Error)]
    #[error("lookup failed")]
    struct Lookup(#[source] StoreError);

    #[derive(Debug, Error)]
    #[error("request failed")]
    struct Request(#[source] Lookup);

    #[derive(Debug, Error)]
    #[error("not found")]
    struct LookalikeNotFound;

    #[derive(Debug, Error, PartialEq)]
    #[error("timed out")]
    struct Timeout;

    #[derive(Debug, Error, PartialEq)]
    #[error("missing")]
    struct Missing;

    #[test]
    fn test_chain_walk() {
        let err = Request(Lookup(StoreError::NotFound));
        assert!(error_chain_contains(&err, &StoreError::NotFound));
        assert!(!error_chain_contains(&err, &StoreError::Conflict("k".to_string())));
    }

    #[test]
    fn test_same_message_different_error() {
        let err = LookalikeNotFound;
        assert_eq!(err.to_string(), StoreError::NotFound.to_string());
        assert!(!error_chain_contains(&err, &StoreError::NotFound));
    }

    #[test]
    fn test_unrelated_unit_errors() {
        let timeout = Box::new(Timeout);
        let missing = Box::new(Missing);
        let actual: &(dyn Error + 'static) = &*timeout;

        assert!(!error_chain_contains(actual, &*missing));
        assert!(error_chain_contains(actual, &Timeout));
    }

    #[test]
    fn test_field_does_not_match_parent() {
        #[derive(Debug, Error, PartialEq)]
        #[error("wrapper")]
        struct Wrapper {
            inner: Timeout,
        }

        let err = Wrapper { inner: Timeout };
        assert!(!error_chain_contains(&err, &err.inner));
    }

    #[test]
    fn test_identity_match() {
        let err = StoreError::Conflict("row".to_string());
        assert!(error_chain_contains(&err, &err));
    }

    #[test]
    fn test_assert_error_is_reports_once() {
        let mut recorder = Recorder::new("errors");
        let err = Lookup(StoreError::Conflict("row".to_string()));

        assert!(assert_error_is(&mut recorder, &StoreError::Conflict("row".to_string()), &err));
        assert!(!assert_error_is(&mut recorder, &StoreError::NotFound, &err));
        assert_eq!(recorder.failures().len(), 1);
        let message = &recorder.failures()[0];
        assert!(message.starts_with("dyn "));
        assert!(message.ends_with(r#"= Lookup(Conflict("row")), want NotFound"#));
    }

    #[test]
    fn test_assert_no_error() {
        let mut recorder = Recorder::new("no error");
        let ok: Result<u8, StoreError> = Ok(1);
        let failed: Result<u8, StoreError> = Err(StoreError::NotFound);

        assert!(assert_no_error(&mut recorder, &ok));
        assert!(!assert_no_error(&mut recorder, &failed));
        assert_eq!(recorder.failures().len(), 1);
        assert!(recorder.failures()[0].ends_with("StoreError = NotFound, want nil"));
    }
}
