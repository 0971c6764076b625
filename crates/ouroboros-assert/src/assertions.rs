//! Equality assertions - soft comparisons of expected and actual values
//!
//! Every function here records at most one failure on the sink and returns
//! whether the assertion held. The test keeps running either way.

use std::any::type_name;
use std::fmt;

use serde::Serialize;

use crate::equality::{Message, SemanticEquality, StructuralEquality};
use crate::error::Result;
use crate::sink::ReportSink;
use crate::structural::{CompareOption, CompareOptions};

/// Deferred assertion on a value, for table-driven tests
pub type Want<'a, T> = Box<dyn Fn(&mut dyn ReportSink, &T) -> bool + 'a>;

/// Build a [`Want`] that structurally compares against `expected`
pub fn want_equal<'a, T>(expected: T) -> Want<'a, T>
where
    T: Serialize + fmt::Debug + 'a,
{
    Box::new(move |sink: &mut dyn ReportSink, actual: &T| {
        assert_equal(sink, &expected, actual, &[])
    })
}

/// Compare with a caller-supplied predicate
///
/// The predicate runs exactly once. On mismatch the failure reads
/// `<type> = <actual>, want <expected>`.
pub fn equals_func<S, T, F>(sink: &mut S, expected: &T, actual: &T, equals: F) -> bool
where
    S: ReportSink + ?Sized,
    T: fmt::Debug + ?Sized,
    F: FnOnce(&T, &T) -> bool,
{
    let ok = equals(expected, actual);
    if !ok {
        sink.record_failure(format!(
            "{} = {:?}, want {:?}",
            type_name::<T>(),
            actual,
            expected
        ));
    }
    ok
}

/// Assert structural equality, honoring `options`
pub fn assert_equal<S, T>(sink: &mut S, expected: &T, actual: &T, options: &[CompareOption]) -> bool
where
    S: ReportSink + ?Sized,
    T: Serialize + fmt::Debug + ?Sized,
{
    let options = CompareOptions::from_slice(options);
    let outcome = StructuralEquality.equal(expected, actual, &options);
    report_equality(sink, expected, actual, outcome, true)
}

/// Assert structural inequality; the exact complement of [`assert_equal`]
pub fn assert_not_equal<S, T>(
    sink: &mut S,
    expected: &T,
    actual: &T,
    options: &[CompareOption],
) -> bool
where
    S: ReportSink + ?Sized,
    T: Serialize + fmt::Debug + ?Sized,
{
    let options = CompareOptions::from_slice(options);
    let outcome = StructuralEquality.equal(expected, actual, &options);
    report_equality(sink, expected, actual, outcome, false)
}

/// Assert semantic equality of two messages
pub fn assert_message_equal<S, M>(sink: &mut S, expected: &M, actual: &M) -> bool
where
    S: ReportSink + ?Sized,
    M: Message + ?Sized,
{
    let outcome = SemanticEquality.equal(expected, actual, &CompareOptions::default());
    report_equality(sink, expected, actual, outcome, true)
}

/// Assert semantic inequality of two messages
pub fn assert_message_not_equal<S, M>(sink: &mut S, expected: &M, actual: &M) -> bool
where
    S: ReportSink + ?Sized,
    M: Message + ?Sized,
{
    let outcome = SemanticEquality.equal(expected, actual, &CompareOptions::default());
    report_equality(sink, expected, actual, outcome, false)
}

/// Shared reporting step of the equality assertions and macros
#[doc(hidden)]
pub fn report_equality<S, T>(
    sink: &mut S,
    expected: &T,
    actual: &T,
    outcome: Result<bool>,
    want_equal: bool,
) -> bool
where
    S: ReportSink + ?Sized,
    T: fmt::Debug + ?Sized,
{
    match outcome {
        Ok(equal) => equals_func(sink, expected, actual, |_, _| equal == want_equal),
        Err(err) => {
            sink.record_failure(format!("cannot compare {}: {}", type_name::<T>(), err));
            false
        }
    }
}

/// Assert equality under the default policy
///
/// Messages (types implementing [`Message`](crate::Message)) compare
/// semantically. Without options, other types compare with `==` when they
/// implement `PartialEq` and structurally otherwise. With trailing
/// [`CompareOption`](crate::CompareOption)s, non-message types always
/// compare structurally with the options applied.
///
/// ```
/// use ouroboros_assert::{assert_equal, ignore_field, Recorder};
/// use serde::Serialize;
///
/// #[derive(Debug, Serialize)]
/// struct Row { id: u32, updated_at: u64 }
///
/// let mut t = Recorder::new("rows");
/// assert!(assert_equal!(&mut t, Row { id: 1, updated_at: 5 }, Row { id: 1, updated_at: 9 },
///     ignore_field("updated_at")));
/// assert!(!t.failed());
/// ```
#[macro_export]
macro_rules! assert_equal {
    ($sink:expr, $expected:expr, $actual:expr $(,)?) => {
        $crate::__default_equality!($sink, $expected, $actual, true)
    };
    ($sink:expr, $expected:expr, $actual:expr, $($option:expr),+ $(,)?) => {
        $crate::__default_equality!($sink, $expected, $actual, true, $($option),+)
    };
}

/// Assert inequality under the default policy; see [`assert_equal!`]
#[macro_export]
macro_rules! assert_not_equal {
    ($sink:expr, $expected:expr, $actual:expr $(,)?) => {
        $crate::__default_equality!($sink, $expected, $actual, false)
    };
    ($sink:expr, $expected:expr, $actual:expr, $($option:expr),+ $(,)?) => {
        $crate::__default_equality!($sink, $expected, $actual, false, $($option),+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __default_equality {
    ($sink:expr, $expected:expr, $actual:expr, $want_equal:expr) => {{
        #[allow(unused_imports)]
        use $crate::equality::{ViaMessage as _, ViaPartialEq as _, ViaStructure as _};
        let (expected, actual) = (&$expected, &$actual);
        let options = $crate::CompareOptions::default();
        let outcome = (&&&$crate::equality::Probe(expected))
            .equality()
            .equal(expected, actual, &options);
        $crate::assertions::report_equality($sink, expected, actual, outcome, $want_equal)
    }};
    ($sink:expr, $expected:expr, $actual:expr, $want_equal:expr, $($option:expr),+) => {{
        // no PartialEq step: options only apply to the structural walk
        #[allow(unused_imports)]
        use $crate::equality::{ViaMessage as _, ViaStructure as _};
        let (expected, actual) = (&$expected, &$actual);
        let options: ::std::vec::Vec<$crate::CompareOption> = ::std::vec![$($option),+];
        let options = $crate::CompareOptions::new(options);
        let outcome = (&&&$crate::equality::Probe(expected))
            .equality()
            .equal(expected, actual, &options);
        $crate::assertions::report_equality($sink, expected, actual, outcome, $want_equal)
    }};
}
