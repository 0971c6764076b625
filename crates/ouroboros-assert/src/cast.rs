//! Type assertions on dynamically typed values

use std::any::{type_name, Any};
use std::fmt;

use crate::sink::ReportSink;

/// A `'static` value whose concrete type is only known at runtime
///
/// Implemented for every `Any + Debug` type so the failure message can show
/// the value that did not match.
pub trait Dynamic: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + fmt::Debug> Dynamic for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Assert that `value` holds a `T` and take it out
///
/// Hard assertion: on a type mismatch the test halts, because code after
/// this call relies on having a `T`.
pub fn assert_is<T, S>(sink: &mut S, value: Box<dyn Dynamic>) -> T
where
    T: Any,
    S: ReportSink + ?Sized,
{
    if !(*value).as_any().is::<T>() {
        mismatch::<T, S>(sink, &*value);
    }
    match Dynamic::into_any(value).downcast::<T>() {
        Ok(cast) => *cast,
        Err(_) => sink.halt(),
    }
}

/// Borrowing form of [`assert_is`]; the returned reference points at the
/// same value
pub fn assert_is_ref<'a, T, S>(sink: &mut S, value: &'a dyn Dynamic) -> &'a T
where
    T: Any,
    S: ReportSink + ?Sized,
{
    match (*value).as_any().downcast_ref::<T>() {
        Some(cast) => cast,
        None => mismatch::<T, S>(sink, value),
    }
}

fn mismatch<T: ?Sized, S: ReportSink + ?Sized>(sink: &mut S, value: &dyn Dynamic) -> ! {
    sink.record_failure(format!("{:?} is not of type {}", value, type_name::<T>()));
    sink.halt()
}
