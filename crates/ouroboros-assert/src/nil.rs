//! Nil checks
//!
//! A value is nil when its own representation is the absence marker of its
//! type: `Option::None` or a null raw pointer. References and smart pointers
//! are transparent, so `Box<Option<T>>` holding `None` is nil while the box
//! itself is not inspected.

use std::any::type_name;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::sink::ReportSink;

/// Capability of having an absence marker
pub trait Nilable {
    fn is_nil(&self) -> bool;
}

impl<T> Nilable for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T: ?Sized> Nilable for *const T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Nilable for *mut T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: Nilable + ?Sized> Nilable for &T {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nilable + ?Sized> Nilable for &mut T {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nilable + ?Sized> Nilable for Box<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nilable + ?Sized> Nilable for Rc<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nilable + ?Sized> Nilable for Arc<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

/// Assert that `value` is not nil
///
/// Hard assertion: a nil value is recorded and the test halts, since the
/// caller is about to use it as live.
pub fn assert_not_nil<S, T>(sink: &mut S, value: &T) -> bool
where
    S: ReportSink + ?Sized,
    T: Nilable + ?Sized,
{
    if value.is_nil() {
        sink.record_failure(format!("variable of type {} should not be nil", type_name::<T>()));
        sink.halt();
    }
    true
}

/// Assert that `value` is nil. Soft.
pub fn assert_nil<S, T>(sink: &mut S, value: &T) -> bool
where
    S: ReportSink + ?Sized,
    T: Nilable + fmt::Debug + ?Sized,
{
    let ok = value.is_nil();
    if !ok {
        sink.record_failure(format!("{} = {:?}, want nil", type_name::<T>(), value));
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Recorder;
    use std::ptr;

    #[test]
    fn test_absence_markers() {
        assert!(None::<u8>.is_nil());
        assert!(!Some(0u8).is_nil());
        assert!(ptr::null::<i32>().is_nil());
        assert!(ptr::null_mut::<i32>().is_nil());

        let x = 5;
        assert!(!(&x as *const i32).is_nil());
    }

    #[test]
    fn test_wrappers_are_transparent() {
        assert!(Box::new(None::<String>).is_nil());
        assert!(!Box::new(Some("x")).is_nil());
        assert!(Arc::new(ptr::null::<u8>()).is_nil());
        assert!(Rc::new(Box::new(None::<u8>)).is_nil());
        assert!((&None::<u8>).is_nil());
    }

    #[test]
    fn test_assert_nil_is_soft() {
        let mut recorder = Recorder::new("nil");
        let value = Some(3);

        assert!(!assert_nil(&mut recorder, &value));
        assert!(assert_nil(&mut recorder, &None::<i32>));
        assert_eq!(
            recorder.failures(),
            ["core::option::Option<i32> = Some(3), want nil"]
        );
        assert!(!recorder.is_halted());
    }

    #[test]
    fn test_assert_not_nil_passes() {
        let mut recorder = Recorder::new("not nil");
        assert!(assert_not_nil(&mut recorder, &Some("live")));
        assert!(!recorder.failed());
    }
}
