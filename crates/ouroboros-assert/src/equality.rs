//! Equality contract - message-semantic equality with structural fallback
//!
//! A [`Message`] carries its own notion of equality that ignores internal
//! bookkeeping (cached sizes, unknown-field buffers, lazily built indexes).
//! Other types use `==` when they have it and are compared structurally
//! through serde otherwise.
//!
//! The default policy tries, in order, [`SemanticEquality`] (`T: Message`),
//! [`PartialEquality`] (`T: PartialEq`) and [`StructuralEquality`]
//! (`T: Serialize`). Compare options only mean something to the structural
//! walk, so when options are given the `PartialEq` step is left out. The
//! choice is made at the call site by the `assert_equal!` /
//! `assert_not_equal!` macros through method resolution on [`Probe`]: each
//! step sits one reference level further out than the next, so the first
//! applicable one is found first.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::structural::{self, CompareOptions};

/// Value type with an intrinsic semantic equality
pub trait Message: fmt::Debug {
    /// Compare semantic content only
    fn semantic_eq(&self, other: &Self) -> bool;
}

impl<M: Message + ?Sized> Message for &M {
    fn semantic_eq(&self, other: &Self) -> bool {
        (**self).semantic_eq(*other)
    }
}

impl<M: Message + ?Sized> Message for Box<M> {
    fn semantic_eq(&self, other: &Self) -> bool {
        (**self).semantic_eq(other)
    }
}

impl<M: Message + ?Sized> Message for Rc<M> {
    fn semantic_eq(&self, other: &Self) -> bool {
        (**self).semantic_eq(other)
    }
}

impl<M: Message + ?Sized> Message for Arc<M> {
    fn semantic_eq(&self, other: &Self) -> bool {
        (**self).semantic_eq(other)
    }
}

impl<M: Message> Message for Option<M> {
    fn semantic_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.semantic_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<M: Message> Message for [M] {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.semantic_eq(b))
    }
}

impl<M: Message> Message for Vec<M> {
    fn semantic_eq(&self, other: &Self) -> bool {
        self.as_slice().semantic_eq(other.as_slice())
    }
}

/// Semantic equality through [`Message::semantic_eq`]; options do not apply
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticEquality;

impl SemanticEquality {
    pub fn equal<T: Message + ?Sized>(self, a: &T, b: &T, _options: &CompareOptions) -> Result<bool> {
        Ok(a.semantic_eq(b))
    }
}

/// Equality through `PartialEq`; options do not apply
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialEquality;

impl PartialEquality {
    pub fn equal<T: PartialEq + ?Sized>(self, a: &T, b: &T, _options: &CompareOptions) -> Result<bool> {
        Ok(a == b)
    }
}

/// Deep equality through [`structural::equal`]
///
/// Sequences compare element by element in order. serde serializes sets
/// (`HashSet`, `BTreeSet`) as sequences, so two equal hash sets can differ
/// here; without options the default policy compares them with `==`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEquality;

impl StructuralEquality {
    pub fn equal<T: Serialize + ?Sized>(self, a: &T, b: &T, options: &CompareOptions) -> Result<bool> {
        let equal = structural::equal(a, b, options)?;
        if !equal && tracing::enabled!(tracing::Level::DEBUG) {
            for difference in structural::diff(a, b, options)? {
                tracing::debug!(%difference, "structural difference");
            }
        }
        Ok(equal)
    }
}

/// Call-site probe used by the equality macros
#[doc(hidden)]
pub struct Probe<'a, T: ?Sized>(pub &'a T);

#[doc(hidden)]
pub trait ViaMessage {
    fn equality(&self) -> SemanticEquality {
        SemanticEquality
    }
}

impl<T: Message + ?Sized> ViaMessage for &&Probe<'_, T> {}

#[doc(hidden)]
pub trait ViaPartialEq {
    fn equality(&self) -> PartialEquality {
        PartialEquality
    }
}

impl<T: PartialEq + ?Sized> ViaPartialEq for &Probe<'_, T> {}

#[doc(hidden)]
pub trait ViaStructure {
    fn equality(&self) -> StructuralEquality {
        StructuralEquality
    }
}

impl<T: Serialize + ?Sized> ViaStructure for Probe<'_, T> {}
