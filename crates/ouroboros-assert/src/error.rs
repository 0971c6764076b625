//! Error types for ouroboros-assert
//!
//! These never cross an assertion boundary: a primitive that hits one
//! records a failure on its sink and returns `false`.

use std::fmt;
use thiserror::Error;

/// Result type alias for internal operations
pub type Result<T> = std::result::Result<T, AssertError>;

/// Internal error type for the assertion engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertError {
    /// A value's `Serialize` impl failed while building its comparison tree
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl serde::ser::Error for AssertError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        AssertError::Serialize(msg.to_string())
    }
}
