//! ouroboros-assert: soft and hard test assertions
//!
//! Assertion primitives that report through a [`ReportSink`] instead of
//! panicking:
//! - Soft equality with structural comparison and options (`assert_equal!`)
//! - Message-semantic equality for types implementing [`Message`]
//! - Hard type assertions (`assert_is`) and nil checks (`assert_not_nil`)
//! - Error identity through `source()` chains (`assert_error_is`)
//! - A harness adapter that gives each test body its own [`Recorder`] and
//!   scopes halts to it
//!
//! # Example
//!
//! ```
//! use ouroboros_assert::{assert_equal, assert_not_nil, run_test};
//! use serde::Serialize;
//!
//! #[derive(Debug, Serialize)]
//! struct Order { id: u32, qty: u32 }
//!
//! let result = run_test("orders", |t| {
//!     assert_equal!(t, Order { id: 1, qty: 2 }, Order { id: 1, qty: 3 });
//!     assert_not_nil(t, &None::<Order>);
//!     unreachable!("halted above");
//! });
//!
//! assert!(result.halted);
//! assert_eq!(result.failures.len(), 2);
//! ```

pub mod assertions;
pub mod cast;
pub mod chain;
pub mod equality;
pub mod error;
pub mod harness;
pub mod nil;
pub mod sink;
pub mod structural;

// Re-export main types
pub use assertions::{
    assert_equal, assert_message_equal, assert_message_not_equal, assert_not_equal, equals_func,
    want_equal, Want,
};
pub use cast::{assert_is, assert_is_ref, Dynamic};
pub use chain::{assert_error_is, assert_no_error, error_chain_contains};
pub use equality::Message;
pub use error::{AssertError, Result};
pub use harness::{check, run_test, TestResult, TestStatus};
pub use nil::{assert_nil, assert_not_nil, Nilable};
pub use sink::{Halted, Recorder, ReportSink};
pub use structural::{
    comparator, comparator_for, ignore_field, treat_internal, CompareOption, CompareOptions,
    Difference,
};
