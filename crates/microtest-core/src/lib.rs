//! Non-aborting unit-test support: failure recording with nested predicate
//! traces.
//!
//! Assertions in this crate record [`Failure`]s on a [`TestResult`] and let
//! the test body continue, so one run can surface several independent
//! problems. When predicate assertions nest, an explicit linked stack of
//! contexts reconstructs a callstack-like trace above the innermost failure;
//! no unwinding is involved in normal assertion flow.
//!
//! Provided here:
//! - [`TestResult`]: failure recording, message streaming, report printing.
//! - [`TestCase`] / [`TestCaseFactory`]: the polymorphic unit of test logic.
//! - The `check!` family of macros and the [`checks`] helpers behind them.
//! - [`fixture!`]: declare a test case type with a factory.
//!
//! Sequential execution and command-line wiring live in the companion
//! harness crate.
//!
//! ```
//! use microtest_core::{TestResult, check_eq};
//!
//! let mut result = TestResult::new();
//! check_eq!(&mut result, 1 + 1, 2);
//! assert!(!result.failed());
//! ```

pub mod case;
pub mod checks;
pub mod failure;
mod macros;
pub mod predicate;
pub mod render;
pub mod result;

pub use case::{TestCase, TestCaseFactory};
pub use failure::{Failure, SourceLocation};
pub use predicate::PredicateId;
pub use render::MessageValue;
pub use result::TestResult;
