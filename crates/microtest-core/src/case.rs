//! Polymorphic test cases.

use crate::result::TestResult;

/// One unit of test logic.
///
/// Implementations issue assertions against the supplied [`TestResult`];
/// assertion failures never unwind out of `run`, so a body keeps executing
/// past its first problem. The `fixture!` macro declares the common
/// stateless-case shape.
pub trait TestCase {
    /// Stable name used for progress lines, selection and failure headers.
    fn name(&self) -> &str;

    /// Execute the test body.
    fn run(&mut self, result: &mut TestResult);
}

/// Constructor for a fresh [`TestCase`] instance.
///
/// The runner owns factories, never instances: every execution constructs a
/// new case and discards it afterwards, so no state survives across tests.
pub type TestCaseFactory = fn() -> Box<dyn TestCase>;
