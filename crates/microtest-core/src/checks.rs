//! Check helpers behind the assertion macros.
//!
//! Every helper records failures on the supplied [`TestResult`] and returns
//! it for message chaining; none of them aborts the test body.

use std::panic::{self, AssertUnwindSafe};

use crate::failure::SourceLocation;
use crate::render::MessageValue;
use crate::result::TestResult;

/// Record a failure when `ok` is false.
pub fn check<'r>(
    result: &'r mut TestResult,
    ok: bool,
    location: SourceLocation,
    expr: &str,
) -> &'r mut TestResult {
    if !ok {
        result.add_failure(location, expr);
    }
    result
}

/// Record a failure when `expected != actual`, streaming both rendered values
/// into the diagnostic.
pub fn check_eq<'r, T, U>(
    result: &'r mut TestResult,
    expected: T,
    actual: U,
    location: SourceLocation,
    expr: &str,
) -> &'r mut TestResult
where
    T: PartialEq<U> + MessageValue,
    U: MessageValue,
{
    if expected != actual {
        result.add_failure(location, expr);
        result.append("Expected: ").append(expected).append("\n");
        result.append("Actual  : ").append(actual);
    }
    result
}

/// String equality with both sides debug-escaped in the diagnostic, so
/// embedded newlines and control characters stay visible on one line.
pub fn check_str_eq<'r>(
    result: &'r mut TestResult,
    expected: &str,
    actual: &str,
    location: SourceLocation,
    expr: &str,
) -> &'r mut TestResult {
    if expected != actual {
        result.add_failure(location, expr);
        result.append(format!("Expected: {expected:?}\n"));
        result.append(format!("Actual  : {actual:?}"));
    }
    result
}

/// Record a failure when `body` completes without panicking.
///
/// The panic itself is swallowed; the surrounding test continues either way.
pub fn check_panics<'r, F>(
    result: &'r mut TestResult,
    body: F,
    location: SourceLocation,
    expr: &str,
) -> &'r mut TestResult
where
    F: FnOnce(),
{
    if panic::catch_unwind(AssertUnwindSafe(body)).is_ok() {
        result.add_failure(location, expr);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("checks.rs", line)
    }

    #[test]
    fn check_records_nothing_on_success() {
        let mut result = TestResult::new();
        check(&mut result, true, loc(1), "1 == 1");
        assert!(!result.failed());
    }

    #[test]
    fn check_records_the_expression_on_failure() {
        let mut result = TestResult::new();
        check(&mut result, false, loc(2), "1 == 2");
        assert_eq!(result.failures()[0].expr, "1 == 2");
    }

    #[test]
    fn check_eq_streams_both_values() {
        let mut result = TestResult::new();
        check_eq(&mut result, 3, 4, loc(3), "a == b");
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].message, "Expected: 3\nActual  : 4");
    }

    #[test]
    fn check_eq_accepts_mixed_comparable_types() {
        let mut result = TestResult::new();
        check_eq(&mut result, "left", String::from("left"), loc(4), "l == r");
        assert!(!result.failed());
    }

    #[test]
    fn check_str_eq_escapes_embedded_newlines() {
        let mut result = TestResult::new();
        check_str_eq(&mut result, "a\nb", "a b", loc(5), "e == a");
        assert_eq!(
            result.failures()[0].message,
            "Expected: \"a\\nb\"\nActual  : \"a b\""
        );
    }

    #[test]
    fn check_panics_passes_when_the_body_panics() {
        let mut result = TestResult::new();
        check_panics(&mut result, || panic!("boom"), loc(6), "expected panic");
        assert!(!result.failed());
    }

    #[test]
    fn check_panics_fails_when_nothing_panics() {
        let mut result = TestResult::new();
        check_panics(&mut result, || {}, loc(7), "expected panic: noop()");
        assert_eq!(result.failures()[0].expr, "expected panic: noop()");
    }
}
