//! Assertion and fixture macros.
//!
//! Each macro captures `file!()`/`line!()`/`stringify!` at the call site and
//! forwards to the helpers in [`checks`](crate::checks).

/// Record a failure when the expression is false.
///
/// ```
/// use microtest_core::{TestResult, check};
///
/// let mut result = TestResult::new();
/// let x = 3;
/// check!(&mut result, x < 10);
/// assert!(!result.failed());
/// ```
#[macro_export]
macro_rules! check {
    ($result:expr, $cond:expr $(,)?) => {
        $crate::checks::check(
            $result,
            $cond,
            $crate::SourceLocation::new(file!(), line!()),
            stringify!($cond),
        )
    };
}

/// Record a failure when the two values are unequal, streaming both into the
/// diagnostic as `Expected:`/`Actual  :` lines.
#[macro_export]
macro_rules! check_eq {
    ($result:expr, $expected:expr, $actual:expr $(,)?) => {
        $crate::checks::check_eq(
            $result,
            $expected,
            $actual,
            $crate::SourceLocation::new(file!(), line!()),
            concat!(stringify!($expected), " == ", stringify!($actual)),
        )
    };
}

/// String equality with debug-escaped diagnostics.
#[macro_export]
macro_rules! check_str_eq {
    ($result:expr, $expected:expr, $actual:expr $(,)?) => {
        $crate::checks::check_str_eq(
            $result,
            $expected,
            $actual,
            $crate::SourceLocation::new(file!(), line!()),
            concat!(stringify!($expected), " == ", stringify!($actual)),
        )
    };
}

/// Record a failure when the expression completes without panicking.
///
/// ```
/// use microtest_core::{TestResult, check_panics};
///
/// let mut result = TestResult::new();
/// check_panics!(&mut result, panic!("boom"));
/// assert!(!result.failed());
/// ```
#[macro_export]
macro_rules! check_panics {
    ($result:expr, $body:expr $(,)?) => {
        $crate::checks::check_panics(
            $result,
            || {
                $body;
            },
            $crate::SourceLocation::new(file!(), line!()),
            concat!("expected panic: ", stringify!($body)),
        )
    };
}

/// Evaluate a predicate helper under a fresh predicate context.
///
/// The helper receives the result as its first argument and may issue further
/// assertions of its own; the context is popped when the call returns,
/// whether or not the body recorded failures. If an assertion fails inside
/// the helper, the report shows this call site above the inner failure, one
/// indentation level per nesting depth.
///
/// ```
/// use microtest_core::{TestResult, check, predicate};
///
/// fn check_range(result: &mut TestResult, x: i32) {
///     check!(result, x < 10);
///     check!(result, x >= 0);
/// }
///
/// let mut result = TestResult::new();
/// predicate!(&mut result, check_range(17));
/// assert_eq!(result.failures().len(), 2);
/// assert_eq!(result.failures()[0].expr, "check_range(17)");
/// ```
#[macro_export]
macro_rules! predicate {
    ($result:expr, $pred:ident ( $($arg:expr),* $(,)? )) => {
        $result.with_predicate(
            $crate::SourceLocation::new(file!(), line!()),
            concat!(stringify!($pred), "(", stringify!($($arg),*), ")"),
            |__result| {
                $pred(__result $(, $arg)*);
            },
        )
    };
}

/// Declare a stateless test case type with a factory.
///
/// Registration stays explicit: pass `<Name>::factory` to the runner.
///
/// ```
/// use microtest_core::{TestCase, TestResult};
///
/// microtest_core::fixture!(ValueEquality("value/equality") |result| {
///     microtest_core::check_eq!(result, 1 + 1, 2);
/// });
///
/// let mut case = ValueEquality::factory();
/// assert_eq!(case.name(), "value/equality");
/// let mut result = TestResult::new();
/// case.run(&mut result);
/// assert!(!result.failed());
/// ```
#[macro_export]
macro_rules! fixture {
    ($(#[$meta:meta])* $ty:ident ( $name:literal ) |$result:ident| $body:block) => {
        $(#[$meta])*
        pub struct $ty;

        impl $ty {
            /// Factory for runner registration.
            pub fn factory() -> ::std::boxed::Box<dyn $crate::TestCase> {
                ::std::boxed::Box::new($ty)
            }
        }

        impl $crate::TestCase for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn run(&mut self, $result: &mut $crate::TestResult) $body
        }
    };
}
