//! Test result: failure recording, message streaming, reporting.

use std::io::{self, Write};

use crate::failure::{Failure, SourceLocation};
use crate::predicate::{PredicateId, PredicateStack};
use crate::render::MessageValue;

/// Collected outcome of one test execution.
///
/// One instance exists per test run. Assertions record [`Failure`]s here and
/// stream diagnostic text at the most recent record; nothing in this type
/// aborts the caller.
///
/// When an assertion fails inside nested predicate evaluations, every active
/// ancestor context that has not been recorded yet is first materialized into
/// its own failure record, outer to inner, so the report reads like a
/// callstack even though no unwinding took place.
#[derive(Debug)]
pub struct TestResult {
    /// Append-only; insertion order is discovery order.
    failures: Vec<Failure>,
    /// Record receiving streamed message text, once a failure exists.
    message_target: Option<usize>,
    predicates: PredicateStack,
    /// High-water mark of predicate ids already converted into failures.
    last_used_predicate_id: PredicateId,
    name: String,
}

impl TestResult {
    #[must_use]
    pub fn new() -> Self {
        Self {
            failures: Vec::new(),
            message_target: None,
            predicates: PredicateStack::new(),
            last_used_predicate_id: 0,
            name: String::new(),
        }
    }

    pub fn set_test_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.name
    }

    /// The failure records collected so far, in discovery order.
    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// True iff at least one failure has been recorded.
    #[must_use]
    pub fn failed(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Enter a predicate context. Low-level; prefer [`with_predicate`] or the
    /// `predicate!` macro, which guarantee the matching pop.
    ///
    /// [`with_predicate`]: TestResult::with_predicate
    pub fn push_predicate_context(
        &mut self,
        location: SourceLocation,
        expr: &'static str,
    ) -> &mut Self {
        self.predicates.push(location, expr);
        self
    }

    /// Exit the newest predicate context.
    ///
    /// If the popped context was converted into a failure, streamed messages
    /// are redirected at that record, so text appended right after the
    /// predicate exits attaches to the predicate's own line rather than to
    /// whatever failed inside it.
    pub fn pop_predicate_context(&mut self) -> &mut Self {
        if let Some(failure) = self.predicates.pop() {
            self.message_target = Some(failure);
        }
        self
    }

    /// Run `body` under a fresh predicate context.
    ///
    /// The context is popped when `body` returns, whether or not it recorded
    /// failures. A panicking body propagates; the result must not be used for
    /// further predicate work afterwards (the runner discards it).
    pub fn with_predicate<F>(
        &mut self,
        location: SourceLocation,
        expr: &'static str,
        body: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut TestResult),
    {
        self.push_predicate_context(location, expr);
        body(self);
        self.pop_predicate_context()
    }

    /// Record an assertion failure.
    ///
    /// Walks the active predicate contexts outer to inner, materializing
    /// every context newer than the high-water mark into its own failure
    /// record at its depth, then appends the record for the assertion itself
    /// and makes it the target for streamed messages. Contexts are converted
    /// at most once; a second failure under the same context only adds the
    /// inner record.
    pub fn add_failure(&mut self, location: SourceLocation, expr: &str) -> &mut Self {
        let mut nesting_level = 0;
        let mut cursor = self.predicates.root_next();
        while let Some(idx) = cursor {
            let node = self.predicates.node(idx);
            let (id, node_location, node_expr, next) =
                (node.id, node.location, node.expr, node.next);
            if id > self.last_used_predicate_id {
                self.last_used_predicate_id = id;
                self.add_failure_info(node_location, node_expr, nesting_level);
                self.predicates.link_failure(idx, self.failures.len() - 1);
            }
            nesting_level += 1;
            cursor = next;
        }

        self.add_failure_info(Some(location), expr, nesting_level);
        self.message_target = Some(self.failures.len() - 1);
        self
    }

    fn add_failure_info(
        &mut self,
        location: Option<SourceLocation>,
        expr: &str,
        nesting_level: u32,
    ) {
        self.failures.push(Failure {
            location,
            expr: expr.to_owned(),
            message: String::new(),
            nesting_level,
        });
    }

    /// Append rendered text to the current message target. Chainable; no-op
    /// until a failure exists.
    pub fn append<V: MessageValue>(&mut self, value: V) -> &mut Self {
        if let Some(target) = self.message_target {
            self.failures[target].message.push_str(&value.render());
        }
        self
    }

    /// Print every failure record in discovery order.
    ///
    /// Each record is indented two spaces per nesting level, prefixed with
    /// its location when present, followed by the expression text and the
    /// re-indented message. `print_test_name` adds a header naming the test;
    /// it is set when several tests are reported together.
    pub fn print_failure<W: Write>(&self, out: &mut W, print_test_name: bool) -> io::Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }

        if print_test_name {
            writeln!(out, "* Detail of {} test failure:", self.name)?;
        }

        for failure in &self.failures {
            let indent = "  ".repeat(failure.nesting_level as usize);
            if failure.location.is_some() || !failure.expr.is_empty() {
                write!(out, "{indent}")?;
                if let Some(location) = failure.location {
                    write!(out, "{}({}): ", location.file, location.line)?;
                }
                writeln!(out, "{}", failure.expr)?;
            }
            if !failure.message.is_empty() {
                writeln!(out, "{}", indent_text(&failure.message, &format!("{indent}  ")))?;
            }
        }
        Ok(())
    }
}

impl Default for TestResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefix every line of `text` with `indent`, preserving embedded newlines.
fn indent_text(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len() + indent.len());
    for line in text.split_inclusive('\n') {
        out.push_str(indent);
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("value.rs", line)
    }

    #[test]
    fn no_failures_initially() {
        let result = TestResult::new();
        assert!(!result.failed());
        assert!(result.failures().is_empty());
    }

    #[test]
    fn push_pop_alone_creates_no_failure() {
        let mut result = TestResult::new();
        result.push_predicate_context(loc(1), "a()");
        result.push_predicate_context(loc(2), "b()");
        result.pop_predicate_context();
        result.pop_predicate_context();
        assert!(!result.failed());
    }

    #[test]
    fn single_failure_without_context_is_level_zero() {
        let mut result = TestResult::new();
        result.add_failure(loc(42), "1 == 2");
        let failures = result.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].nesting_level, 0);
        assert_eq!(failures[0].expr, "1 == 2");
        assert_eq!(failures[0].location, Some(loc(42)));
        assert!(result.failed());
    }

    #[test]
    fn active_contexts_materialize_outer_to_inner() {
        let mut result = TestResult::new();
        result.push_predicate_context(loc(1), "outer(x)");
        result.push_predicate_context(loc(2), "inner(x)");
        result.add_failure(loc(3), "x < 10");

        let failures = result.failures();
        assert_eq!(failures.len(), 3);
        assert_eq!(failures[0].expr, "outer(x)");
        assert_eq!(failures[0].nesting_level, 0);
        assert_eq!(failures[1].expr, "inner(x)");
        assert_eq!(failures[1].nesting_level, 1);
        assert_eq!(failures[2].expr, "x < 10");
        assert_eq!(failures[2].nesting_level, 2);
    }

    #[test]
    fn context_is_converted_at_most_once() {
        let mut result = TestResult::new();
        result.push_predicate_context(loc(1), "range(x)");
        result.add_failure(loc(2), "x < 10");
        result.add_failure(loc(3), "x >= 0");
        result.pop_predicate_context();

        let exprs: Vec<&str> = result.failures().iter().map(|f| f.expr.as_str()).collect();
        assert_eq!(exprs, ["range(x)", "x < 10", "x >= 0"]);
        let levels: Vec<u32> = result.failures().iter().map(|f| f.nesting_level).collect();
        assert_eq!(levels, [0, 1, 1]);
    }

    #[test]
    fn sibling_predicates_each_materialize() {
        let mut result = TestResult::new();
        result.with_predicate(loc(1), "first(x)", |r| {
            r.add_failure(loc(2), "a");
        });
        result.with_predicate(loc(3), "second(x)", |r| {
            r.add_failure(loc(4), "b");
        });

        let exprs: Vec<&str> = result.failures().iter().map(|f| f.expr.as_str()).collect();
        assert_eq!(exprs, ["first(x)", "a", "second(x)", "b"]);
        let levels: Vec<u32> = result.failures().iter().map(|f| f.nesting_level).collect();
        assert_eq!(levels, [0, 1, 0, 1]);
    }

    #[test]
    fn pop_redirects_streamed_messages_at_the_context_record() {
        let mut result = TestResult::new();
        result.push_predicate_context(loc(1), "range(x)");
        result.add_failure(loc(2), "x < 10");
        result.append("inner detail");
        result.pop_predicate_context();
        result.append("outer detail");

        let failures = result.failures();
        assert_eq!(failures[0].message, "outer detail");
        assert_eq!(failures[1].message, "inner detail");
    }

    #[test]
    fn append_is_a_noop_before_any_failure() {
        let mut result = TestResult::new();
        result.append("lost");
        assert!(!result.failed());
    }

    #[test]
    fn append_chains_onto_the_latest_failure() {
        let mut result = TestResult::new();
        result.add_failure(loc(1), "a == b");
        result.append("x=").append(3).append(", y=").append(4);
        assert_eq!(result.failures()[0].message, "x=3, y=4");
    }

    #[test]
    fn with_predicate_pops_even_when_the_body_fails() {
        let mut result = TestResult::new();
        result.with_predicate(loc(1), "range(x)", |r| {
            r.add_failure(loc(2), "x < 10");
        });
        // A follow-up failure outside the predicate sits back at level 0.
        result.add_failure(loc(3), "y == 0");
        let last = result.failures().last().expect("failure recorded");
        assert_eq!(last.nesting_level, 0);
    }

    #[test]
    fn print_failure_formats_location_expression_and_message() {
        let mut result = TestResult::new();
        result.add_failure(loc(42), "1 == 2");
        result.append("Expected: 1\n").append("Actual  : 2");

        let mut out = Vec::new();
        result.print_failure(&mut out, false).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "value.rs(42): 1 == 2\n  Expected: 1\n  Actual  : 2\n");
    }

    #[test]
    fn print_failure_indents_by_nesting_level() {
        let mut result = TestResult::new();
        result.push_predicate_context(loc(7), "range(x)");
        result.add_failure(loc(9), "x < 10");
        result.pop_predicate_context();

        let mut out = Vec::new();
        result.print_failure(&mut out, false).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "value.rs(7): range(x)\n  value.rs(9): x < 10\n");
    }

    #[test]
    fn print_failure_emits_header_when_requested() {
        let mut result = TestResult::new();
        result.set_test_name("value/equality");
        result.add_failure(loc(1), "1 == 2");

        let mut out = Vec::new();
        result.print_failure(&mut out, true).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("* Detail of value/equality test failure:\n"));
    }

    #[test]
    fn print_failure_is_silent_without_failures() {
        let result = TestResult::new();
        let mut out = Vec::new();
        result.print_failure(&mut out, true).expect("write to vec");
        assert!(out.is_empty());
    }

    #[test]
    fn indent_text_prefixes_every_line() {
        assert_eq!(indent_text("a\nb", "  "), "  a\n  b");
        assert_eq!(indent_text("a\n", "  "), "  a\n");
        assert_eq!(indent_text("", "  "), "");
    }
}
