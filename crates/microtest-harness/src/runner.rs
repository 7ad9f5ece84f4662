//! Sequential test execution and console reporting.

use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use microtest_core::{SourceLocation, TestCaseFactory, TestResult};

use crate::run_log::{LogEmitter, Outcome, RunEvent};

/// Owns the registered test-case factories and runs them in order.
///
/// Each execution constructs a fresh case against a fresh [`TestResult`]; no
/// state survives across tests beyond the factory list itself. Registration
/// is explicit — a driver builds the runner and adds factories before `main`
/// hands over control, rather than relying on static-initialization side
/// effects.
#[derive(Default)]
pub struct Runner {
    tests: Vec<TestCaseFactory>,
}

impl Runner {
    #[must_use]
    pub fn new() -> Self {
        Self { tests: Vec::new() }
    }

    /// Register a test-case factory. Chainable.
    pub fn add(&mut self, factory: TestCaseFactory) -> &mut Self {
        self.tests.push(factory);
        self
    }

    /// Number of registered tests.
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Name of the test at `index`. Constructs and discards an instance.
    #[must_use]
    pub fn test_name_at(&self, index: usize) -> String {
        (self.tests[index])().name().to_owned()
    }

    /// Index of the test named `name`, if registered.
    #[must_use]
    pub fn test_index(&self, name: &str) -> Option<usize> {
        (0..self.tests.len()).find(|&index| self.test_name_at(index) == name)
    }

    /// Run the test at `index` against `result`, printing the progress line
    /// to stdout. See [`run_test_to`](Runner::run_test_to).
    pub fn run_test_at(&self, index: usize, result: &mut TestResult) {
        let _ = self.run_test_to(&mut io::stdout(), index, result);
    }

    /// Run one test, streaming its `Testing <name>: OK|FAILED` progress line.
    ///
    /// The line prefix is flushed before the body runs so progress stays
    /// visible even if the test hangs or dies. A panicking body is
    /// intercepted and converted into one synthetic failure record; the
    /// default panic hook is suppressed for the duration so the interception
    /// leaves stderr clean. Aborts cannot be intercepted and take the whole
    /// run down — a documented limitation.
    pub fn run_test_to<W: Write>(
        &self,
        out: &mut W,
        index: usize,
        result: &mut TestResult,
    ) -> io::Result<Outcome> {
        let mut case = (self.tests[index])();
        result.set_test_name(case.name());
        write!(out, "Testing {}: ", case.name())?;
        out.flush()?;

        let previous_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let body = panic::catch_unwind(AssertUnwindSafe(|| case.run(result)));
        panic::set_hook(previous_hook);

        let panicked = body.is_err();
        if let Err(payload) = body {
            result
                .add_failure(
                    SourceLocation::new(file!(), line!()),
                    "Unexpected panic caught:",
                )
                .append(panic_message(payload.as_ref()));
        }

        writeln!(out, "{}", if result.failed() { "FAILED" } else { "OK" })?;
        out.flush()?;

        Ok(if panicked {
            Outcome::Panicked
        } else if result.failed() {
            Outcome::Fail
        } else {
            Outcome::Pass
        })
    }

    /// Run every registered test in registration order, writing to stdout.
    ///
    /// Convenience wrapper over [`run_all_to`](Runner::run_all_to); a stdout
    /// write error counts as a failed run.
    pub fn run_all_tests(&self, print_summary: bool) -> bool {
        self.run_all_to(&mut io::stdout(), print_summary, None)
            .unwrap_or(false)
    }

    /// Run every registered test in registration order.
    ///
    /// Progress lines stream as tests execute; failing results are collected
    /// and printed in detail after the loop, with per-test headers when more
    /// than one test ran. Emits run-log events when `log` is supplied.
    /// Returns overall pass/fail.
    pub fn run_all_to<W: Write>(
        &self,
        out: &mut W,
        print_summary: bool,
        mut log: Option<&mut LogEmitter>,
    ) -> io::Result<bool> {
        let count = self.test_count();
        if let Some(emitter) = log.as_deref_mut() {
            emitter.emit(RunEvent::run_started(count))?;
        }

        let mut failures: Vec<TestResult> = Vec::new();
        for index in 0..count {
            let mut result = TestResult::new();
            let outcome = self.run_test_to(out, index, &mut result)?;
            if let Some(emitter) = log.as_deref_mut() {
                emitter.emit(RunEvent::test_finished(
                    result.test_name(),
                    outcome,
                    result.failures().len(),
                ))?;
            }
            if result.failed() {
                failures.push(result);
            }
        }

        let passed = count - failures.len();
        if let Some(emitter) = log.as_deref_mut() {
            emitter.emit(RunEvent::run_finished(passed, count))?;
        }

        if failures.is_empty() {
            if print_summary {
                writeln!(out, "All {count} tests passed")?;
            }
            return Ok(true);
        }

        for result in &failures {
            result.print_failure(out, count > 1)?;
        }
        if print_summary {
            writeln!(
                out,
                "{}/{} tests passed ({} failure(s))",
                passed,
                count,
                failures.len()
            )?;
        }
        Ok(false)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "<non-string panic payload>".to_owned()
    }
}
