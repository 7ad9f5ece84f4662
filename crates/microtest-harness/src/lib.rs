//! Sequential test runner, console reporting and command-line surface.
//!
//! The core crate records failures; this crate executes registered
//! [`TestCase`](microtest_core::TestCase) factories in order, prints the
//! `Testing <name>: OK|FAILED` progress stream and the end-of-run failure
//! detail, and maps a suite `main` onto process exit codes.
//!
//! A suite binary looks like:
//!
//! ```no_run
//! use microtest_harness::Runner;
//!
//! microtest_core::fixture!(ValueEquality("value/equality") |result| {
//!     microtest_core::check_eq!(result, 1 + 1, 2);
//! });
//!
//! fn main() -> std::process::ExitCode {
//!     let mut runner = Runner::new();
//!     runner.add(ValueEquality::factory);
//!     runner.run_command_line(std::env::args())
//! }
//! ```

pub mod cli;
pub mod run_log;
pub mod runner;

pub use cli::{EXIT_OK, EXIT_TEST_FAILURE, EXIT_USAGE, HarnessError};
pub use runner::Runner;
