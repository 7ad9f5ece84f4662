//! Command-line surface for suite binaries.
//!
//! A suite `main` registers its cases and hands `std::env::args` to
//! [`Runner::run_command_line`]:
//!
//! - no arguments: run every registered test;
//! - `--list-tests`: print the registered test names, one per line;
//! - `--test <NAME>`: run exactly one test;
//! - `--log <PATH>`: also write the JSONL run log.
//!
//! Unrecognized invocations print clap usage and exit nonzero.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use microtest_core::TestResult;

use crate::run_log::{LogEmitter, RunEvent};
use crate::runner::Runner;

/// Exit status for a fully passing invocation.
pub const EXIT_OK: u8 = 0;
/// Exit status when a test failed or the selected test is unknown.
pub const EXIT_TEST_FAILURE: u8 = 1;
/// Exit status for usage errors and harness-internal failures.
pub const EXIT_USAGE: u8 = 2;

/// Problems at the harness boundary. Assertion failures are never errors;
/// they stay inside the [`TestResult`].
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unknown test: {name}")]
    UnknownTest { name: String },
    #[error("run log: {0}")]
    Log(#[source] io::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "microtest", about = "Run the registered test suite")]
struct Cli {
    /// Print the names of all registered tests.
    #[arg(long)]
    list_tests: bool,

    /// Run exactly one test by name.
    #[arg(long, value_name = "NAME", conflicts_with = "list_tests")]
    test: Option<String>,

    /// Write a JSONL log of the run to this path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

impl Runner {
    /// Parse `args` (including the program name) and run accordingly.
    ///
    /// Returns the process exit status: 0 when everything passed, 1 on test
    /// failure or unknown test name, 2 on usage errors or harness-internal
    /// failures.
    pub fn run_command_line<I, T>(&self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.run_command_line_to(args, &mut io::stdout()) {
            Ok(code) => ExitCode::from(code),
            Err(err) => {
                eprintln!("{err}");
                match err {
                    HarnessError::UnknownTest { .. } => ExitCode::from(EXIT_TEST_FAILURE),
                    HarnessError::Log(_) | HarnessError::Io(_) => ExitCode::from(EXIT_USAGE),
                }
            }
        }
    }

    /// Writer-parameterized core of [`run_command_line`](Runner::run_command_line),
    /// split out so tests can capture the console output.
    pub fn run_command_line_to<I, T, W>(&self, args: I, out: &mut W) -> Result<u8, HarnessError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        W: Write,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(err) => {
                // clap renders its own usage text (stderr for errors, stdout
                // for --help).
                let _ = err.print();
                return Ok(EXIT_USAGE);
            }
        };
        self.dispatch(&cli, out)
    }

    fn dispatch<W: Write>(&self, cli: &Cli, out: &mut W) -> Result<u8, HarnessError> {
        let mut log = match &cli.log {
            Some(path) => Some(LogEmitter::to_file(path).map_err(HarnessError::Log)?),
            None => None,
        };

        if cli.list_tests {
            for index in 0..self.test_count() {
                writeln!(out, "{}", self.test_name_at(index))?;
            }
            return Ok(EXIT_OK);
        }

        if let Some(name) = &cli.test {
            let index = self
                .test_index(name)
                .ok_or_else(|| HarnessError::UnknownTest { name: name.clone() })?;
            return self.run_single(index, out, log.as_mut()).map_err(HarnessError::Io);
        }

        let all_passed = self.run_all_to(out, true, log.as_mut())?;
        Ok(if all_passed { EXIT_OK } else { EXIT_TEST_FAILURE })
    }

    fn run_single<W: Write>(
        &self,
        index: usize,
        out: &mut W,
        mut log: Option<&mut LogEmitter>,
    ) -> io::Result<u8> {
        if let Some(emitter) = log.as_deref_mut() {
            emitter.emit(RunEvent::run_started(1))?;
        }
        let mut result = TestResult::new();
        let outcome = self.run_test_to(out, index, &mut result)?;
        if let Some(emitter) = log.as_deref_mut() {
            emitter.emit(RunEvent::test_finished(
                result.test_name(),
                outcome,
                result.failures().len(),
            ))?;
            emitter.emit(RunEvent::run_finished(usize::from(!result.failed()), 1))?;
        }
        if result.failed() {
            result.print_failure(out, false)?;
            return Ok(EXIT_TEST_FAILURE);
        }
        Ok(EXIT_OK)
    }
}
