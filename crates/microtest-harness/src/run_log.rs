//! Structured JSONL log of a test run.
//!
//! Opt-in diagnostic trail (`--log <PATH>` on the command line): one JSON
//! object per line describing run lifecycle and per-test outcomes. This is a
//! log of the run, not an alternative report format — the console output in
//! [`runner`](crate::runner) stays the report humans read.
//!
//! Provides:
//! - [`RunEvent`]: the canonical record with required and optional fields.
//! - [`LogEmitter`]: writes JSONL lines to a file or any writer.
//! - [`validate_log_line`] / [`validate_log_lines`]: schema checks used by
//!   the harness tests.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a run event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Outcome of one test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    /// The body panicked and was converted into a synthetic failure.
    Panicked,
}

/// One JSONL record.
///
/// Required fields: `seq`, `level`, `event`. The optional fields carry
/// per-test and summary context and are omitted from the serialized line
/// when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    /// Monotonic sequence number starting at 1, assigned by the emitter.
    #[serde(default)]
    pub seq: u64,
    pub level: LogLevel,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub test: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub outcome: Option<Outcome>,
    /// Number of failure records the test produced.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failures: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub passed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total: Option<usize>,
}

impl RunEvent {
    fn base(event: &str) -> Self {
        Self {
            seq: 0,
            level: LogLevel::Info,
            event: event.to_owned(),
            test: None,
            outcome: None,
            failures: None,
            passed: None,
            total: None,
        }
    }

    #[must_use]
    pub fn run_started(total: usize) -> Self {
        Self {
            total: Some(total),
            ..Self::base("run_started")
        }
    }

    #[must_use]
    pub fn test_finished(test: &str, outcome: Outcome, failures: usize) -> Self {
        Self {
            test: Some(test.to_owned()),
            outcome: Some(outcome),
            failures: Some(failures),
            ..Self::base("test_finished")
        }
    }

    #[must_use]
    pub fn run_finished(passed: usize, total: usize) -> Self {
        Self {
            passed: Some(passed),
            total: Some(total),
            ..Self::base("run_finished")
        }
    }
}

/// Writes [`RunEvent`]s as JSONL, one object per line.
pub struct LogEmitter {
    out: Box<dyn Write>,
    next_seq: u64,
}

impl LogEmitter {
    /// Emit to an arbitrary writer.
    #[must_use]
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out, next_seq: 1 }
    }

    /// Emit to a freshly created file, buffered.
    pub fn to_file(path: &Path) -> io::Result<Self> {
        Ok(Self::new(Box::new(BufWriter::new(File::create(path)?))))
    }

    /// Write one event as a single JSON line, assigning its sequence number.
    pub fn emit(&mut self, mut event: RunEvent) -> io::Result<()> {
        event.seq = self.next_seq;
        self.next_seq += 1;
        let line = serde_json::to_string(&event).map_err(io::Error::other)?;
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

/// Validation failure for a JSONL line.
#[derive(Debug, Error)]
pub enum LogLineError {
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: empty event name")]
    EmptyEvent { line: usize },
    #[error("line {line}: sequence must start at 1 and increase by 1")]
    BadSequence { line: usize },
}

/// Parse and validate a single JSONL line (1-based `line` for diagnostics).
pub fn validate_log_line(text: &str, line: usize) -> Result<RunEvent, LogLineError> {
    let event: RunEvent =
        serde_json::from_str(text).map_err(|source| LogLineError::Json { line, source })?;
    if event.event.is_empty() {
        return Err(LogLineError::EmptyEvent { line });
    }
    if event.seq == 0 {
        return Err(LogLineError::BadSequence { line });
    }
    Ok(event)
}

/// Validate a whole JSONL document; sequence numbers must start at 1 and
/// increase by 1 per line.
pub fn validate_log_lines(text: &str) -> Result<Vec<RunEvent>, LogLineError> {
    let mut events = Vec::new();
    for (offset, line) in text.lines().enumerate() {
        let lineno = offset + 1;
        let event = validate_log_line(line, lineno)?;
        if event.seq != events.len() as u64 + 1 {
            return Err(LogLineError::BadSequence { line: lineno });
        }
        events.push(event);
    }
    Ok(events)
}
