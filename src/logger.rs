//! Run logger with verbosity filtering and in-memory capture
//!
//! Log lines are status messages around a run ("Parsing tournament file",
//! extraction counts, the export location). The report itself is program
//! output and never goes through here.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// How much the run reports while it works
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - report only
    Silent = 0,
    /// Minimal - errors and the report
    Minimal = 1,
    /// Normal - progress and export location (default)
    #[default]
    Normal = 2,
    /// Verbose - extraction counts and dropped records
    Verbose = 3,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
}

/// Read-only view of the captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

#[derive(Debug)]
pub struct RunLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl RunLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        RunLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to the in-memory buffer and stop printing
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Print buffered entries the current verbosity allows, then clear the buffer
    pub fn flush_buffer(&mut self) {
        for entry in self.log_buffer.borrow().iter() {
            if entry.level <= self.verbosity {
                println!("{}", entry.message);
            }
        }
        self.clear_logs();
    }

    /// Access captured entries without copying
    ///
    /// Every message is captured in Memory or Both mode, whatever the
    /// verbosity; filtering applies to printing only.
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Silent messages are never printed or captured
    #[inline]
    pub fn silent(&self, _message: &str) {}

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.emit(VerbosityLevel::Minimal, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, message);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, message);
    }

    fn emit(&self, level: VerbosityLevel, message: &str) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        // Early exit if message won't be used
        if level > self.verbosity && !should_capture {
            return;
        }

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
            });
        }

        if should_output && level <= self.verbosity {
            println!("{}", message);
        }
    }
}

impl Default for RunLogger {
    fn default() -> Self {
        Self::new()
    }
}
