//! In-memory [`Log`] implementation for asserting on step output in tests.
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};

/// One captured log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedLine {
    /// A stage header.
    Stage(String),
    /// An informational message.
    Info(String),
    /// A success message.
    Success(String),
    /// A debug message.
    Debug(String),
    /// A warning.
    Warn(String),
    /// An error message.
    Error(String),
    /// A dry-run notice.
    DryRun(String),
    /// Unadorned output.
    Plain(String),
}

impl RecordedLine {
    /// The message text, regardless of kind.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Stage(s)
            | Self::Info(s)
            | Self::Success(s)
            | Self::Debug(s)
            | Self::Warn(s)
            | Self::Error(s)
            | Self::DryRun(s)
            | Self::Plain(s) => s,
        }
    }
}

/// A [`Log`] that keeps every message and step record in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<RecordedLine>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl RecordingLog {
    /// Create an empty recording log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: RecordedLine) {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line);
    }

    /// Every message logged so far, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<RecordedLine> {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Every step recorded so far, in order.
    #[must_use]
    pub fn tasks(&self) -> Vec<TaskEntry> {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Whether any message of any kind contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.text().contains(needle))
    }

    /// Messages logged through [`Log::warn`].
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| match l {
                RecordedLine::Warn(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push(RecordedLine::Stage(msg.to_string()));
    }
    fn info(&self, msg: &str) {
        self.push(RecordedLine::Info(msg.to_string()));
    }
    fn success(&self, msg: &str) {
        self.push(RecordedLine::Success(msg.to_string()));
    }
    fn debug(&self, msg: &str) {
        self.push(RecordedLine::Debug(msg.to_string()));
    }
    fn warn(&self, msg: &str) {
        self.push(RecordedLine::Warn(msg.to_string()));
    }
    fn error(&self, msg: &str) {
        self.push(RecordedLine::Error(msg.to_string()));
    }
    fn dry_run(&self, msg: &str) {
        self.push(RecordedLine::DryRun(msg.to_string()));
    }
    fn plain(&self, msg: &str) {
        self.push(RecordedLine::Plain(msg.to_string()));
    }
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
    }
}
