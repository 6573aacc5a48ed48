//! Core logging types: task entries, status, and the [`Log`] trait.

/// Step execution result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Human-readable step name.
    pub name: String,
    /// Final status of the step.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Step completed successfully.
    Ok,
    /// Step did not apply (e.g., its tool is not installed).
    NotApplicable,
    /// Step ran but decided there was nothing to do (e.g., empty answer).
    Skipped,
    /// Step ran in dry-run mode; no changes were applied.
    DryRun,
    /// Step encountered an error and could not complete.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the production implementation; tests
/// use a recording implementation to assert on what a step printed.
pub trait Log: Send + Sync {
    /// Log a stage header (one per step).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a completed action or an already-satisfied guard.
    fn success(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Print a line verbatim, without indentation or icon (public keys,
    /// instruction blocks the user copies from).
    fn plain(&self, msg: &str);
    /// Record a step result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
