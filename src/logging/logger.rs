//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// The `record_task` method is **not** included because its signature differs
/// from the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are also written to a persistent log file at
/// `$XDG_CACHE_HOME/macsetup/<command>.log` (default `~/.cache/macsetup/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The log file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber);
    /// this constructor does not write to the file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded step entries, in execution order.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (one per step).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "macsetup::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a completed action or an already-satisfied guard.
    pub fn success(&self, msg: &str) {
        tracing::info!(target: "macsetup::success", "{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "macsetup::dry_run", "{msg}");
    }

    /// Print a line verbatim.
    pub fn plain(&self, msg: &str) {
        tracing::info!(target: "macsetup::plain", "{msg}");
    }

    /// Record a step result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed steps.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded steps.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut not_applicable = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", "\x1b[2m")
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        let total = ok + not_applicable + skipped + dry_run + failed;
        self.info(&format!(
            "{total} steps: \x1b[32m{ok} ok\x1b[0m, \x1b[2m{not_applicable} n/a\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, success, debug, warn, error, dry_run, plain);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::super::isolated_logger;
    use super::*;
    use std::fs;

    #[test]
    fn record_and_count_failures() {
        let log = Logger::new("test");
        log.record_task("Install Homebrew", TaskStatus::Ok, None);
        log.record_task("Configure Dock", TaskStatus::Failed, Some("killall failed"));
        log.record_task("Copy dotfiles", TaskStatus::Skipped, Some("no dir"));
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn no_failures_when_all_ok() {
        let log = Logger::new("test");
        log.record_task("a", TaskStatus::Ok, None);
        log.record_task("b", TaskStatus::NotApplicable, None);
        assert_eq!(log.failure_count(), 0);
    }

    #[test]
    fn task_entries_preserve_order() {
        let log = Logger::new("test");
        log.record_task("first", TaskStatus::Ok, None);
        log.record_task("second", TaskStatus::DryRun, None);
        let entries = log.task_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "first");
        assert_eq!(entries[1].status, TaskStatus::DryRun);
    }

    #[test]
    fn print_summary_empty_is_noop() {
        let (log, _tmp, _guard) = isolated_logger();
        log.print_summary();
        let path = log.log_path().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(!contents.contains("Summary"));
    }

    #[test]
    fn print_summary_lists_every_step() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_task("Install Homebrew", TaskStatus::Ok, None);
        log.record_task("Configure Dock", TaskStatus::Failed, Some("boom"));
        log.print_summary();
        let path = log.log_path().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("==> Summary"));
        assert!(contents.contains("✓ Install Homebrew"));
        assert!(contents.contains("✗ Configure Dock (boom)"));
        assert!(contents.contains("2 steps: 1 ok, 0 n/a, 0 skipped, 0 dry-run, 1 failed"));
    }

    #[test]
    fn success_written_to_file_with_check_mark() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("success-marker-{}", std::process::id());
        log.success(&marker);
        let path = log.log_path().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains(&format!("✓ {marker}")));
    }

    #[test]
    fn warn_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("warn-marker-{}", std::process::id());
        log.warn(&marker);
        let path = log.log_path().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("[warn]"), "warn tag should appear in log file");
        assert!(contents.contains(&marker));
    }

    #[test]
    fn error_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("error-marker-{}", std::process::id());
        log.error(&marker);
        let path = log.log_path().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("[error]"), "error tag should appear in log file");
        assert!(contents.contains(&marker));
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("stage-marker-{}", std::process::id());
        log.stage(&marker);
        let path = log.log_path().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains(&format!("==> {marker}")));
    }

    #[test]
    fn dry_run_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("dryrun-marker-{}", std::process::id());
        log.dry_run(&marker);
        let path = log.log_path().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("[dry run]"));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn debug_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let path = log.log_path().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("[debug]"));
        assert!(contents.contains(&marker));
    }
}
