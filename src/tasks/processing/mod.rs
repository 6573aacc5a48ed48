//! Generic resource processing loop: check state, apply as needed, collect stats.
//!
//! Single-resource handling lives in [`apply`].

mod apply;

use anyhow::Result;

use super::Context;
use crate::error::SetupError;
use crate::resources::{Resource, ResourceState};

/// Result of a single step execution.
///
/// # Examples
///
/// ```
/// use macsetup::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("no email entered".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Step completed successfully.
    Ok,
    /// Step ran but had nothing it could do.
    Skipped(String),
    /// Step ran in dry-run mode.
    DryRun,
}

/// Counters for steps that process many items.
///
/// # Examples
///
/// ```
/// use macsetup::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 10;
///
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
/// ```
///
/// Skipped and failed items are only mentioned when there are some:
///
/// ```
/// use macsetup::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3, failed: 1 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped, 1 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items that could not be applied (e.g. the app is not installed).
    pub skipped: u32,
    /// Number of items whose apply failed without aborting the step.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            out.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.failed > 0 {
            out.push_str(&format!(", {} failed", self.failed));
        }
        out
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Configuration for the generic resource processing loop.
///
/// # Examples
///
/// ```
/// use macsetup::tasks::ProcessOpts;
///
/// // Fix everything, bail on errors (strict):
/// let opts = ProcessOpts::apply_all("configure", "configured");
/// assert!(opts.fix_incorrect && opts.fix_missing && opts.bail_on_error);
///
/// // Fix everything, report errors and keep going:
/// let opts = ProcessOpts::apply_all("install", "installed").no_bail();
/// assert!(!opts.bail_on_error);
///
/// // Install only missing resources, never overwrite:
/// let opts = ProcessOpts::install_missing("clone", "cloned");
/// assert!(!opts.fix_incorrect && opts.fix_missing && !opts.bail_on_error);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProcessOpts<'a> {
    /// Verb for log messages (e.g. "install", "copy").
    pub verb: &'a str,
    /// Past tense of `verb` (e.g. "installed", "copied").
    pub done: &'a str,
    /// Treat `Incorrect` as fixable (apply the change). If `false`, skip it.
    pub fix_incorrect: bool,
    /// Treat `Missing` as fixable (apply the change). If `false`, skip it.
    pub fix_missing: bool,
    /// Propagate errors from `apply()`. If `false`, log them and count as failed.
    pub bail_on_error: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Fix both missing and incorrect resources, bailing on errors.
    #[must_use]
    pub const fn apply_all(verb: &'a str, done: &'a str) -> Self {
        Self {
            verb,
            done,
            fix_incorrect: true,
            fix_missing: true,
            bail_on_error: true,
        }
    }

    /// Install only missing resources, reporting errors instead of bailing.
    #[must_use]
    pub const fn install_missing(verb: &'a str, done: &'a str) -> Self {
        Self {
            verb,
            done,
            fix_incorrect: false,
            fix_missing: true,
            bail_on_error: false,
        }
    }

    /// Report errors instead of bailing.
    #[must_use]
    pub const fn no_bail(mut self) -> Self {
        self.bail_on_error = false;
        self
    }
}

/// Process resources by checking each one's current state and applying as needed.
///
/// Resources are handled strictly in iteration order. The interrupt flag is
/// checked before each one.
///
/// # Errors
///
/// Returns [`SetupError::Interrupted`] once the user has pressed Ctrl-C, or
/// an error if a resource fails to report its state, or fails to apply while
/// `opts.bail_on_error` is set.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        if ctx.is_interrupted() {
            return Err(SetupError::Interrupted.into());
        }
        let current = resource.current_state()?;
        stats += apply::process_single(ctx, &resource, current, opts)?;
    }
    Ok(stats.finish(ctx))
}

/// Process resources with pre-computed states.
///
/// # Errors
///
/// Returns [`SetupError::Interrupted`] once the user has pressed Ctrl-C, or
/// an error if a resource fails to apply while `opts.bail_on_error` is set.
pub fn process_resource_states<R: Resource>(
    ctx: &Context,
    resource_states: impl IntoIterator<Item = (R, ResourceState)>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for (resource, current) in resource_states {
        if ctx.is_interrupted() {
            return Err(SetupError::Interrupted.into());
        }
        stats += apply::process_single(ctx, &resource, current, opts)?;
    }
    Ok(stats.finish(ctx))
}
