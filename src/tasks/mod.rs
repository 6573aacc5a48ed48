//! Named, ordered setup steps that orchestrate resource changes.
mod context;
pub mod dock;
pub mod dotfiles;
pub mod editor;
pub mod git_config;
pub mod homebrew;
pub mod keyboard;
pub mod packages;
pub mod prerequisites;
mod processing;
pub mod shell;
pub mod ssh;

pub use context::Context;
pub use processing::{
    ProcessOpts, TaskResult, TaskStats, process_resource_states, process_resources,
};

use anyhow::Result;

use crate::error::SetupError;
use crate::logging::TaskStatus;

/// How a step failure affects the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Failure stops the run.
    Fatal,
    /// Failure is recorded and the run continues with the next step.
    Tolerated,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => f.pad("fatal"),
            Self::Tolerated => f.pad("tolerated"),
        }
    }
}

/// A named, executable step.
pub trait Task: Send + Sync + std::fmt::Debug {
    /// Human-readable step name, used as the stage header.
    fn name(&self) -> &'static str;

    /// Short identifier accepted by `install --skip` and `install --only`.
    fn id(&self) -> &'static str;

    /// Whether a failure of this step stops the run.
    fn severity(&self) -> Severity {
        Severity::Tolerated
    }

    /// Whether this step applies to the current machine (e.g. its tool is installed).
    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails, such as when a system command
    /// fails, a file cannot be written, or the user interrupts a prompt.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete, ordered set of steps run by the install command.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(prerequisites::InstallXcodeTools),
        Box::new(homebrew::InstallHomebrew),
        Box::new(packages::InstallPackages),
        Box::new(shell::InstallOhMyZsh),
        Box::new(shell::InstallZshPlugins),
        Box::new(dotfiles::CopyDotfiles),
        Box::new(git_config::ConfigureGit),
        Box::new(ssh::SetupSshKey),
        Box::new(keyboard::RemapCapsLock),
        Box::new(dock::ConfigureDock),
        Box::new(editor::CheckEditorLauncher),
        Box::new(editor::SetupSettingsSync),
        Box::new(editor::ExtensionGuidance),
    ]
}

/// Execute a step, recording the result in the logger.
///
/// A failure is logged and recorded. It is only returned to the caller when
/// the step is [`Severity::Fatal`] or the user interrupted it.
///
/// # Errors
///
/// Returns the step's error if it is fatal or an interruption.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping step: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) if SetupError::is_interrupted(&e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some("interrupted"));
            return Err(e);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            if task.severity() == Severity::Fatal {
                return Err(e);
            }
        }
    }
    Ok(())
}
