//! VS Code integration: command-line launcher check and Settings Sync guidance.
//!
//! None of these steps persist anything; they only inspect the search path,
//! open the editor, and print instructions.
use anyhow::Result;

use super::{Context, Task, TaskResult};

const SETTINGS_SYNC_STEPS: &[&str] = &[
    "",
    "📋 Manual steps to complete:",
    "1. In VS Code, press Cmd+Shift+P to open Command Palette",
    "2. Type 'Settings Sync: Turn On' and select it",
    "3. Choose 'Sign in with GitHub'",
    "4. Complete the GitHub authentication",
    "5. Your extensions and settings will sync automatically!",
    "",
    "🔄 On future machines, just sign into GitHub in VS Code",
    "   and your extensions/settings will sync automatically.",
];

const EXTENSION_GUIDANCE: &[&str] = &[
    "💡 Using VS Code Settings Sync for extensions and settings:",
    "   • Sign into GitHub in VS Code",
    "   • Enable Settings Sync",
    "   • All your extensions and settings will sync automatically!",
    "   • Works across all your machines",
];

/// Report whether the editor's command-line launcher is on the search path.
#[derive(Debug)]
pub struct CheckEditorLauncher;

impl Task for CheckEditorLauncher {
    fn name(&self) -> &'static str {
        "Check VS Code command-line launcher"
    }

    fn id(&self) -> &'static str {
        "editor-launcher"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.executor.which(&ctx.manifest.editor.launcher) {
            ctx.log
                .success("VS Code command line tools already available");
        } else {
            ctx.log.warn(
                "Please open VS Code and run 'Shell Command: Install code command in PATH'",
            );
            ctx.log.warn("Or add VS Code to your PATH manually");
        }
        Ok(TaskResult::Ok)
    }
}

/// Open the editor and print the manual Settings Sync steps.
#[derive(Debug)]
pub struct SetupSettingsSync;

impl Task for SetupSettingsSync {
    fn name(&self) -> &'static str {
        "Set up VS Code Settings Sync"
    }

    fn id(&self) -> &'static str {
        "settings-sync"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let launcher = &ctx.manifest.editor.launcher;
        if !ctx.executor.which(launcher) {
            ctx.log
                .warn("VS Code CLI not available. VS Code should be installed first.");
            return Ok(TaskResult::Skipped(format!("{launcher} not found")));
        }

        if ctx.dry_run {
            ctx.log.dry_run(&format!("would open VS Code with {launcher}"));
        } else {
            ctx.log.info("Opening VS Code to set up Settings Sync...");
            let result = ctx.executor.run_unchecked(launcher, &[])?;
            if result.success {
                ctx.log.success("VS Code opened");
            } else {
                ctx.log.debug(&format!(
                    "{launcher} exited with {:?}: {}",
                    result.code,
                    result.stderr.trim()
                ));
            }
        }

        for line in SETTINGS_SYNC_STEPS {
            ctx.log.plain(line);
        }
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}

/// Print how extensions are managed through Settings Sync.
#[derive(Debug)]
pub struct ExtensionGuidance;

impl Task for ExtensionGuidance {
    fn name(&self) -> &'static str {
        "VS Code extensions"
    }

    fn id(&self) -> &'static str {
        "extensions"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        for line in EXTENSION_GUIDANCE {
            ctx.log.plain(line);
        }
        ctx.log
            .success("VS Code extension management via Settings Sync recommended");
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::RecordedLine;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{make_context, make_dry_run_context, recording};
    use std::sync::Arc;

    fn plain_count(lines: &[RecordedLine]) -> usize {
        lines
            .iter()
            .filter(|l| matches!(l, RecordedLine::Plain(_)))
            .count()
    }

    #[test]
    fn launcher_present_is_reported() {
        let ctx = make_context().with_executor(Arc::new(MockExecutor::default().with_program("code")));
        let (ctx, log) = recording(ctx);
        assert_eq!(CheckEditorLauncher.run(&ctx).unwrap(), TaskResult::Ok);
        assert!(log.contains("VS Code command line tools already available"));
        assert!(log.warnings().is_empty());
    }

    #[test]
    fn launcher_missing_warns_with_instructions() {
        let (ctx, log) = recording(make_context());
        assert_eq!(CheckEditorLauncher.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(
            log.warnings(),
            [
                "Please open VS Code and run 'Shell Command: Install code command in PATH'",
                "Or add VS Code to your PATH manually",
            ]
        );
    }

    #[test]
    fn settings_sync_skipped_without_launcher() {
        let (ctx, log) = recording(make_context());
        assert_eq!(
            SetupSettingsSync.run(&ctx).unwrap(),
            TaskResult::Skipped("code not found".to_string())
        );
        assert_eq!(
            log.warnings(),
            ["VS Code CLI not available. VS Code should be installed first."]
        );
        assert_eq!(plain_count(&log.lines()), 0);
    }

    #[test]
    fn settings_sync_opens_editor_and_prints_steps() {
        let executor = Arc::new(MockExecutor::ok("").with_program("code"));
        let (ctx, log) = recording(make_context().with_executor(executor.clone()));
        assert_eq!(SetupSettingsSync.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(executor.calls(), ["code"]);
        assert!(log.contains("VS Code opened"));
        assert!(log.contains("2. Type 'Settings Sync: Turn On' and select it"));
        assert_eq!(plain_count(&log.lines()), SETTINGS_SYNC_STEPS.len());
    }

    #[test]
    fn settings_sync_tolerates_launcher_failure() {
        let executor = Arc::new(MockExecutor::fail().with_program("code"));
        let (ctx, log) = recording(make_context().with_executor(executor));
        assert_eq!(SetupSettingsSync.run(&ctx).unwrap(), TaskResult::Ok);
        assert!(!log.contains("VS Code opened"));
        assert!(log.contains("📋 Manual steps to complete:"));
    }

    #[test]
    fn settings_sync_dry_run_does_not_open_editor() {
        let executor = Arc::new(MockExecutor::default().with_program("code"));
        let (ctx, log) = make_dry_run_context();
        let ctx = ctx.with_executor(executor.clone());
        assert_eq!(SetupSettingsSync.run(&ctx).unwrap(), TaskResult::DryRun);
        assert_eq!(executor.call_count(), 0);
        assert!(log.contains("would open VS Code with code"));
    }

    #[test]
    fn extension_guidance_prints_block() {
        let (ctx, log) = recording(make_context());
        assert_eq!(ExtensionGuidance.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(plain_count(&log.lines()), EXTENSION_GUIDANCE.len());
        assert!(
            log.lines().contains(&RecordedLine::Success(
                "VS Code extension management via Settings Sync recommended".to_string()
            ))
        );
    }
}
