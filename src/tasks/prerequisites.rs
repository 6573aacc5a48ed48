//! Xcode Command Line Tools prerequisite.
use anyhow::Result;

use super::{Context, Severity, Task, TaskResult};
use crate::error::SetupError;

const XCODE_TOOLS: &str = "Xcode Command Line Tools";

/// Ensure the Xcode Command Line Tools are present.
///
/// The installer runs asynchronously in a system dialog, so a missing
/// toolchain starts it and then stops the run.
#[derive(Debug)]
pub struct InstallXcodeTools;

impl Task for InstallXcodeTools {
    fn name(&self) -> &'static str {
        "Install Xcode Command Line Tools"
    }

    fn id(&self) -> &'static str {
        "xcode"
    }

    fn severity(&self) -> Severity {
        Severity::Fatal
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let check = ctx.executor.run_unchecked("xcode-select", &["-p"])?;
        if check.success {
            ctx.log.debug(&format!("developer dir: {}", check.stdout.trim()));
            ctx.log.success(&format!("{XCODE_TOOLS} already installed"));
            return Ok(TaskResult::Ok);
        }

        if ctx.dry_run {
            ctx.log.dry_run("would run xcode-select --install");
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info(&format!("Installing {XCODE_TOOLS}..."));
        ctx.executor.run("xcode-select", &["--install"])?;
        ctx.log
            .warn("Please complete the installation and run this script again");
        Err(SetupError::PrerequisiteMissing {
            what: XCODE_TOOLS.to_string(),
        }
        .into())
    }
}
