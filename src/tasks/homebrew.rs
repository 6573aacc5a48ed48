//! Homebrew bootstrap.
use anyhow::Result;

use super::{Context, Task, TaskResult};

/// Official Homebrew installer pipeline, run by `/bin/sh` with the terminal attached.
const INSTALL_COMMAND: &str = r#"/bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;

/// Install Homebrew and make its `bin` directory visible to later steps.
#[derive(Debug)]
pub struct InstallHomebrew;

impl InstallHomebrew {
    /// Prepend `<prefix>/bin` to the run's search path when it holds `brew`.
    fn thread_prefix(ctx: &Context) -> bool {
        let bin = ctx.platform.homebrew_prefix().join("bin");
        if ctx.fs_ops.exists(&bin.join("brew")) {
            ctx.log.debug(&format!("adding {} to search path", bin.display()));
            ctx.search_path.prepend(&bin);
            true
        } else {
            false
        }
    }
}

impl Task for InstallHomebrew {
    fn name(&self) -> &'static str {
        "Install Homebrew"
    }

    fn id(&self) -> &'static str {
        "homebrew"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.executor.which("brew") || Self::thread_prefix(ctx) {
            ctx.log.success("Homebrew already installed");
            return Ok(TaskResult::Ok);
        }

        if ctx.dry_run {
            ctx.log.dry_run("would run the Homebrew installer");
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info("Installing Homebrew...");
        ctx.executor.run_interactive("/bin/sh", &["-c", INSTALL_COMMAND])?;
        if !Self::thread_prefix(ctx) {
            ctx.log.debug("brew not found under the expected prefix");
        }
        ctx.log.success("Homebrew installed");
        Ok(TaskResult::Ok)
    }
}
