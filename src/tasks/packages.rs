//! Homebrew formulae and casks.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::package::PackageResource;

/// Install Homebrew formulae, then casks.
///
/// Each package is checked with `brew list` first. A failed install is
/// reported and the remaining packages are still attempted.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install Homebrew packages"
    }

    fn id(&self) -> &'static str {
        "packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.executor.which("brew")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let packages = ctx.manifest.packages.all();
        if packages.is_empty() {
            return Ok(TaskResult::Skipped("no packages configured".to_string()));
        }
        ctx.log.debug(&format!(
            "{} formulae, {} casks",
            ctx.manifest.packages.formulae.len(),
            ctx.manifest.packages.casks.len()
        ));

        let executor = ctx.executor.as_ref();
        process_resources(
            ctx,
            packages
                .into_iter()
                .map(|p| PackageResource::new(p, executor)),
            &ProcessOpts::apply_all("install", "installed").no_bail(),
        )
    }
}
