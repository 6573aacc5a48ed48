//! Dock layout and preferences.
use anyhow::Result;
use std::path::PathBuf;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::defaults::DefaultsResource;
use crate::resources::dock::DockAppResource;

const DOCK_DOMAIN: &str = "com.apple.dock";

/// Replace the pinned Dock items with the manifest's apps and apply the
/// Dock preferences.
///
/// The existing `persistent-apps` list is always cleared first; apps that
/// are not installed are skipped with a warning.
#[derive(Debug)]
pub struct ConfigureDock;

impl Task for ConfigureDock {
    fn name(&self) -> &'static str {
        "Configure Dock"
    }

    fn id(&self) -> &'static str {
        "dock"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let dock = &ctx.manifest.dock;
        let executor = ctx.executor.as_ref();
        let fs_ops = ctx.fs_ops.as_ref();

        if ctx.dry_run {
            ctx.log.dry_run("would clear the Dock");
        } else {
            ctx.log.info("Clearing current Dock...");
            executor.run("defaults", &["write", DOCK_DOMAIN, "persistent-apps", "-array"])?;
        }

        ctx.log.info("Adding applications to Dock...");
        process_resources(
            ctx,
            dock.apps
                .iter()
                .map(|path| DockAppResource::new(PathBuf::from(path), executor, fs_ops)),
            &ProcessOpts::apply_all("add", "added to Dock"),
        )?;

        ctx.log.info("Configuring Dock settings...");
        process_resources(
            ctx,
            dock.settings
                .iter()
                .map(|s| DefaultsResource::new(DOCK_DOMAIN, &s.key, s.value.clone(), executor)),
            &ProcessOpts::apply_all("set", "set"),
        )?;

        if ctx.dry_run {
            ctx.log.dry_run("would restart the Dock");
            return Ok(TaskResult::DryRun);
        }
        executor.run("killall", &["Dock"])?;
        ctx.log.success("Dock configured");
        Ok(TaskResult::Ok)
    }
}
