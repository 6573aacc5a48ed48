//! Bundled dotfile deployment.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resource_states};
use crate::resources::dotfile::DotfileResource;
use crate::resources::{Resource, ResourceState};

/// Copy the bundled dotfiles into the home directory.
///
/// An existing file is moved to `<name>.backup` first, whatever its content.
#[derive(Debug)]
pub struct CopyDotfiles;

impl Task for CopyDotfiles {
    fn name(&self) -> &'static str {
        "Copy dotfiles"
    }

    fn id(&self) -> &'static str {
        "dotfiles"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(dir) = ctx.dotfiles_dir.as_deref().filter(|d| d.is_dir()) else {
            ctx.log.error("dotfiles directory not found");
            return Ok(TaskResult::Skipped(
                "dotfiles directory not found".to_string(),
            ));
        };
        ctx.log.debug(&format!("dotfiles directory: {}", dir.display()));

        let mut states = Vec::with_capacity(ctx.manifest.dotfiles.files.len());
        for file in &ctx.manifest.dotfiles.files {
            let resource = DotfileResource::new(dir.join(file), ctx.home.join(file));
            let state = resource.current_state()?;
            if matches!(state, ResourceState::Incorrect { .. }) && !ctx.dry_run {
                ctx.log.info(&format!(
                    "backing up existing {file} to {}",
                    resource.backup_path().display()
                ));
            }
            states.push((resource, state));
        }

        process_resource_states(ctx, states, &ProcessOpts::apply_all("copy", "copied").no_bail())
    }
}
