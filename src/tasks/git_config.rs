//! Git identity and global settings.
use anyhow::{Context as _, Result};

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::git_config::GitConfigResource;

/// Set the global git identity and the manifest's git settings.
#[derive(Debug)]
pub struct ConfigureGit;

impl ConfigureGit {
    /// Ask for the identity; empty answers leave that field unset.
    fn identity(ctx: &Context) -> Result<Vec<(&'static str, String)>> {
        if ctx.dry_run {
            ctx.log.dry_run("would ask for git user name and email");
            return Ok(Vec::new());
        }
        let name = ctx
            .prompter
            .text("Git user name")
            .context("reading git user name")?;
        let email = ctx
            .prompter
            .text("Git user email")
            .context("reading git user email")?;

        let mut identity = Vec::new();
        for (key, value) in [("user.name", name), ("user.email", email)] {
            if value.is_empty() {
                ctx.log.debug(&format!("no {key} entered, leaving it unset"));
            } else {
                identity.push((key, value));
            }
        }
        Ok(identity)
    }
}

impl Task for ConfigureGit {
    fn name(&self) -> &'static str {
        "Configure git"
    }

    fn id(&self) -> &'static str {
        "git"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.executor.which("git")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let executor = ctx.executor.as_ref();
        let identity = Self::identity(ctx)?;
        let resources = identity
            .into_iter()
            .map(|(key, value)| GitConfigResource::new(key.to_string(), value, executor))
            .chain(ctx.manifest.git.settings.iter().map(|s| {
                GitConfigResource::new(s.key.clone(), s.value.clone(), executor)
            }));

        let result = process_resources(ctx, resources, &ProcessOpts::apply_all("set", "set"))?;
        if result == TaskResult::Ok {
            ctx.log.success("Git configuration completed");
        }
        Ok(result)
    }
}
