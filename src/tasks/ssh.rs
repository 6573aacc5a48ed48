//! SSH key generation.
use anyhow::{Context as _, Result};
use std::path::Path;

use super::{Context, Task, TaskResult};
use crate::resources::error::ResourceError;
use crate::resources::ssh_key::{SshKeyResource, public_key_path};
use crate::resources::{Applicable, Resource, ResourceState};

/// Generate an ed25519 key if there is none, and show the public half.
#[derive(Debug)]
pub struct SetupSshKey;

fn print_public_key(ctx: &Context, key_path: &Path) -> Result<()> {
    let public = public_key_path(key_path);
    if !ctx.fs_ops.exists(&public) {
        return Err(ResourceError::NotFound {
            resource: public.display().to_string(),
        }
        .into());
    }
    let content = ctx
        .fs_ops
        .read_to_string(&public)
        .with_context(|| format!("read public key {}", public.display()))?;
    ctx.log.plain("Public key:");
    ctx.log.plain(content.trim());
    Ok(())
}

impl Task for SetupSshKey {
    fn name(&self) -> &'static str {
        "Set up SSH key"
    }

    fn id(&self) -> &'static str {
        "ssh"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let key_path = ctx.ssh_key_path();
        let probe = SshKeyResource::new(
            key_path.clone(),
            String::new(),
            ctx.executor.as_ref(),
            ctx.fs_ops.as_ref(),
        );
        if probe.current_state()? == ResourceState::Correct {
            ctx.log.success("SSH key already exists");
            print_public_key(ctx, &key_path)?;
            return Ok(TaskResult::Ok);
        }

        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would ask for an email and generate {}",
                key_path.display()
            ));
            return Ok(TaskResult::DryRun);
        }

        let email = ctx
            .prompter
            .text("Enter email for SSH key")
            .context("reading SSH key email")?;
        if email.is_empty() {
            return Ok(TaskResult::Skipped("no email entered".to_string()));
        }

        let resource = SshKeyResource::new(
            key_path.clone(),
            email,
            ctx.executor.as_ref(),
            ctx.fs_ops.as_ref(),
        );
        ctx.log.debug(&format!("generating {}", resource.description()));
        resource.apply()?;
        ctx.log.success("SSH key generated");
        print_public_key(ctx, &key_path)?;
        Ok(TaskResult::Ok)
    }
}
