//! Oh My Zsh and its plugins.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::plugin::PluginResource;

/// The Oh My Zsh installer pipeline for `install_url`, run unattended so it
/// neither switches the login shell nor starts a new one.
fn oh_my_zsh_command(install_url: &str) -> String {
    format!(r#"sh -c "$(curl -fsSL {install_url})" "" --unattended"#)
}

/// Install the Oh My Zsh framework into `~/.oh-my-zsh`.
#[derive(Debug)]
pub struct InstallOhMyZsh;

impl Task for InstallOhMyZsh {
    fn name(&self) -> &'static str {
        "Install Oh My Zsh"
    }

    fn id(&self) -> &'static str {
        "oh-my-zsh"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let dir = ctx.oh_my_zsh_dir();
        if ctx.fs_ops.exists(&dir) {
            ctx.log.success("Oh My Zsh already installed");
            return Ok(TaskResult::Ok);
        }

        let command = oh_my_zsh_command(&ctx.manifest.shell.install_url);
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would run {command}"));
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info("Installing Oh My Zsh...");
        ctx.executor.run_interactive("/bin/sh", &["-c", &command])?;
        ctx.log.success("Oh My Zsh installed");
        Ok(TaskResult::Ok)
    }
}

/// Clone the configured zsh plugins into `~/.oh-my-zsh/custom/plugins`.
#[derive(Debug)]
pub struct InstallZshPlugins;

impl Task for InstallZshPlugins {
    fn name(&self) -> &'static str {
        "Install zsh plugins"
    }

    fn id(&self) -> &'static str {
        "zsh-plugins"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let plugins = &ctx.manifest.shell.plugins;
        if plugins.is_empty() {
            return Ok(TaskResult::Skipped("no plugins configured".to_string()));
        }

        let dir = ctx.zsh_plugins_dir();
        if !ctx.dry_run && !ctx.fs_ops.is_dir(&dir) {
            ctx.log.debug(&format!("creating {}", dir.display()));
            ctx.fs_ops.create_dir_all(&dir)?;
        }

        let cloner = ctx.cloner.as_ref();
        let fs_ops = ctx.fs_ops.as_ref();
        process_resources(
            ctx,
            plugins.iter().map(|plugin| {
                PluginResource::new(plugin.clone(), dir.join(&plugin.name), cloner, fs_ops)
            }),
            &ProcessOpts::install_missing("install", "installed"),
        )
    }
}
