//! Command: provision the machine.
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Result, bail};

use crate::cli::{GlobalOpts, InstallOpts};
use crate::error::SetupError;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

const BANNER: &[&str] = &[
    "🚀 Mac Setup Script",
    "==================",
    "",
    "This script will set up your Mac with development tools and configurations.",
];

const NEXT_STEPS: &[&str] = &[
    "",
    "Next steps:",
    "1. Restart your terminal or run: source ~/.zshrc",
    "2. Complete VS Code Settings Sync setup if prompted",
    "3. Configure Raycast and Aerospace with your preferences",
    "4. Sign in to your applications (1Password, Slack, etc.)",
    "5. Add your SSH key to GitHub (displayed above)",
];

/// How an install run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every selected step was attempted.
    Completed,
    /// The user declined the confirmation prompt; nothing ran.
    Cancelled,
    /// The user pressed Ctrl-C; remaining steps were not started.
    Interrupted,
}

/// Run the install command.
///
/// `interrupted` is the flag set by the process's Ctrl-C handler.
///
/// # Errors
///
/// Returns [`SetupError::UnsupportedPlatform`] when not on macOS, an error if
/// the manifest cannot be loaded or a step id is unknown, and the error of a
/// fatal step.
pub fn run(
    global: &GlobalOpts,
    opts: &InstallOpts,
    log: &Arc<Logger>,
    interrupted: Arc<AtomicBool>,
) -> Result<Outcome> {
    let platform = Platform::detect();
    if !platform.is_macos() {
        return Err(SetupError::UnsupportedPlatform {
            os: platform.os.to_string(),
        }
        .into());
    }

    log.debug(&format!("macsetup {}", super::version::version()));
    let manifest = super::load_manifest(global, log.as_ref())?;
    let dotfiles_dir = super::resolve_dotfiles_dir(global);
    match &dotfiles_dir {
        Some(dir) => log.debug(&format!("dotfiles: {}", dir.display())),
        None => log.debug("dotfiles: not found"),
    }

    let mut ctx = Context::new(
        Arc::new(manifest),
        Arc::new(platform),
        Arc::clone(log) as Arc<dyn Log>,
        global.dry_run,
        dotfiles_dir,
    )?;
    ctx.interrupted = interrupted;

    let all_tasks = tasks::all_install_tasks();
    let selected = select_tasks(&all_tasks, opts)?;

    let outcome = orchestrate(&ctx, &selected, global.yes);
    match &outcome {
        Ok(Outcome::Completed) => {
            log.print_summary();
            let failures = log.failure_count();
            if failures > 0 {
                log.warn(&format!("{failures} step(s) failed, see the log above"));
            }
            log.plain("");
            log.success("🎉 Setup completed successfully!");
            for line in NEXT_STEPS {
                log.plain(line);
            }
        }
        Ok(Outcome::Interrupted) => {
            log.print_summary();
            log.warn("Setup interrupted by user");
        }
        Ok(Outcome::Cancelled) => {}
        Err(_) => log.print_summary(),
    }
    outcome
}

/// Filter `all` by the `--only` / `--skip` step ids, keeping execution order.
///
/// # Errors
///
/// Returns an error naming the first id that matches no step.
pub fn select_tasks<'a>(all: &'a [Box<dyn Task>], opts: &InstallOpts) -> Result<Vec<&'a dyn Task>> {
    for id in opts.only.iter().chain(&opts.skip) {
        if !all.iter().any(|t| t.id() == id) {
            bail!("unknown step '{id}' (see `macsetup list`)");
        }
    }

    Ok(all
        .iter()
        .filter(|t| {
            if !opts.only.is_empty() {
                return opts.only.iter().any(|o| o == t.id());
            }
            !opts.skip.iter().any(|s| s == t.id())
        })
        .map(AsRef::as_ref)
        .collect())
}

/// Confirm with the user, then execute `tasks` in order.
///
/// Failures of tolerated steps are recorded by [`tasks::execute`] and the
/// run continues. The interrupt flag is checked before and after every step.
///
/// # Errors
///
/// Returns the error of a fatal step, or a prompt failure other than an
/// interruption.
pub fn orchestrate(ctx: &Context, tasks: &[&dyn Task], assume_yes: bool) -> Result<Outcome> {
    for line in BANNER {
        ctx.log.plain(line);
    }

    if !assume_yes {
        match ctx.prompter.confirm("Continue?", false) {
            Ok(true) => {}
            Ok(false) => {
                ctx.log.plain("Setup cancelled.");
                return Ok(Outcome::Cancelled);
            }
            Err(e) if SetupError::is_interrupted(&e) => return Ok(Outcome::Interrupted),
            Err(e) => return Err(e),
        }
    }

    for task in tasks {
        if ctx.is_interrupted() {
            return Ok(Outcome::Interrupted);
        }
        match tasks::execute(*task, ctx) {
            Ok(()) => {}
            Err(e) if SetupError::is_interrupted(&e) => return Ok(Outcome::Interrupted),
            Err(e) => return Err(e),
        }
    }

    if ctx.is_interrupted() {
        return Ok(Outcome::Interrupted);
    }
    Ok(Outcome::Completed)
}
