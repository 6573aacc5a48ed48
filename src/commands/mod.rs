//! Top-level subcommand orchestration.
pub mod install;
pub mod list;
pub mod version;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{Manifest, validation};
use crate::logging::Log;

/// Environment variable that overrides the dotfiles directory.
pub const DOTFILES_ENV: &str = "MACSETUP_DOTFILES";

/// Load the manifest named by `--manifest`, or the built-in one, and report
/// any validation warnings.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub fn load_manifest(global: &GlobalOpts, log: &dyn Log) -> Result<Manifest> {
    let manifest = match &global.manifest {
        Some(path) => {
            log.debug(&format!("manifest: {}", path.display()));
            Manifest::load(path)?
        }
        None => Manifest::builtin().context("built-in manifest is invalid")?,
    };

    log.debug(&format!(
        "{} formulae, {} casks",
        manifest.packages.formulae.len(),
        manifest.packages.casks.len()
    ));
    log.debug(&format!("{} shell plugins", manifest.shell.plugins.len()));
    log.debug(&format!("{} dotfiles", manifest.dotfiles.files.len()));
    log.debug(&format!("{} dock apps", manifest.dock.apps.len()));

    let warnings = validation::validate(&manifest);
    if !warnings.is_empty() {
        log.warn(&format!("found {} manifest warning(s):", warnings.len()));
        for warning in &warnings {
            log.warn(&format!("  {warning}"));
        }
    }
    Ok(manifest)
}

/// Locate the bundled dotfiles directory.
///
/// Checked in order: `--dotfiles`, `MACSETUP_DOTFILES`, a `dotfiles/`
/// directory next to the binary or at the repository root above
/// `target/<profile>/`, and finally `./dotfiles`.
#[must_use]
pub fn resolve_dotfiles_dir(global: &GlobalOpts) -> Option<PathBuf> {
    resolve_dotfiles_dir_from(
        global.dotfiles.as_deref(),
        std::env::var_os(DOTFILES_ENV),
        std::env::current_exe().ok().as_deref(),
        std::env::current_dir().ok().as_deref(),
    )
}

fn resolve_dotfiles_dir_from(
    explicit: Option<&Path>,
    env: Option<OsString>,
    exe: Option<&Path>,
    cwd: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    if let Some(parent) = exe.and_then(Path::parent) {
        let candidates = [
            parent.join("dotfiles"),       // installed alongside the binary
            parent.join("../../dotfiles"), // target/release/ → repo root
        ];
        for candidate in &candidates {
            if candidate.is_dir() {
                return dunce::canonicalize(candidate).ok();
            }
        }
    }

    cwd.map(|dir| dir.join("dotfiles"))
        .filter(|candidate| candidate.is_dir())
}
