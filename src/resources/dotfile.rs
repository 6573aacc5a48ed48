//! Dotfile resource: a bundled file copied into `$HOME`.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A dotfile copied from the bundled dotfiles directory into the home directory.
///
/// Any existing target is renamed to `<name>.backup` before the copy, so
/// there is one backup generation and a previous backup is overwritten.
#[derive(Debug, Clone)]
pub struct DotfileResource {
    /// Source file in the dotfiles directory (e.g., `dotfiles/.zshrc`).
    pub source: PathBuf,
    /// Target path in the home directory (e.g., `~/.zshrc`).
    pub target: PathBuf,
}

impl DotfileResource {
    /// Create a resource copying `source` over `target`.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Where an existing target is moved before being replaced.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .target
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".backup");
        self.target.with_file_name(name)
    }

    fn name(&self) -> String {
        self.source.file_name().map_or_else(
            || self.source.display().to_string(),
            |n| n.to_string_lossy().to_string(),
        )
    }
}

impl Applicable for DotfileResource {
    fn description(&self) -> String {
        self.name()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if let Some(parent) = self.target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create parent directory: {}", parent.display()))?;
        }

        if self.target.exists() {
            let backup = self.backup_path();
            std::fs::rename(&self.target, &backup).with_context(|| {
                format!(
                    "back up {} to {}",
                    self.target.display(),
                    backup.display()
                )
            })?;
        }

        // fs::copy carries permission bits across
        std::fs::copy(&self.source, &self.target)
            .with_context(|| format!("copy {} to {}", self.source.display(), self.target.display()))?;

        let modified = std::fs::metadata(&self.source)
            .and_then(|m| m.modified())
            .with_context(|| format!("read modification time: {}", self.source.display()))?;
        std::fs::File::open(&self.target)
            .and_then(|f| f.set_modified(modified))
            .with_context(|| format!("set modification time: {}", self.target.display()))?;

        Ok(ResourceChange::Applied)
    }
}

impl Resource for DotfileResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.is_file() {
            return Ok(ResourceState::Invalid {
                reason: format!("{} not found in {}", self.name(), parent_display(&self.source)),
            });
        }

        if self.target.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("{} is a directory", self.target.display()),
            });
        }

        if !self.target.exists() {
            return Ok(ResourceState::Missing);
        }

        let src_content = std::fs::read(&self.source)
            .with_context(|| format!("read source: {}", self.source.display()))?;
        let dst_content = std::fs::read(&self.target)
            .with_context(|| format!("read target: {}", self.target.display()))?;

        // an existing target is always rotated into the backup
        let current = if src_content == dst_content {
            "present, same content"
        } else {
            "content differs"
        };
        Ok(ResourceState::Incorrect {
            current: current.to_string(),
        })
    }
}

fn parent_display(path: &std::path::Path) -> String {
    path.parent()
        .map_or_else(String::new, |p| p.display().to_string())
}
