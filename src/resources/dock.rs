//! Dock tile resource: an application pinned to `com.apple.dock persistent-apps`.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::operations::FileSystemOps;

/// The `persistent-apps` tile dictionary for the application bundle at `path`.
#[must_use]
pub fn tile_xml(path: &Path) -> String {
    format!(
        "<dict><key>tile-data</key><dict><key>file-data</key><dict>\
         <key>_CFURLString</key><string>{}</string>\
         <key>_CFURLStringType</key><integer>0</integer>\
         </dict></dict></dict>",
        path.display()
    )
}

/// Display name of an application bundle (`/Applications/Slack.app` → `Slack`).
#[must_use]
pub fn app_name(path: &Path) -> String {
    path.file_stem().map_or_else(
        || path.display().to_string(),
        |s| s.to_string_lossy().to_string(),
    )
}

/// An application appended to the (freshly cleared) Dock.
///
/// Always reported `Missing` when the bundle exists, since the Dock step
/// clears `persistent-apps` before adding tiles.
#[derive(Debug)]
pub struct DockAppResource<'a> {
    /// Application bundle path.
    pub path: PathBuf,
    executor: &'a dyn Executor,
    fs_ops: &'a dyn FileSystemOps,
}

impl<'a> DockAppResource<'a> {
    /// Create a resource pinning the bundle at `path`.
    #[must_use]
    pub fn new(path: PathBuf, executor: &'a dyn Executor, fs_ops: &'a dyn FileSystemOps) -> Self {
        Self {
            path,
            executor,
            fs_ops,
        }
    }
}

impl Applicable for DockAppResource<'_> {
    fn description(&self) -> String {
        app_name(&self.path)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let tile = tile_xml(&self.path);
        self.executor.run(
            "defaults",
            &["write", "com.apple.dock", "persistent-apps", "-array-add", &tile],
        )?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DockAppResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.fs_ops.exists(&self.path) {
            Ok(ResourceState::Missing)
        } else {
            Ok(ResourceState::Invalid {
                reason: format!("{} not found at {}", app_name(&self.path), self.path.display()),
            })
        }
    }
}
