//! Zsh plugin checkout resource.
use anyhow::Result;
use std::path::PathBuf;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::Plugin;
use crate::git::RepoCloner;
use crate::operations::FileSystemOps;

/// A zsh plugin checked out under the Oh My Zsh custom plugins directory.
#[derive(Debug)]
pub struct PluginResource<'a> {
    /// Plugin name and remote.
    pub plugin: Plugin,
    /// Checkout location (`<plugins_dir>/<name>`).
    pub dest: PathBuf,
    cloner: &'a dyn RepoCloner,
    fs_ops: &'a dyn FileSystemOps,
}

impl<'a> PluginResource<'a> {
    /// Create a resource cloning `plugin` into `dest`.
    #[must_use]
    pub fn new(
        plugin: Plugin,
        dest: PathBuf,
        cloner: &'a dyn RepoCloner,
        fs_ops: &'a dyn FileSystemOps,
    ) -> Self {
        Self {
            plugin,
            dest,
            cloner,
            fs_ops,
        }
    }
}

impl Applicable for PluginResource<'_> {
    fn description(&self) -> String {
        self.plugin.name.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.cloner.clone_repo(&self.plugin.url, &self.dest)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PluginResource<'_> {
    /// Any existing entry at the destination counts as installed; plugins
    /// are never updated or re-cloned.
    fn current_state(&self) -> Result<ResourceState> {
        if self.fs_ops.exists(&self.dest) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
