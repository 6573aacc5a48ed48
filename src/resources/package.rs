//! Homebrew package resource.
use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::{Package, PackageKind};
use crate::exec::Executor;

/// A Homebrew formula or cask that should be installed.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// The package to install.
    pub package: Package,
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a resource for `package`.
    #[must_use]
    pub fn new(package: Package, executor: &'a dyn Executor) -> Self {
        Self { package, executor }
    }

    /// Arguments for `brew list` that succeed only when the package is installed.
    fn list_args(&self) -> Vec<&str> {
        match self.package.kind {
            PackageKind::Formula => vec!["list", &self.package.name],
            PackageKind::Cask => vec!["list", "--cask", self.package.short_name()],
        }
    }

    /// Arguments for `brew` that install the package.
    ///
    /// Tapped casks are installed by their full name without `--cask`;
    /// Homebrew resolves the tap itself.
    fn install_args(&self) -> Vec<&str> {
        match self.package.kind {
            PackageKind::Cask if !self.package.is_tapped() => {
                vec!["install", "--cask", &self.package.name]
            }
            PackageKind::Formula | PackageKind::Cask => vec!["install", &self.package.name],
        }
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        self.package.name.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor.run("brew", &self.install_args())?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PackageResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let result = self.executor.run_unchecked("brew", &self.list_args())?;
        if result.success {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
