//! Homebrew package entries.
use serde::Deserialize;

/// Whether a Homebrew package is a command-line formula or a GUI cask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Installed with `brew install`.
    Formula,
    /// Installed with `brew install --cask`.
    Cask,
}

/// A Homebrew package to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Name as written in the manifest (may carry a `user/tap/` prefix).
    pub name: String,
    /// Formula or cask.
    pub kind: PackageKind,
}

impl Package {
    /// A formula named `name`.
    #[must_use]
    pub fn formula(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PackageKind::Formula,
        }
    }

    /// A cask named `name`.
    #[must_use]
    pub fn cask(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PackageKind::Cask,
        }
    }

    /// Whether the name carries a tap prefix (`nikitabobko/tap/aerospace`).
    #[must_use]
    pub fn is_tapped(&self) -> bool {
        self.name.contains('/')
    }

    /// The last path segment of the name, as `brew list` reports it.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// The `[packages]` manifest section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagesSection {
    /// Command-line formulae.
    #[serde(default)]
    pub formulae: Vec<String>,
    /// GUI casks, optionally prefixed with a tap.
    #[serde(default)]
    pub casks: Vec<String>,
}

impl PackagesSection {
    /// Formulae followed by casks, each in manifest order.
    #[must_use]
    pub fn all(&self) -> Vec<Package> {
        self.formulae
            .iter()
            .map(Package::formula)
            .chain(self.casks.iter().map(Package::cask))
            .collect()
    }
}
