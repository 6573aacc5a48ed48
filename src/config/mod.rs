//! The workstation manifest: everything a run installs or configures.
//!
//! The default manifest is compiled into the binary from
//! `conf/manifest.toml`; [`Manifest::load`] reads an alternative file with
//! the same schema.
pub mod packages;
pub mod validation;

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use packages::{Package, PackageKind, PackagesSection};

const BUILTIN_MANIFEST: &str = include_str!("../../conf/manifest.toml");

/// Errors raised while loading a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or does not match the schema.
    #[error("invalid manifest {origin}: {source}")]
    Parse {
        /// File path, or `<builtin>` for the embedded manifest.
        origin: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level manifest document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Homebrew formulae and casks.
    #[serde(default)]
    pub packages: PackagesSection,
    /// Oh My Zsh and its plugins.
    pub shell: ShellSection,
    /// Files copied from the bundled dotfiles directory.
    #[serde(default)]
    pub dotfiles: DotfilesSection,
    /// Global git settings applied after the identity prompts.
    #[serde(default)]
    pub git: GitSection,
    /// SSH key location.
    pub ssh: SshSection,
    /// Key remapping.
    pub keyboard: KeyboardSection,
    /// Dock layout and preferences.
    #[serde(default)]
    pub dock: DockSection,
    /// Editor integration.
    pub editor: EditorSection,
}

impl Manifest {
    /// The manifest compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] if the embedded document is malformed.
    pub fn builtin() -> Result<Self, ManifestError> {
        Self::parse(BUILTIN_MANIFEST, "<builtin>")
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the file cannot be read, or
    /// [`ManifestError::Parse`] if it does not match the schema.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse manifest text; `origin` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] if `content` does not match the schema.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ManifestError> {
        toml::from_str(content).map_err(|source| ManifestError::Parse {
            origin: origin.to_string(),
            source,
        })
    }
}

/// Oh My Zsh installer and plugin list.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellSection {
    /// URL of the Oh My Zsh install script.
    pub install_url: String,
    /// Plugins cloned after the framework is installed.
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

/// A zsh plugin cloned into the Oh My Zsh custom plugins directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plugin {
    /// Directory name under `custom/plugins`.
    pub name: String,
    /// Git remote to clone.
    pub url: String,
}

/// The `[dotfiles]` manifest section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DotfilesSection {
    /// File names relative to both the dotfiles directory and `$HOME`.
    #[serde(default)]
    pub files: Vec<String>,
}

/// The `[git]` manifest section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitSection {
    /// Settings written with `git config --global`, in order.
    #[serde(default)]
    pub settings: Vec<GitSetting>,
}

/// A global git configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitSetting {
    /// Dotted key, e.g. `init.defaultBranch`.
    pub key: String,
    /// Desired value.
    pub value: String,
}

/// The `[ssh]` manifest section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshSection {
    /// Private key file name under `~/.ssh`.
    pub key_file: String,
}

/// Key remapping applied via `hidutil` and persisted with a LaunchAgent.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyboardSection {
    /// LaunchAgent label; the plist is `~/Library/LaunchAgents/<label>.plist`.
    pub label: String,
    /// HID usage code of the key being remapped.
    pub source: u64,
    /// HID usage code it should produce.
    pub destination: u64,
}

/// The `[dock]` manifest section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockSection {
    /// Application bundles to pin, left to right.
    #[serde(default)]
    pub apps: Vec<String>,
    /// `com.apple.dock` preferences.
    #[serde(default)]
    pub settings: Vec<DockSetting>,
}

/// A `com.apple.dock` preference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockSetting {
    /// Preference key.
    pub key: String,
    /// Desired value.
    pub value: DefaultsValue,
}

/// A typed value for `defaults write`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DefaultsValue {
    /// Written with `-bool`.
    Bool(bool),
    /// Written with `-int`.
    Int(i64),
    /// Written with `-string`.
    String(String),
}

impl DefaultsValue {
    /// The `defaults write` type flag.
    #[must_use]
    pub const fn type_flag(&self) -> &'static str {
        match self {
            Self::Bool(_) => "-bool",
            Self::Int(_) => "-int",
            Self::String(_) => "-string",
        }
    }

    /// Whether `defaults read` output represents this value.
    ///
    /// `defaults read` prints booleans as `1`/`0`.
    #[must_use]
    pub fn matches_read(&self, output: &str) -> bool {
        let output = output.trim();
        match self {
            Self::Bool(b) => output == if *b { "1" } else { "0" },
            Self::Int(i) => output.parse::<i64>().is_ok_and(|v| v == *i),
            Self::String(s) => output == s,
        }
    }
}

impl fmt::Display for DefaultsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// The `[editor]` manifest section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorSection {
    /// Command-line launcher installed by the editor.
    pub launcher: String,
}
