//! Non-fatal manifest checks reported before a run starts.
use std::collections::HashSet;
use std::path::Path;

use super::Manifest;

/// A validation warning detected while checking the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The manifest section (e.g., "packages", "dock").
    pub section: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning for `item` in `section`.
    #[must_use]
    pub fn new(
        section: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.section, self.item, self.message)
    }
}

/// Check `manifest` for common mistakes.
#[must_use]
pub fn validate(manifest: &Manifest) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let packages: Vec<&str> = manifest
        .packages
        .formulae
        .iter()
        .chain(&manifest.packages.casks)
        .map(String::as_str)
        .collect();
    duplicates("packages", packages, &mut warnings);

    duplicates(
        "shell",
        manifest.shell.plugins.iter().map(|p| p.name.as_str()),
        &mut warnings,
    );
    for plugin in &manifest.shell.plugins {
        if plugin.url.trim().is_empty() {
            warnings.push(ValidationWarning::new("shell", &plugin.name, "plugin URL is empty"));
        }
    }
    if manifest.shell.install_url.trim().is_empty() {
        warnings.push(ValidationWarning::new("shell", "install_url", "installer URL is empty"));
    }

    duplicates(
        "dotfiles",
        manifest.dotfiles.files.iter().map(String::as_str),
        &mut warnings,
    );
    for file in &manifest.dotfiles.files {
        if Path::new(file).is_absolute() {
            warnings.push(ValidationWarning::new(
                "dotfiles",
                file,
                "file should be relative to the dotfiles directory",
            ));
        }
    }

    duplicates(
        "git",
        manifest.git.settings.iter().map(|s| s.key.as_str()),
        &mut warnings,
    );

    if manifest.keyboard.label.trim().is_empty() {
        warnings.push(ValidationWarning::new("keyboard", "label", "LaunchAgent label is empty"));
    }

    duplicates(
        "dock",
        manifest.dock.apps.iter().map(String::as_str),
        &mut warnings,
    );
    for app in &manifest.dock.apps {
        if !Path::new(app).is_absolute() {
            warnings.push(ValidationWarning::new(
                "dock",
                app,
                "application path should be absolute",
            ));
        }
    }
    duplicates(
        "dock",
        manifest.dock.settings.iter().map(|s| s.key.as_str()),
        &mut warnings,
    );

    warnings
}

fn duplicates<'a>(
    section: &str,
    items: impl IntoIterator<Item = &'a str>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            warnings.push(ValidationWarning::new(section, item, "listed more than once"));
        }
    }
}
