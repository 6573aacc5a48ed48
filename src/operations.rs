//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that guard checks ("is the Dock
//! app installed?", "does the key file exist?") can be unit-tested without
//! touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use anyhow::{Context as _, Result};
use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

/// Abstraction over filesystem queries used by tasks.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read the whole of `path` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be read or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Create `path` and all of its parents.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure existing paths and file contents using the builder-style
/// methods, then install it on a context with
/// [`Context::with_fs_ops`](crate::tasks::Context::with_fs_ops).
///
/// # Example
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_dir("/Applications/Slack.app")
///     .with_file("/home/test/.ssh/id_ed25519.pub", "ssh-ed25519 AAAA me@example.com\n");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    existing: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
    files: std::collections::HashMap<PathBuf, String>,
    created: std::sync::Mutex<Vec<PathBuf>>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing without giving it content.
    #[must_use]
    pub fn with_existing(mut self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        if !self.existing.contains(&p) {
            self.existing.push(p);
        }
        self
    }

    /// Mark `path` as an existing directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        self.dirs.push(p.clone());
        self.with_existing(p)
    }

    /// Mark `path` as a regular file containing `content`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        let p = path.into();
        self.files.insert(p.clone(), content.to_string());
        self.with_existing(p)
    }

    /// Directories passed to [`FileSystemOps::create_dir_all`] so far.
    #[must_use]
    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.created
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.existing.iter().any(|p| p == path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.iter().any(|p| p == path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("mock: no content configured for {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.created
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn system_ops_reads_and_probes_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("probe.txt");
        std::fs::write(&file, "hello").unwrap();

        let ops = SystemFileSystemOps;
        assert!(ops.exists(&file));
        assert!(!ops.is_dir(&file));
        assert!(ops.is_dir(dir.path()));
        assert_eq!(ops.read_to_string(&file).unwrap(), "hello");
        assert!(!ops.exists(&dir.path().join("missing")));
    }

    #[test]
    fn system_ops_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        SystemFileSystemOps.create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn mock_reports_configured_paths_only() {
        let ops = MockFileSystemOps::new()
            .with_dir("/Applications/Slack.app")
            .with_file("/home/test/.ssh/id_ed25519.pub", "ssh-ed25519 AAAA\n");

        assert!(ops.exists(Path::new("/Applications/Slack.app")));
        assert!(ops.is_dir(Path::new("/Applications/Slack.app")));
        assert!(!ops.exists(Path::new("/Applications/Firefox.app")));
        assert_eq!(
            ops.read_to_string(Path::new("/home/test/.ssh/id_ed25519.pub"))
                .unwrap(),
            "ssh-ed25519 AAAA\n"
        );
        assert!(
            ops.read_to_string(Path::new("/nope")).is_err(),
            "unconfigured file should not be readable"
        );
    }

    #[test]
    fn mock_records_created_dirs() {
        let ops = MockFileSystemOps::new();
        ops.create_dir_all(Path::new("/home/test/.ssh")).unwrap();
        assert_eq!(ops.created_dirs(), vec![PathBuf::from("/home/test/.ssh")]);
    }
}
