//! Per-run state shared by every step.
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::config::Manifest;
use crate::exec::{Executor, SearchPath, SystemExecutor};
use crate::git::{Git2Cloner, RepoCloner};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;
use crate::prompt::{InquirePrompter, Prompter};

/// Shared context for step execution.
pub struct Context {
    /// Everything the run installs or configures.
    pub manifest: Arc<Manifest>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// User's home directory path.
    pub home: PathBuf,
    /// Bundled dotfiles directory, if one was found.
    pub dotfiles_dir: Option<PathBuf>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Repository cloner used for shell plugins.
    pub cloner: Arc<dyn RepoCloner>,
    /// Source of answers to interactive questions.
    pub prompter: Arc<dyn Prompter>,
    /// Directories prepended to `PATH` for child processes during this run.
    pub search_path: Arc<SearchPath>,
    /// Set by the Ctrl-C handler; checked between steps.
    pub interrupted: Arc<AtomicBool>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("manifest", &"<Manifest>")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("dotfiles_dir", &self.dotfiles_dir)
            .field("executor", &"<dyn Executor>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .field("cloner", &"<dyn RepoCloner>")
            .field("prompter", &"<dyn Prompter>")
            .field("search_path", &self.search_path)
            .field("interrupted", &self.interrupted)
            .finish()
    }
}

impl Context {
    /// Creates a new context wired to the real system.
    ///
    /// # Errors
    ///
    /// Returns an error if the `HOME` environment variable is not set.
    pub fn new(
        manifest: Arc<Manifest>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        dotfiles_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?;
        let search_path = Arc::new(SearchPath::new());

        Ok(Self {
            manifest,
            platform,
            log,
            dry_run,
            home: PathBuf::from(home),
            dotfiles_dir,
            executor: Arc::new(SystemExecutor::new(Arc::clone(&search_path))),
            fs_ops: Arc::new(SystemFileSystemOps),
            cloner: Arc::new(Git2Cloner),
            prompter: Arc::new(InquirePrompter),
            search_path,
            interrupted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether the user has pressed Ctrl-C during this run.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// `~/.oh-my-zsh`.
    #[must_use]
    pub fn oh_my_zsh_dir(&self) -> PathBuf {
        self.home.join(".oh-my-zsh")
    }

    /// `~/.oh-my-zsh/custom/plugins`.
    #[must_use]
    pub fn zsh_plugins_dir(&self) -> PathBuf {
        self.oh_my_zsh_dir().join("custom").join("plugins")
    }

    /// `~/.ssh/<key_file>`.
    #[must_use]
    pub fn ssh_key_path(&self) -> PathBuf {
        self.home.join(".ssh").join(&self.manifest.ssh.key_file)
    }

    /// `~/Library/LaunchAgents`.
    #[must_use]
    pub fn launch_agents_dir(&self) -> PathBuf {
        self.home.join("Library").join("LaunchAgents")
    }

    /// Create a copy of this context with a different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            log,
            ..self.shallow_clone()
        }
    }

    /// Create a copy of this context with a different [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            fs_ops,
            ..self.shallow_clone()
        }
    }

    /// Create a copy of this context with a different [`Executor`].
    #[must_use]
    pub fn with_executor(&self, executor: Arc<dyn Executor>) -> Self {
        Self {
            executor,
            ..self.shallow_clone()
        }
    }

    /// Create a copy of this context with a different [`Prompter`].
    #[must_use]
    pub fn with_prompter(&self, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            prompter,
            ..self.shallow_clone()
        }
    }

    /// Create a copy of this context with a different [`RepoCloner`].
    #[must_use]
    pub fn with_cloner(&self, cloner: Arc<dyn RepoCloner>) -> Self {
        Self {
            cloner,
            ..self.shallow_clone()
        }
    }

    fn shallow_clone(&self) -> Self {
        Self {
            manifest: Arc::clone(&self.manifest),
            platform: Arc::clone(&self.platform),
            log: Arc::clone(&self.log),
            dry_run: self.dry_run,
            home: self.home.clone(),
            dotfiles_dir: self.dotfiles_dir.clone(),
            executor: Arc::clone(&self.executor),
            fs_ops: Arc::clone(&self.fs_ops),
            cloner: Arc::clone(&self.cloner),
            prompter: Arc::clone(&self.prompter),
            search_path: Arc::clone(&self.search_path),
            interrupted: Arc::clone(&self.interrupted),
        }
    }
}
