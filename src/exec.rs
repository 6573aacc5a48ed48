//! External command execution behind the [`Executor`] seam.
//!
//! Every step talks to the system (Homebrew, git, `defaults`, `launchctl`, …)
//! through an [`Executor`] so it can be exercised against a fake in tests.
//! [`SystemExecutor`] spawns real processes using the run's [`SearchPath`]
//! instead of mutating the process-wide `PATH`.
use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, RwLock};

use crate::resources::error::ResourceError;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over spawning external programs.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command and capture its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with extra environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult>;

    /// Run a command, allowing failure (returns result without bailing).
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be started.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with the terminal attached (installers that prompt for
    /// a password or print progress). Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Check if a program is available on the search path.
    fn which(&self, program: &str) -> bool;
}

/// Directories prepended to the inherited `PATH` for the current run.
///
/// Owned by the task [`Context`](crate::tasks::Context) and shared with
/// [`SystemExecutor`]; bootstrap steps (Homebrew) add to it so later steps can
/// find freshly installed tools.
#[derive(Debug, Default)]
pub struct SearchPath {
    prepended: RwLock<Vec<PathBuf>>,
}

impl SearchPath {
    /// Create an empty search path (inherited `PATH` only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `dir` in front of every other entry. Adding a directory twice is a no-op.
    pub fn prepend(&self, dir: &Path) {
        let mut guard = self
            .prepended
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if !guard.iter().any(|d| d == dir) {
            guard.insert(0, dir.to_path_buf());
        }
    }

    /// Whether `dir` has been prepended during this run.
    #[must_use]
    pub fn contains(&self, dir: &Path) -> bool {
        self.prepended
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .any(|d| d == dir)
    }

    /// The directories added during this run, most recent first.
    #[must_use]
    pub fn prepended(&self) -> Vec<PathBuf> {
        self.prepended
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// The effective `PATH` value: prepended directories followed by `inherited`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory contains the platform path separator.
    pub fn joined_with(&self, inherited: Option<&OsString>) -> Result<OsString> {
        let mut dirs = self.prepended();
        if let Some(inherited) = inherited {
            dirs.extend(std::env::split_paths(inherited));
        }
        std::env::join_paths(dirs).context("building PATH for child process")
    }
}

/// Production [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone)]
pub struct SystemExecutor {
    search_path: Arc<SearchPath>,
}

impl SystemExecutor {
    /// Create an executor that resolves programs through `search_path`.
    #[must_use]
    pub const fn new(search_path: Arc<SearchPath>) -> Self {
        Self { search_path }
    }

    fn command(&self, program: &str, args: &[&str]) -> Result<Command> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        let inherited = std::env::var_os("PATH");
        cmd.env("PATH", self.search_path.joined_with(inherited.as_ref())?);
        Ok(cmd)
    }
}

/// Execute a command and return the result, bailing on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        return Err(ResourceError::execution_failed(label, &result).into());
    }
    Ok(result)
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        execute_checked(self.command(program, args)?, program)
    }

    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        let mut cmd = self.command(program, args)?;
        for (k, v) in env {
            cmd.env(k, v);
        }
        execute_checked(cmd, program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = self
            .command(program, args)?
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<()> {
        let status = self
            .command(program, args)?
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        if !status.success() {
            bail!("{program} failed (exit {})", status.code().unwrap_or(-1));
        }
        Ok(())
    }

    fn which(&self, program: &str) -> bool {
        let inherited = std::env::var_os("PATH");
        let Ok(path) = self.search_path.joined_with(inherited.as_ref()) else {
            return false;
        };
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        which::which_in(program, Some(path), cwd).is_ok()
    }
}
