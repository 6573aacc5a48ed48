// Shared helpers for integration tests.
//
// Provides scripted stand-ins for every external capability (commands,
// prompts, clones) plus a temporary home directory, so each test can drive
// the real install steps without touching the machine.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};

use macsetup::config::Manifest;
use macsetup::exec::{ExecResult, Executor, SearchPath};
use macsetup::git::RepoCloner;
use macsetup::logging::{Log, TaskEntry, TaskStatus};
use macsetup::operations::SystemFileSystemOps;
use macsetup::platform::{Os, Platform};
use macsetup::prompt::Prompter;
use macsetup::tasks::Context;

/// Executor that records every command line and fails those matching a
/// configured prefix.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    on_path: Vec<String>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `program` as present on the search path.
    pub fn with_program(mut self, program: &str) -> Self {
        self.on_path.push(program.to_string());
        self
    }

    /// Make every command line starting with `prefix` exit non-zero.
    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> (String, bool) {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().expect("calls lock").push(line.clone());
        let ok = !self.failing.iter().any(|p| line.starts_with(p.as_str()));
        (line, ok)
    }
}

fn result(success: bool) -> ExecResult {
    ExecResult {
        stdout: String::new(),
        stderr: String::new(),
        success,
        code: Some(i32::from(!success)),
    }
}

impl Executor for ScriptedExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let (line, ok) = self.record(program, args);
        if !ok {
            bail!("{line} exited with status 1");
        }
        Ok(result(true))
    }

    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        _env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        self.run(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let (_, ok) = self.record(program, args);
        Ok(result(ok))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<()> {
        self.run(program, args).map(|_| ())
    }

    fn which(&self, program: &str) -> bool {
        self.on_path.iter().any(|p| p == program)
    }
}

/// Prompter with a fixed confirmation answer and a queue of text answers.
#[derive(Debug)]
pub struct ScriptedPrompter {
    confirm: bool,
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(confirm: bool, answers: &[&str]) -> Self {
        Self {
            confirm,
            answers: Mutex::new(answers.iter().map(|a| (*a).to_string()).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt shown so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("asked lock").clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        self.asked.lock().expect("asked lock").push(message.to_string());
        Ok(self.confirm)
    }

    fn text(&self, message: &str) -> Result<String> {
        self.asked.lock().expect("asked lock").push(message.to_string());
        Ok(self
            .answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .unwrap_or_default())
    }
}

/// Cloner that creates the destination directory and records the URL.
#[derive(Debug, Default)]
pub struct DirCloner {
    cloned: Mutex<Vec<String>>,
}

impl DirCloner {
    pub fn cloned(&self) -> Vec<String> {
        self.cloned.lock().expect("cloned lock").clone()
    }
}

impl RepoCloner for DirCloner {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        std::fs::create_dir_all(dest)?;
        self.cloned.lock().expect("cloned lock").push(url.to_string());
        Ok(())
    }
}

/// In-memory [`Log`] keeping `(kind, message)` pairs and step records.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<(&'static str, String)>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl MemoryLog {
    fn push(&self, kind: &'static str, msg: &str) {
        self.lines
            .lock()
            .expect("lines lock")
            .push((kind, msg.to_string()));
    }

    pub fn lines(&self) -> Vec<(&'static str, String)> {
        self.lines.lock().expect("lines lock").clone()
    }

    pub fn messages(&self, kind: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, m)| m.contains(needle))
    }

    pub fn tasks(&self) -> Vec<(String, TaskStatus)> {
        self.tasks
            .lock()
            .expect("tasks lock")
            .iter()
            .map(|t| (t.name.clone(), t.status))
            .collect()
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn success(&self, msg: &str) {
        self.push("success", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn plain(&self, msg: &str) {
        self.push("plain", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks.lock().expect("tasks lock").push(TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(str::to_string),
        });
    }
}

/// A temporary home directory plus the fakes wired into a [`Context`].
#[derive(Debug)]
pub struct Fixture {
    pub home: tempfile::TempDir,
    pub executor: Arc<ScriptedExecutor>,
    pub prompter: Arc<ScriptedPrompter>,
    pub cloner: Arc<DirCloner>,
    pub log: Arc<MemoryLog>,
    pub manifest: Manifest,
    pub dotfiles_dir: Option<PathBuf>,
    pub dry_run: bool,
}

impl Fixture {
    /// A fixture using the built-in manifest, answering "yes" to the
    /// confirmation.
    pub fn new(executor: ScriptedExecutor) -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp home"),
            executor: Arc::new(executor),
            prompter: Arc::new(ScriptedPrompter::new(true, &[])),
            cloner: Arc::new(DirCloner::default()),
            log: Arc::new(MemoryLog::default()),
            manifest: Manifest::builtin().expect("builtin manifest"),
            dotfiles_dir: None,
            dry_run: false,
        }
    }

    pub fn with_prompter(mut self, prompter: ScriptedPrompter) -> Self {
        self.prompter = Arc::new(prompter);
        self
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_dotfiles_dir(mut self, dir: &Path) -> Self {
        self.dotfiles_dir = Some(dir.to_path_buf());
        self
    }

    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Build a [`Context`] rooted at the temporary home on Apple Silicon macOS.
    pub fn context(&self) -> Context {
        Context {
            manifest: Arc::new(self.manifest.clone()),
            platform: Arc::new(Platform::new(Os::MacOs, true)),
            log: Arc::clone(&self.log) as Arc<dyn Log>,
            dry_run: self.dry_run,
            home: self.home.path().to_path_buf(),
            dotfiles_dir: self.dotfiles_dir.clone(),
            executor: Arc::clone(&self.executor) as Arc<dyn Executor>,
            fs_ops: Arc::new(SystemFileSystemOps),
            cloner: Arc::clone(&self.cloner) as Arc<dyn RepoCloner>,
            prompter: Arc::clone(&self.prompter) as Arc<dyn Prompter>,
            search_path: Arc::new(SearchPath::new()),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }
}
