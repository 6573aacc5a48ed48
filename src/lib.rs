//! macOS workstation bootstrap engine.
//!
//! Provisions a fresh Mac from a declarative TOML manifest: Xcode Command
//! Line Tools, Homebrew and its packages, Oh My Zsh with plugins, bundled
//! dotfiles, git identity, an SSH key, a Caps Lock remap, the Dock layout and
//! VS Code Settings Sync guidance. Every step checks the current state first,
//! so a second run changes nothing.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse and validate the manifest
//! - **[`resources`]**: idempotent `check + apply` primitives (packages, dotfiles, …)
//! - **[`tasks`]**: named, ordered steps wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `list`, `version`)
//!
//! External tools sit behind the [`exec::Executor`], [`operations::FileSystemOps`],
//! [`git::RepoCloner`] and [`prompt::Prompter`] traits.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod git;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod prompt;
pub mod resources;
pub mod tasks;
