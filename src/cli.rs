//! Command-line interface definitions.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the workstation bootstrap.
#[derive(Parser, Debug)]
#[command(
    name = "macsetup",
    about = "Idempotent bootstrap for a macOS developer workstation",
    version
)]
pub struct Cli {
    /// Subcommand to run (defaults to `install`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The selected subcommand, with a bare invocation meaning `install`.
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Install(InstallOpts::default()))
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Directory holding the dotfiles to copy (overrides MACSETUP_DOTFILES)
    #[arg(long, global = true, value_name = "DIR")]
    pub dotfiles: Option<PathBuf>,

    /// Use this manifest instead of the built-in one
    #[arg(long, global = true, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Do not ask for confirmation before starting
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Provision this Mac (the default)
    Install(InstallOpts),
    /// List the setup steps in execution order
    List,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::List => "list",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Skip specific steps (by id, see `macsetup list`)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only specific steps (by id, see `macsetup list`)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}
