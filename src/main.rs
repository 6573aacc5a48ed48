//! `macsetup` command-line entry point.
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{CommandFactory, Parser};

use macsetup::cli::{Cli, Command, InstallOpts};
use macsetup::commands;
use macsetup::error::SetupError;
use macsetup::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let command = args.command_or_default();
    match &command {
        Command::Install(opts) => install(&args, opts, command.log_name()),
        Command::List => {
            commands::list::run();
            ExitCode::SUCCESS
        }
        Command::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "macsetup", &mut std::io::stdout());
            ExitCode::SUCCESS
        }
        Command::Version => {
            commands::version::run();
            ExitCode::SUCCESS
        }
    }
}

fn install(args: &Cli, opts: &InstallOpts, log_name: &str) -> ExitCode {
    logging::init_subscriber(args.verbose, log_name);
    let log = Arc::new(Logger::new(log_name));

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log.debug(&format!("cannot install Ctrl-C handler: {e}"));
    }

    match commands::install::run(&args.global, opts, &log, interrupted) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let setup = e.chain().find_map(|c| c.downcast_ref::<SetupError>());
            match setup {
                // the failing step has already logged why
                Some(err @ SetupError::PrerequisiteMissing { .. }) => ExitCode::from(err.exit_code()),
                Some(err) => {
                    log.error(&err.to_string());
                    ExitCode::from(err.exit_code())
                }
                None => {
                    log.error(&format!("Setup failed: {e:#}"));
                    ExitCode::FAILURE
                }
            }
        }
    }
}
