//! staffbook command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from defaults, environment and flags.
//! - Open the data root and hand stdin/stdout to the interactive menu.

use clap::{Parser, Subcommand};
use log::error;
use staffbook_core::{init_logging, open_store, AppConfig, PersonService};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod menu;

#[derive(Parser)]
#[command(name = "staffbook", version, about = "Employee records stored as XML files")]
struct Cli {
    /// Directory holding the Internal/External record folders.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging stays off when unset.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print core linkage probe output and exit.
    Ping,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Command::Ping) = cli.command {
        println!("staffbook_core ping={}", staffbook_core::ping());
        println!("staffbook_core version={}", staffbook_core::core_version());
        return ExitCode::SUCCESS;
    }

    let config = AppConfig::from_env().with_overrides(cli.data_dir, cli.log_level, cli.log_dir);

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let repo = match open_store(&config.data_dir) {
        Ok(repo) => repo,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("error: cannot open data directory: {err}");
            return ExitCode::FAILURE;
        }
    };
    let service = PersonService::new(repo);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    match menu::run_menu(&service, &mut input, &mut output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_io module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
