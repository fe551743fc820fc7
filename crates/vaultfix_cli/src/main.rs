//! VaultFix command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, load configuration, initialize logging and run the
//!   batch once.
//! - Map fatal setup errors to a non-zero exit status with a one-line
//!   message; per-file failures never change the exit status.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use vaultfix_core::{default_log_level, init_logging, VaultConfig, VaultService};

#[derive(Parser)]
#[command(name = "vaultfix")]
#[command(version)]
#[command(about = "Repair and normalize YAML frontmatter in a Markdown vault")]
struct Cli {
    /// Path to the YAML run configuration.
    #[arg(long, default_value = "_config.yaml")]
    config: PathBuf,
    /// Directory for rolling log files; stderr-only when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Report what would change without writing any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli
        .log_dir
        .as_ref()
        .map(|dir| dir.to_string_lossy().into_owned());
    if let Err(err) = init_logging(default_log_level(), log_dir.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let config = match VaultConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = VaultService::new(config).with_dry_run(cli.dry_run);
    match service.run() {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
