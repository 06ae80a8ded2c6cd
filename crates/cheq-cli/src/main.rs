//! # cheq CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Cheque intake toolchain.
///
/// Drives scanned cheques through the intake workflow and exposes the
/// programmatic date rules for standalone triage.
#[derive(Parser, Debug)]
#[command(name = "cheq", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Process one cheque image end to end.
    Process(cheq_cli::process::ProcessArgs),
    /// Run the cheque-date rules on a digit string.
    CheckDate(cheq_cli::datecheck::CheckDateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => cheq_cli::process::run(args),
        Commands::CheckDate(args) => cheq_cli::datecheck::run(args),
    }
}
