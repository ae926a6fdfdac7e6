//! Custody CLI — Command-line harness for the credential record store.
//!
//! Subcommands: init, create, read, exists, transfer, revoke, supersede,
//! history, verify, hash.

mod commands;
mod config;
mod snapshot;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::Session;
use config::CustodyConfig;

/// Custody — chain-of-custody ledger for verifiable credential records.
#[derive(Parser, Debug)]
#[command(name = "custody", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "custody.toml")]
    config: PathBuf,

    /// Override the ledger snapshot path.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Override the caller DID.
    #[arg(long, global = true)]
    caller: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Record a new credential.
    Create(commands::create::CreateArgs),
    /// Show a credential record.
    Read(commands::read::ReadArgs),
    /// Check whether a credential record exists.
    Exists(commands::read::ReadArgs),
    /// Hand a credential to a new owner.
    Transfer(commands::transfer::TransferArgs),
    /// Permanently revoke a credential.
    Revoke(commands::revoke::RevokeArgs),
    /// Replace a credential with a linked successor.
    Supersede(commands::supersede::SupersedeArgs),
    /// Show or verify the chain of custody of a credential.
    History(commands::history::HistoryArgs),
    /// Check a credential payload against its recorded hash.
    Verify(commands::verify::VerifyArgs),
    /// Print the credential hash of a payload.
    Hash(commands::verify::HashArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CustodyConfig::load(&cli.config)?;
    if let Some(ref snapshot) = cli.snapshot {
        config.ledger.snapshot_path = snapshot.clone();
    }
    if let Some(ref caller) = cli.caller {
        config.identity.caller_did = Some(caller.clone());
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);

    let session = Session::new(config);
    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Create(args) => commands::create::run(args, &session),
        Commands::Read(args) => commands::read::run(args, &session),
        Commands::Exists(args) => commands::read::run_exists(args, &session),
        Commands::Transfer(args) => commands::transfer::run(args, &session),
        Commands::Revoke(args) => commands::revoke::run(args, &session),
        Commands::Supersede(args) => commands::supersede::run(args, &session),
        Commands::History(args) => commands::history::run(args, &session),
        Commands::Verify(args) => commands::verify::run(args, &session),
        Commands::Hash(args) => commands::verify::run_hash(args),
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(config: &CustodyConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }
}
