//! `custody init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use crate::config::CustodyConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// DID to record as the caller in the generated file.
    #[arg(long)]
    pub caller_did: Option<String>,

    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, path: &Path) -> anyhow::Result<()> {
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = CustodyConfig::default();
    config.identity.caller_did = args.caller_did.clone();
    config.save(path)?;

    tracing::info!(path = %path.display(), "wrote default config");
    println!("Wrote {}", path.display());
    Ok(())
}
