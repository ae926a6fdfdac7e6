//! `custody verify` / `custody hash` — Check off-ledger payloads against
//! recorded hashes.

use clap::Args;
use std::path::PathBuf;

use custody_core::credential_hash;

use super::{read_payload, Session};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential ID.
    pub id: String,

    /// Credential payload to check.
    #[arg(long)]
    pub payload_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Credential payload to hash.
    pub payload_file: PathBuf,
}

pub fn run(args: &VerifyArgs, session: &Session) -> anyhow::Result<()> {
    let payload = read_payload(&args.payload_file)?;
    let valid = session.query(|contract, ctx| contract.verify_payload(ctx, &args.id, &payload))?;
    if !valid {
        anyhow::bail!(
            "payload {} does not match credential {}",
            args.payload_file.display(),
            args.id
        );
    }
    println!("Payload matches credential {}", args.id);
    Ok(())
}

pub fn run_hash(args: &HashArgs) -> anyhow::Result<()> {
    println!("{}", credential_hash(&read_payload(&args.payload_file)?));
    Ok(())
}
