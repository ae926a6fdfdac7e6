//! `custody history` — Show or verify the chain of custody of a credential.

use clap::Args;
use std::path::PathBuf;

use super::{print_json, read_payload, Session};

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Credential ID to start from (the newest link).
    pub id: String,

    /// Check every link against these payload files, newest first.
    #[arg(long, num_args = 1.., value_name = "PAYLOAD_FILE")]
    pub verify: Vec<PathBuf>,
}

pub fn run(args: &HistoryArgs, session: &Session) -> anyhow::Result<()> {
    if args.verify.is_empty() {
        let chain = session.query(|contract, ctx| contract.chain_of_custody(ctx, &args.id))?;
        return print_json(&chain);
    }

    let payloads = args
        .verify
        .iter()
        .map(|path| read_payload(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    session.query(|contract, ctx| contract.verify_chain(ctx, &args.id, &payloads))?;
    println!(
        "Chain of custody from {} verified ({} links)",
        args.id,
        payloads.len()
    );
    Ok(())
}
