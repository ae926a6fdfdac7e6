//! `custody transfer` — Hand a credential to a new owner.

use clap::Args;

use super::{print_json, Session};

#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Credential ID.
    pub id: String,

    /// DID of the new owner.
    #[arg(long)]
    pub to: String,
}

pub fn run(args: &TransferArgs, session: &Session) -> anyhow::Result<()> {
    let record =
        session.submit(|contract, ctx| contract.transfer_ownership(ctx, &args.id, &args.to))?;
    print_json(&record)
}
