//! `custody revoke` — Permanently revoke a credential.

use clap::Args;

use super::{print_json, Session};

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Credential ID.
    pub id: String,
}

pub fn run(args: &RevokeArgs, session: &Session) -> anyhow::Result<()> {
    let record = session.submit(|contract, ctx| contract.revoke_asset(ctx, &args.id))?;
    print_json(&record)
}
