//! `custody read` / `custody exists` — Query a credential record.

use clap::Args;

use super::{print_json, Session};

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Credential ID.
    pub id: String,
}

pub fn run(args: &ReadArgs, session: &Session) -> anyhow::Result<()> {
    let record = session.query(|contract, ctx| contract.read_asset(ctx, &args.id))?;
    print_json(&record)
}

pub fn run_exists(args: &ReadArgs, session: &Session) -> anyhow::Result<()> {
    let exists = session.query(|contract, ctx| contract.asset_exists(ctx, &args.id))?;
    println!("{}", exists);
    Ok(())
}
