//! `custody supersede` — Replace a credential with a linked successor.

use clap::Args;
use std::path::PathBuf;

use custody_core::{CredentialStatus, NewCredential};

use super::{new_credential_id, now_timestamp, print_json, resolve_hash, Session};

#[derive(Args, Debug)]
pub struct SupersedeArgs {
    /// Credential being replaced.
    pub old_id: String,

    /// Successor credential ID (a fresh urn:uuid is generated when omitted).
    #[arg(long)]
    pub id: Option<String>,

    /// Issuer DID of the successor.
    #[arg(long)]
    pub issuer: String,

    /// Owner DID of the successor.
    #[arg(long)]
    pub owner: String,

    /// Successor credential hash as recorded.
    #[arg(long, conflicts_with = "payload_file")]
    pub hash: Option<String>,

    /// Successor payload to hash instead of passing --hash.
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// ISO-8601 timestamp of the successor (defaults to now).
    #[arg(long)]
    pub timestamp: Option<String>,
}

pub fn run(args: &SupersedeArgs, session: &Session) -> anyhow::Result<()> {
    let successor = NewCredential {
        credential_id: args.id.clone().unwrap_or_else(new_credential_id),
        status: CredentialStatus::Active,
        issuer_did: args.issuer.clone(),
        owner_did: args.owner.clone(),
        credential_hash: resolve_hash(args.hash.as_deref(), args.payload_file.as_deref())?,
        timestamp: args.timestamp.clone().unwrap_or_else(now_timestamp),
        previous_credential_id: Some(args.old_id.clone()),
    };

    let record =
        session.submit(|contract, ctx| contract.supersede_asset(ctx, &args.old_id, successor))?;
    print_json(&record)
}
