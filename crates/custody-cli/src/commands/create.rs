//! `custody create` — Record a new credential.

use clap::Args;
use std::path::PathBuf;

use custody_core::{CredentialStatus, NewCredential};

use super::{new_credential_id, now_timestamp, print_json, resolve_hash, Session};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Credential ID (a fresh urn:uuid is generated when omitted).
    #[arg(long)]
    pub id: Option<String>,

    /// Initial status ("active" or "revoked").
    #[arg(long, default_value = "active")]
    pub status: String,

    /// Issuer DID.
    #[arg(long)]
    pub issuer: String,

    /// Owner DID.
    #[arg(long)]
    pub owner: String,

    /// Credential hash as recorded.
    #[arg(long, conflicts_with = "payload_file")]
    pub hash: Option<String>,

    /// Credential payload to hash instead of passing --hash.
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// ISO-8601 timestamp (defaults to now).
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Credential this one supersedes.
    #[arg(long)]
    pub previous: Option<String>,
}

pub fn run(args: &CreateArgs, session: &Session) -> anyhow::Result<()> {
    let status: CredentialStatus = args.status.parse()?;
    let new = NewCredential {
        credential_id: args.id.clone().unwrap_or_else(new_credential_id),
        status,
        issuer_did: args.issuer.clone(),
        owner_did: args.owner.clone(),
        credential_hash: resolve_hash(args.hash.as_deref(), args.payload_file.as_deref())?,
        timestamp: args.timestamp.clone().unwrap_or_else(now_timestamp),
        previous_credential_id: args.previous.clone(),
    };

    let record = session.submit(|contract, ctx| contract.create_asset(ctx, new))?;
    print_json(&record)
}
