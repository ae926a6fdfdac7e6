pub mod create;
pub mod history;
pub mod init;
pub mod read;
pub mod revoke;
pub mod supersede;
pub mod transfer;
pub mod verify;

use std::path::Path;

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use custody_contract::{ContractError, CredentialContract};
use custody_core::credential_hash;
use custody_ledger::CallContext;

use crate::config::CustodyConfig;
use crate::snapshot::SnapshotLedger;

/// Resolved configuration shared by every command.
pub struct Session {
    pub config: CustodyConfig,
    pub contract: CredentialContract,
}

impl Session {
    pub fn new(config: CustodyConfig) -> Self {
        Self {
            config,
            contract: CredentialContract::new(),
        }
    }

    /// DID attributed with mutations.
    pub fn caller(&self) -> anyhow::Result<&str> {
        self.config
            .identity
            .caller_did
            .as_deref()
            .filter(|did| !did.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("no caller DID configured: set [identity].caller_did or pass --caller")
            })
    }

    fn open_ledger(&self) -> anyhow::Result<SnapshotLedger> {
        SnapshotLedger::open(&self.config.ledger.snapshot_path)
    }

    /// Run a read-only operation against the snapshot.
    pub fn query<T>(
        &self,
        op: impl FnOnce(&CredentialContract, &CallContext<'_>) -> Result<T, ContractError>,
    ) -> anyhow::Result<T> {
        let ledger = self.open_ledger()?;
        let caller = self.config.identity.caller_did.clone().unwrap_or_default();
        let ctx = CallContext::new(&ledger, caller);
        Ok(op(&self.contract, &ctx)?)
    }

    /// Run a mutating operation and persist the snapshot only if it succeeds.
    pub fn submit<T>(
        &self,
        op: impl FnOnce(&CredentialContract, &CallContext<'_>) -> Result<T, ContractError>,
    ) -> anyhow::Result<T> {
        let ledger = self.open_ledger()?;
        let ctx = CallContext::new(&ledger, self.caller()?);
        let out = op(&self.contract, &ctx)?;
        if ledger.is_dirty() {
            ledger.save()?;
        }
        Ok(out)
    }
}

/// `credential_hash` taken verbatim or computed from a payload file.
pub fn resolve_hash(hash: Option<&str>, payload_file: Option<&Path>) -> anyhow::Result<String> {
    match (hash, payload_file) {
        (Some(hash), _) => Ok(hash.to_string()),
        (None, Some(path)) => Ok(credential_hash(&read_payload(path)?)),
        (None, None) => anyhow::bail!("either --hash or --payload-file is required"),
    }
}

pub fn read_payload(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading payload {}", path.display()))
}

/// A fresh credential identifier.
pub fn new_credential_id() -> String {
    format!("urn:uuid:{}", uuid::Uuid::now_v7())
}

/// Current time in the ISO-8601 form used for creation timestamps.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
