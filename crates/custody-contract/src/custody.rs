//! Chain-of-custody operations: superseding a credential with a successor,
//! walking the supersession links, and checking off-ledger payloads
//! against recorded hashes.

use std::collections::HashSet;

use custody_core::{matches_credential_hash, CredentialRecord, CredentialStatus, NewCredential};
use custody_ledger::TransactionContext;

use crate::contract::CredentialContract;
use crate::error::{ContractError, Operation};

impl CredentialContract {
    /// Replace credential `old_id` with a successor.
    ///
    /// The successor is created active, linked back to `old_id` and
    /// attributed to its owner; `old_id` is then revoked on behalf of the
    /// caller. Both records are validated first and then written as one
    /// write set, so either both changes land or neither does.
    pub fn supersede_asset<C>(
        &self,
        ctx: &C,
        old_id: &str,
        mut successor: NewCredential,
    ) -> Result<CredentialRecord, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        match successor.previous_credential_id.as_deref() {
            None | Some("") => successor.previous_credential_id = Some(old_id.to_string()),
            Some(prev) if prev == old_id => {}
            Some(prev) => {
                return Err(ContractError::InvalidArgument(format!(
                    "successor already links to {}, not {}",
                    prev, old_id
                )));
            }
        }
        if successor.status != CredentialStatus::Active {
            return Err(ContractError::InvalidArgument(
                "a successor credential must be active".into(),
            ));
        }
        successor
            .validate()
            .map_err(|e| ContractError::InvalidArgument(e.to_string()))?;

        let mut old = self.load(ctx, Operation::Supersede, old_id)?;
        if !old.is_active() {
            tracing::warn!(credential_id = %old_id, "supersede rejected: credential already revoked");
            return Err(ContractError::AlreadyRevoked {
                id: old_id.to_string(),
            });
        }

        let new_id = successor.credential_id.clone();
        if self.probe(ctx, Operation::Supersede, &new_id)? {
            return Err(ContractError::AlreadyExists { id: new_id });
        }

        let record = CredentialRecord::from_new(successor);
        self.apply_revocation(ctx, &mut old)?;

        self.commit_all(ctx, Operation::Supersede, &[&record, &old])?;

        tracing::info!(
            credential_id = %record.credential_id,
            supersedes = %old_id,
            owner = %record.owner_did,
            "credential superseded"
        );
        Ok(record)
    }

    /// Records from `id` back to the first credential of its chain, newest
    /// first.
    pub fn chain_of_custody<C>(
        &self,
        ctx: &C,
        id: &str,
    ) -> Result<Vec<CredentialRecord>, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        let mut chain = vec![self.load(ctx, Operation::History, id)?];
        let mut seen: HashSet<String> = HashSet::from([id.to_string()]);

        while let Some(prev) = chain.last().and_then(|r| r.previous()).map(str::to_string) {
            if !seen.insert(prev.clone()) {
                return Err(ContractError::ChainCycle { id: id.to_string() });
            }
            let record = match self.load(ctx, Operation::History, &prev) {
                Ok(record) => record,
                Err(ContractError::NotFound { .. }) => {
                    return Err(ContractError::BrokenChain {
                        id: id.to_string(),
                        missing: prev,
                    });
                }
                Err(e) => return Err(e),
            };
            chain.push(record);
        }

        tracing::debug!(credential_id = %id, links = chain.len(), "chain of custody resolved");
        Ok(chain)
    }

    /// Check a whole chain of custody against its off-ledger payloads.
    ///
    /// `payloads` are given in chain order, newest first, one per link.
    /// Every link must be stored under the id it names and hash to its
    /// payload; the first failing index is reported.
    pub fn verify_chain<C, P>(&self, ctx: &C, id: &str, payloads: &[P]) -> Result<(), ContractError>
    where
        C: TransactionContext + ?Sized,
        P: AsRef<[u8]>,
    {
        let chain = self.chain_of_custody(ctx, id)?;
        if chain.len() != payloads.len() {
            return Err(ContractError::InvalidArgument(format!(
                "chain of custody from {} has {} links but {} payloads were given",
                id,
                chain.len(),
                payloads.len()
            )));
        }

        let mut key = id;
        for (index, (record, payload)) in chain.iter().zip(payloads).enumerate() {
            if record.credential_id != key {
                tracing::warn!(index, key = %key, found = %record.credential_id, "chain link id mismatch");
                return Err(ContractError::IdMismatch {
                    index,
                    key: key.to_string(),
                    found: record.credential_id.clone(),
                });
            }
            if !matches_credential_hash(payload.as_ref(), &record.credential_hash) {
                tracing::warn!(index, credential_id = %key, "chain link hash mismatch");
                return Err(ContractError::HashMismatch {
                    index,
                    id: key.to_string(),
                });
            }
            key = record.previous().unwrap_or_default();
        }

        tracing::info!(credential_id = %id, links = chain.len(), "chain of custody verified");
        Ok(())
    }

    /// Whether `payload` is the credential recorded under `id`.
    pub fn verify_payload<C>(&self, ctx: &C, id: &str, payload: &[u8]) -> Result<bool, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        let record = self.load(ctx, Operation::Verify, id)?;
        let ok = matches_credential_hash(payload, &record.credential_hash);
        if !ok {
            tracing::warn!(credential_id = %id, "payload does not match recorded hash");
        }
        Ok(ok)
    }
}
