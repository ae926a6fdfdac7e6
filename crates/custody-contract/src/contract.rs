use custody_core::{CoreError, CredentialRecord, NewCredential};
use custody_ledger::TransactionContext;

use crate::error::{ContractError, Operation};

/// The credential record store.
///
/// Stateless: each call reads what it needs from the context's ledger and
/// writes the result back. All validation happens before anything is
/// written, and an operation touching several records hands them to the
/// ledger as one write set, so a failed call leaves world state as it found
/// it.
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialContract;

impl CredentialContract {
    pub fn new() -> Self {
        Self
    }

    /// Create a credential record under `new.credential_id`.
    ///
    /// The owner is recorded as the last modifier.
    pub fn create_asset<C>(
        &self,
        ctx: &C,
        new: NewCredential,
    ) -> Result<CredentialRecord, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        new.validate().map_err(invalid_argument)?;

        let id = new.credential_id.clone();
        if self.probe(ctx, Operation::Create, &id)? {
            tracing::warn!(credential_id = %id, "create rejected: credential already exists");
            return Err(ContractError::AlreadyExists { id });
        }

        let record = CredentialRecord::from_new(new);
        self.commit(ctx, Operation::Create, &record)?;

        tracing::info!(
            credential_id = %record.credential_id,
            owner = %record.owner_did,
            issuer = %record.issuer_did,
            status = %record.status,
            "credential created"
        );
        Ok(record)
    }

    /// Fetch and decode the record stored under `id`.
    pub fn read_asset<C>(&self, ctx: &C, id: &str) -> Result<CredentialRecord, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        self.load(ctx, Operation::Read, id)
    }

    /// Whether a record is stored under `id`. The bytes are not decoded.
    pub fn asset_exists<C>(&self, ctx: &C, id: &str) -> Result<bool, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        self.probe(ctx, Operation::Exists, id)
    }

    /// Hand credential `id` to `new_owner_did`, attributing the change to
    /// the caller.
    pub fn transfer_ownership<C>(
        &self,
        ctx: &C,
        id: &str,
        new_owner_did: &str,
    ) -> Result<CredentialRecord, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        if new_owner_did.trim().is_empty() {
            return Err(ContractError::InvalidArgument(
                "new owner DID must not be empty".into(),
            ));
        }

        let mut record = self.load(ctx, Operation::Transfer, id)?;
        let previous_owner = std::mem::take(&mut record.owner_did);
        record.transfer_to(new_owner_did, ctx.caller_did());
        self.commit(ctx, Operation::Transfer, &record)?;

        tracing::info!(
            credential_id = %id,
            from = %previous_owner,
            to = %record.owner_did,
            modifier = %record.last_modifier_did,
            "credential ownership transferred"
        );
        Ok(record)
    }

    /// Permanently revoke credential `id`, stamping it with the transaction
    /// time. A credential that is already revoked is rejected and left
    /// untouched.
    pub fn revoke_asset<C>(&self, ctx: &C, id: &str) -> Result<CredentialRecord, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        let mut record = self.load(ctx, Operation::Revoke, id)?;
        self.apply_revocation(ctx, &mut record)?;
        self.commit(ctx, Operation::Revoke, &record)?;

        tracing::info!(
            credential_id = %id,
            timestamp = %record.timestamp,
            modifier = %record.last_modifier_did,
            "credential revoked"
        );
        Ok(record)
    }

    pub(crate) fn apply_revocation<C>(
        &self,
        ctx: &C,
        record: &mut CredentialRecord,
    ) -> Result<(), ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        match record.revoke(ctx.caller_did(), ctx.tx_timestamp()) {
            Ok(()) => Ok(()),
            Err(CoreError::InvalidStateTransition { .. }) => {
                tracing::warn!(
                    credential_id = %record.credential_id,
                    "revoke rejected: credential already revoked"
                );
                Err(ContractError::AlreadyRevoked {
                    id: record.credential_id.clone(),
                })
            }
            Err(source) => Err(ContractError::Corrupt {
                id: record.credential_id.clone(),
                source,
            }),
        }
    }

    pub(crate) fn probe<C>(&self, ctx: &C, op: Operation, id: &str) -> Result<bool, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        let bytes = ctx
            .ledger()
            .get(id)
            .map_err(|e| ContractError::store(op, id, e))?;
        Ok(bytes.is_some())
    }

    pub(crate) fn load<C>(
        &self,
        ctx: &C,
        op: Operation,
        id: &str,
    ) -> Result<CredentialRecord, ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        let bytes = ctx
            .ledger()
            .get(id)
            .map_err(|e| ContractError::store(op, id, e))?
            .ok_or_else(|| ContractError::NotFound { id: id.to_string() })?;

        let record = CredentialRecord::from_bytes(&bytes).map_err(|source| {
            tracing::warn!(credential_id = %id, error = %source, "stored record failed to decode");
            ContractError::Corrupt {
                id: id.to_string(),
                source,
            }
        })?;

        tracing::debug!(credential_id = %id, operation = %op, "credential loaded");
        Ok(record)
    }

    pub(crate) fn commit<C>(
        &self,
        ctx: &C,
        op: Operation,
        record: &CredentialRecord,
    ) -> Result<(), ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        let id = record.credential_id.as_str();
        let bytes = record.to_bytes().map_err(|source| ContractError::Corrupt {
            id: id.to_string(),
            source,
        })?;
        ctx.ledger()
            .put(id, &bytes)
            .map_err(|e| ContractError::store(op, id, e))
    }

    /// Write several records as a single write set.
    pub(crate) fn commit_all<C>(
        &self,
        ctx: &C,
        op: Operation,
        records: &[&CredentialRecord],
    ) -> Result<(), ContractError>
    where
        C: TransactionContext + ?Sized,
    {
        let mut writes = Vec::with_capacity(records.len());
        for record in records {
            let bytes = record.to_bytes().map_err(|source| ContractError::Corrupt {
                id: record.credential_id.clone(),
                source,
            })?;
            writes.push((record.credential_id.clone(), bytes));
        }
        let first = records.first().map_or("", |r| r.credential_id.as_str());
        ctx.ledger()
            .put_batch(&writes)
            .map_err(|e| ContractError::store(op, first, e))
    }
}

fn invalid_argument(err: CoreError) -> ContractError {
    match err {
        CoreError::ValidationError(msg) => ContractError::InvalidArgument(msg),
        other => ContractError::InvalidArgument(other.to_string()),
    }
}
