use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::{CredentialStatus, StatusEvent, StatusMachine};

/// A credential record as held in ledger world state.
///
/// The serialized form is a flat JSON object carrying all eight fields as
/// strings. An absent `previous_credential_id` is written as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Lifecycle status ("active" or "revoked").
    pub status: CredentialStatus,
    /// ISO-8601 time of the last status-affecting change.
    pub timestamp: String,
    /// DID of the current holder.
    pub owner_did: String,
    /// DID of the original issuer. Write-once.
    pub issuer_did: String,
    /// Ledger key of this record. Write-once.
    pub credential_id: String,
    /// Content hash of the off-ledger credential payload. Write-once.
    pub credential_hash: String,
    /// DID of the party attributed with the most recent mutation.
    pub last_modifier_did: String,
    /// Credential this one supersedes, if any. Write-once.
    #[serde(default, with = "empty_as_none")]
    pub previous_credential_id: Option<String>,
}

/// Caller-supplied fields for a new credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub credential_id: String,
    pub status: CredentialStatus,
    pub issuer_did: String,
    pub owner_did: String,
    pub credential_hash: String,
    pub timestamp: String,
    pub previous_credential_id: Option<String>,
}

impl NewCredential {
    /// Reject inputs that would produce an unaddressable or ownerless record.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.credential_id.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "credential_id must not be empty".into(),
            ));
        }
        if self.issuer_did.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "issuer_did must not be empty".into(),
            ));
        }
        if self.owner_did.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "owner_did must not be empty".into(),
            ));
        }
        if self.previous_credential_id.as_deref() == Some(self.credential_id.as_str()) {
            return Err(CoreError::ValidationError(format!(
                "credential {} cannot supersede itself",
                self.credential_id
            )));
        }
        Ok(())
    }
}

impl CredentialRecord {
    /// Build the initial record. The owner is attributed with creation.
    pub fn from_new(new: NewCredential) -> Self {
        let previous_credential_id = new.previous_credential_id.filter(|p| !p.is_empty());
        Self {
            status: new.status,
            timestamp: new.timestamp,
            last_modifier_did: new.owner_did.clone(),
            owner_did: new.owner_did,
            issuer_did: new.issuer_did,
            credential_id: new.credential_id,
            credential_hash: new.credential_hash,
            previous_credential_id,
        }
    }

    /// Decode a record from ledger bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode the record for the ledger.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn is_active(&self) -> bool {
        self.status == CredentialStatus::Active
    }

    /// The superseded credential, if any.
    pub fn previous(&self) -> Option<&str> {
        self.previous_credential_id.as_deref()
    }

    /// Hand the credential to a new holder.
    pub fn transfer_to(&mut self, new_owner_did: &str, modifier_did: &str) {
        self.owner_did = new_owner_did.to_string();
        self.last_modifier_did = modifier_did.to_string();
    }

    /// Mark the credential revoked as of `now`.
    ///
    /// The stamp is written at whole-second precision. The stored timestamp
    /// never moves backwards: when it is later than the truncated `now` it
    /// is kept.
    pub fn revoke(&mut self, modifier_did: &str, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.status = StatusMachine::transition(self.status, StatusEvent::Revoke)?;
        self.last_modifier_did = modifier_did.to_string();

        let stamped = now.trunc_subsecs(0);
        match DateTime::parse_from_rfc3339(&self.timestamp) {
            Ok(stored) if stored.with_timezone(&Utc) > stamped => {
                tracing::warn!(
                    credential_id = %self.credential_id,
                    stored = %self.timestamp,
                    now = %stamped.to_rfc3339_opts(SecondsFormat::Secs, true),
                    "stored timestamp is ahead of the revocation time, keeping it"
                );
            }
            _ => self.timestamp = stamped.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
        Ok(())
    }
}

/// `Option<String>` that travels as `""` when absent.
mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}
