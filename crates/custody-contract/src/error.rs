use std::fmt;

use custody_core::CoreError;
use custody_ledger::LedgerError;

/// Record-store operations, named as they are invoked on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Exists,
    Transfer,
    Revoke,
    Supersede,
    History,
    Verify,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "CreateAsset",
            Self::Read => "ReadAsset",
            Self::Exists => "AssetExists",
            Self::Transfer => "TransferOwnership",
            Self::Revoke => "RevokeAsset",
            Self::Supersede => "SupersedeAsset",
            Self::History => "ChainOfCustody",
            Self::Verify => "VerifyPayload",
        };
        f.write_str(name)
    }
}

/// Credential record store errors.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("credential {id} already exists")]
    AlreadyExists { id: String },

    #[error("credential {id} does not exist")]
    NotFound { id: String },

    #[error("credential {id} is corrupt: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: CoreError,
    },

    #[error("{operation} {id}: ledger failure: {source}")]
    StoreUnavailable {
        operation: Operation,
        id: String,
        #[source]
        source: LedgerError,
    },

    #[error("credential {id} is already revoked")]
    AlreadyRevoked { id: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("chain of custody from {id} is broken: {missing} does not exist")]
    BrokenChain { id: String, missing: String },

    #[error("chain of custody from {id} loops back on itself")]
    ChainCycle { id: String },

    #[error("credential ids do not match at index {index}: stored under {key}, record names {found}")]
    IdMismatch {
        index: usize,
        key: String,
        found: String,
    },

    #[error("hash mismatch for credential {id} at index {index}")]
    HashMismatch { index: usize, id: String },
}

impl ContractError {
    pub(crate) fn store(operation: Operation, id: &str, source: LedgerError) -> Self {
        Self::StoreUnavailable {
            operation,
            id: id.to_string(),
            source,
        }
    }
}
