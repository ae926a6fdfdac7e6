use crate::status::CredentialStatus;

/// Core record errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidStateTransition {
        from: CredentialStatus,
        to: CredentialStatus,
    },

    #[error("invalid credential status: {0}")]
    InvalidStatus(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
