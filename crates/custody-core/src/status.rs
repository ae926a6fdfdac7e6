use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    /// Credential is valid and may be transferred.
    Active,
    /// Credential has been permanently revoked. Final state.
    Revoked,
}

impl CredentialStatus {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Revoked)
    }

    /// The literal stored on the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "revoked" => Ok(Self::Revoked),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// Events that move a credential between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// The credential is permanently withdrawn.
    Revoke,
}

/// Applies status transitions for credential records.
///
/// The only valid transition is Active → Revoked (Revoke). Revoked is
/// terminal: there is no reinstatement.
pub struct StatusMachine;

impl StatusMachine {
    /// Attempt a transition. Returns the new status, or an error when the
    /// event is not allowed from `current`.
    pub fn transition(
        current: CredentialStatus,
        event: StatusEvent,
    ) -> Result<CredentialStatus, CoreError> {
        let next = match (current, event) {
            (CredentialStatus::Active, StatusEvent::Revoke) => CredentialStatus::Revoked,
            (CredentialStatus::Revoked, StatusEvent::Revoke) => {
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: CredentialStatus::Revoked,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %next,
            event = ?event,
            "credential status transition"
        );

        Ok(next)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: CredentialStatus, event: StatusEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
