//! Fixtures shared by the cross-crate custody tests.

use custody_core::{credential_hash, CredentialStatus, NewCredential};

pub const ALICE: &str = "did:example:alice";
pub const BOB: &str = "did:example:bob";
pub const CAROL: &str = "did:example:carol";
pub const REGISTRY: &str = "did:web:registry.example";

/// An active credential issued by [`BOB`] whose hash covers `payload`.
pub fn evidence(id: &str, owner: &str, payload: &[u8]) -> NewCredential {
    NewCredential {
        credential_id: id.to_string(),
        status: CredentialStatus::Active,
        issuer_did: BOB.to_string(),
        owner_did: owner.to_string(),
        credential_hash: credential_hash(payload),
        timestamp: "2024-05-01T10:00:00.000Z".to_string(),
        previous_credential_id: None,
    }
}
