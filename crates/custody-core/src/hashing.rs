use sha2::{Digest, Sha256};

/// Content hash recorded as `credential_hash`: SHA-256 of the off-ledger
/// credential payload, lowercase hex.
pub fn credential_hash(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Whether `payload` hashes to exactly the recorded `expected` value.
pub fn matches_credential_hash(payload: &[u8], expected: &str) -> bool {
    credential_hash(payload) == expected
}
