//! Custody Core — Credential record model, status state machine and
//! content hashing shared by the custody ledger crates.

pub mod error;
pub mod hashing;
pub mod record;
pub mod status;

pub use error::CoreError;
pub use hashing::{credential_hash, matches_credential_hash};
pub use record::{CredentialRecord, NewCredential};
pub use status::{CredentialStatus, StatusEvent, StatusMachine};
