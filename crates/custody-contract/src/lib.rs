//! Custody Contract — The credential record store.
//!
//! Every operation takes a [`TransactionContext`](custody_ledger::TransactionContext)
//! and rehydrates its working copy from the ledger; nothing is cached
//! between calls.

pub mod contract;
pub mod custody;
pub mod error;

pub use contract::CredentialContract;
pub use error::{ContractError, Operation};
