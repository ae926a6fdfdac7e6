//! Custody Ledger — The world-state collaborator consumed by the credential
//! record store, the per-invocation transaction context, and an in-memory
//! ledger for tests and local tooling.

pub mod context;
pub mod error;
pub mod memory;

pub use context::{CallContext, Ledger, TransactionContext};
pub use error::LedgerError;
pub use memory::MemoryLedger;
