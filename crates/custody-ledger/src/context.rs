//! Ledger access and caller identity for a single invocation.

use chrono::{DateTime, Utc};

use crate::error::LedgerError;

/// Key/value world state provided by the ledger platform.
///
/// Both calls are atomic and ordered by the platform relative to other
/// transactions. Implementations use interior mutability so a shared
/// reference is enough to write.
pub trait Ledger {
    /// Fetch the bytes stored under `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Store a transaction's whole write set as one unit: either every
    /// entry lands or none does.
    ///
    /// The default issues one `put` per entry and is only all-or-nothing
    /// when the platform commits a transaction's writes together, as a
    /// ledger's read/write set does. Stores that apply puts immediately
    /// must override it.
    fn put_batch(&self, writes: &[(String, Vec<u8>)]) -> Result<(), LedgerError> {
        for (key, value) in writes {
            self.put(key, value)?;
        }
        Ok(())
    }
}

impl<L: Ledger + ?Sized> Ledger for &L {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put(key, value)
    }

    fn put_batch(&self, writes: &[(String, Vec<u8>)]) -> Result<(), LedgerError> {
        (**self).put_batch(writes)
    }
}

/// Execution context handed to every record-store operation.
pub trait TransactionContext {
    /// World state for this transaction.
    fn ledger(&self) -> &dyn Ledger;

    /// DID of the party submitting the transaction.
    fn caller_did(&self) -> &str;

    /// Time at which status-affecting changes are stamped.
    fn tx_timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A ledger paired with the identity of the submitting party.
pub struct CallContext<'a> {
    ledger: &'a dyn Ledger,
    caller_did: String,
    /// Fixed transaction time; the wall clock when unset.
    timestamp: Option<DateTime<Utc>>,
}

impl<'a> CallContext<'a> {
    pub fn new(ledger: &'a dyn Ledger, caller_did: impl Into<String>) -> Self {
        Self {
            ledger,
            caller_did: caller_did.into(),
            timestamp: None,
        }
    }

    /// Pin the transaction time instead of reading the clock.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl TransactionContext for CallContext<'_> {
    fn ledger(&self) -> &dyn Ledger {
        self.ledger
    }

    fn caller_did(&self) -> &str {
        &self.caller_did
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or_else(Utc::now)
    }
}
