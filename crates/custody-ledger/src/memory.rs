use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use dashmap::DashMap;

use crate::context::Ledger;
use crate::error::LedgerError;

/// In-memory world state.
///
/// Stands in for the ledger platform in tests and local tooling. Reads and
/// writes can be made to fail on demand to exercise error paths.
#[derive(Default)]
pub struct MemoryLedger {
    /// Key → stored bytes.
    state: DashMap<String, Vec<u8>>,
    /// Number of successful puts.
    writes: AtomicUsize,
    /// Puts still allowed before writes start failing; `None` is unlimited.
    write_budget: Mutex<Option<usize>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with existing state. Seeding does not count
    /// as a write.
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let ledger = Self::new();
        for (key, value) in entries {
            ledger.state.insert(key, value);
        }
        ledger
    }

    /// Make every subsequent `get` fail with `Unavailable`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `put` fail with `Unavailable`. Clearing the
    /// flag also lifts any limit set by [`fail_writes_after`](Self::fail_writes_after).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
        if !fail {
            *self.budget() = None;
        }
    }

    /// Let `n` more puts succeed, then fail every put after them.
    pub fn fail_writes_after(&self, n: usize) {
        *self.budget() = Some(n);
    }

    fn budget(&self) -> std::sync::MutexGuard<'_, Option<usize>> {
        self.write_budget
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim room for `n` puts, or refuse all of them.
    fn reserve_writes(&self, n: usize, key: &str) -> Result<(), LedgerError> {
        let refused = || LedgerError::Unavailable(format!("write of {} refused", key));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(refused());
        }
        let mut budget = self.budget();
        if let Some(left) = budget.as_mut() {
            *left = left.checked_sub(n).ok_or_else(refused)?;
        }
        Ok(())
    }

    /// Number of successful puts since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Sorted list of stored keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Copy of the full state, sorted by key.
    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        let mut entries: Vec<(String, Vec<u8>)> = self
            .state
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl Ledger for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable(format!("read of {} refused", key)));
        }
        Ok(self.state.get(key).map(|e| e.value().clone()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::InvalidKey("key must not be empty".into()));
        }
        self.reserve_writes(1, key)?;
        self.state.insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(key = %key, bytes = value.len(), "world state put");
        Ok(())
    }

    /// Checks the whole write set before applying any of it.
    fn put_batch(&self, writes: &[(String, Vec<u8>)]) -> Result<(), LedgerError> {
        let Some((first, _)) = writes.first() else {
            return Ok(());
        };
        if writes.iter().any(|(key, _)| key.is_empty()) {
            return Err(LedgerError::InvalidKey("key must not be empty".into()));
        }
        self.reserve_writes(writes.len(), first)?;
        for (key, value) in writes {
            self.state.insert(key.clone(), value.clone());
        }
        self.writes.fetch_add(writes.len(), Ordering::SeqCst);
        tracing::trace!(keys = writes.len(), "world state batch put");
        Ok(())
    }
}
