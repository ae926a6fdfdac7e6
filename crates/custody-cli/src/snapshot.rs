//! JSON snapshot substrate for running the record store outside a ledger
//! platform.
//!
//! The whole world state is loaded into memory, the command runs against
//! it, and the snapshot is rewritten only if the command succeeded.

use anyhow::{Context, Result};
use custody_ledger::{Ledger, LedgerError, MemoryLedger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk layout: key → hex-encoded value.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// World state backed by a snapshot file.
pub struct SnapshotLedger {
    path: PathBuf,
    state: MemoryLedger,
}

impl SnapshotLedger {
    /// Load the snapshot at `path`. A missing file is an empty world state.
    pub fn open(path: &Path) -> Result<Self> {
        let file = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            serde_json::from_str::<SnapshotFile>(&contents)
                .with_context(|| format!("parsing snapshot {}", path.display()))?
        } else {
            SnapshotFile::default()
        };

        let mut entries = Vec::with_capacity(file.entries.len());
        for (key, value) in file.entries {
            let bytes = hex::decode(&value)
                .with_context(|| format!("snapshot entry {} is not valid hex", key))?;
            entries.push((key, bytes));
        }

        tracing::debug!(path = %path.display(), keys = entries.len(), "snapshot loaded");
        Ok(Self {
            path: path.to_path_buf(),
            state: MemoryLedger::with_entries(entries),
        })
    }

    /// Whether anything was written since the snapshot was opened.
    pub fn is_dirty(&self) -> bool {
        self.state.write_count() > 0
    }

    /// Persist the world state, replacing the file in one rename.
    pub fn save(&self) -> Result<()> {
        let file = SnapshotFile {
            entries: self
                .state
                .entries()
                .into_iter()
                .map(|(k, v)| (k, hex::encode(v)))
                .collect(),
        };
        let contents = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("writing snapshot {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing snapshot {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), keys = self.state.len(), "snapshot saved");
        Ok(())
    }
}

impl Ledger for SnapshotLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.state.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.state.put(key, value)
    }

    fn put_batch(&self, writes: &[(String, Vec<u8>)]) -> Result<(), LedgerError> {
        self.state.put_batch(writes)
    }
}
