//! The persistence boundary.
//!
//! The core never talks to disk, keychain, or platform storage itself.
//! It reads the three logical records as values and writes back full
//! replacements through `RecordStore`; whatever implements the trait
//! owns durability and the single-writer discipline.
//!
//! `MemoryStore` is the reference implementation: each record lives as a
//! serialized JSON string under a fixed key, exactly the shape a
//! key-value host store would persist.

use std::collections::HashMap;

use crate::errors::{Result, VaultError};
use crate::lockout::LockoutState;
use crate::vault::entry::{CredentialEntry, MasterRecord};

/// Storage keys for the three logical records.
const ENTRIES_KEY: &str = "credvault:entries";
const MASTER_KEY: &str = "credvault:master_record";
const LOCKOUT_KEY: &str = "credvault:lockout_state";

/// External key-value store holding the vault's persisted records.
///
/// Absent records have defined meanings: no entries is an empty vault,
/// no master record means setup has not happened, and no lockout state
/// is the initial `{0, None, 0}`.
///
/// Implementations report backend failures as `VaultError::StorageError`
/// and must keep read-modify-write sequences single-writer.
pub trait RecordStore {
    /// Load the credential list (empty if never saved).
    fn load_entries(&self) -> Result<Vec<CredentialEntry>>;

    /// Replace the credential list wholesale.
    fn save_entries(&mut self, entries: &[CredentialEntry]) -> Result<()>;

    /// Load the master record, or `None` before first setup.
    fn load_master(&self) -> Result<Option<MasterRecord>>;

    /// Replace the master record wholesale.
    fn save_master(&mut self, record: &MasterRecord) -> Result<()>;

    /// Load the lockout state (initial state if never saved).
    fn load_lockout(&self) -> Result<LockoutState>;

    /// Replace the lockout state wholesale.
    fn save_lockout(&mut self, state: &LockoutState) -> Result<()>;

    /// Remove all three records — factory reset.
    fn clear_all(&mut self) -> Result<()>;
}

/// In-memory `RecordStore` keeping records as JSON strings.
///
/// Used in tests and as a template for host implementations backed by a
/// real key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<&'static str, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.records.get(key) {
            Some(json) => serde_json::from_str(json)
                .map(Some)
                .map_err(|e| VaultError::SerializationError(format!("{key}: {e}"))),
            None => Ok(None),
        }
    }

    fn write<T: serde::Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| VaultError::SerializationError(format!("{key}: {e}")))?;
        self.records.insert(key, json);
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn load_entries(&self) -> Result<Vec<CredentialEntry>> {
        Ok(self.read(ENTRIES_KEY)?.unwrap_or_default())
    }

    fn save_entries(&mut self, entries: &[CredentialEntry]) -> Result<()> {
        self.write(ENTRIES_KEY, &entries)
    }

    fn load_master(&self) -> Result<Option<MasterRecord>> {
        self.read(MASTER_KEY)
    }

    fn save_master(&mut self, record: &MasterRecord) -> Result<()> {
        self.write(MASTER_KEY, record)
    }

    fn load_lockout(&self) -> Result<LockoutState> {
        Ok(self.read(LOCKOUT_KEY)?.unwrap_or_default())
    }

    fn save_lockout(&mut self, state: &LockoutState) -> Result<()> {
        self.write(LOCKOUT_KEY, state)
    }

    fn clear_all(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}
