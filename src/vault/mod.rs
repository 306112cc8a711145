//! Vault module — the credential list and everything that gates it.
//!
//! This module provides:
//! - `CredentialEntry` and `MasterRecord` models (`entry`)
//! - The external persistence boundary (`store`)
//! - The high-level `VaultSession` orchestrator (`session`)

pub mod entry;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{CredentialEntry, MasterRecord};
pub use session::{ImportSummary, UnlockOutcome, VaultSession};
pub use store::{MemoryStore, RecordStore};
