//! CredVault — the platform-independent core of an offline credential
//! vault gated by a single master passphrase.
//!
//! The crate owns the deterministic logic: passphrase hashing and
//! verification, the progressive-lockout state machine, strong password
//! generation, and the CSV import/export codec.  Screens, biometric
//! sensors, clipboards, file pickers, and the durable key-value store
//! are external collaborators reached through the trait boundaries in
//! [`vault::store`] and the helpers in [`transfer`].

pub mod config;
pub mod crypto;
pub mod csv;
pub mod errors;
pub mod generator;
pub mod lockout;
pub mod transfer;
pub mod vault;

pub use config::Settings;
pub use errors::{Result, VaultError};
pub use vault::{CredentialEntry, MasterRecord, UnlockOutcome, VaultSession};
