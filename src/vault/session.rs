//! High-level vault operations used by the host application.
//!
//! `VaultSession` wraps a `RecordStore` and composes the guard, lockout,
//! and CSV layers so the host can work with simple method calls like
//! `session.unlock("...", Utc::now())`.  All state flows value-in /
//! value-out through the store — the session holds no credential state
//! of its own.

use chrono::{DateTime, Utc};

use crate::crypto::guard::{self, Argon2Params};
use crate::csv;
use crate::errors::{Result, VaultError};
use crate::lockout::{self, MAX_ATTEMPTS};
use crate::transfer::{self, CsvExport};
use crate::vault::entry::CredentialEntry;
use crate::vault::store::RecordStore;

/// The answer to one unlock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// Passphrase verified; the vault is open.
    Accepted,
    /// Passphrase rejected; this many attempts remain before a lock.
    Rejected { attempts_remaining: u32 },
    /// A lock window is active (or this attempt just entered one).
    Locked { remaining_seconds: u64 },
}

/// Result of a CSV import: entries appended and rows skipped as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub error_count: usize,
}

/// The main vault handle.
pub struct VaultSession<S: RecordStore> {
    store: S,
    params: Argon2Params,
}

impl<S: RecordStore> VaultSession<S> {
    /// Create a session over `store` with default Argon2 parameters.
    pub fn new(store: S) -> Self {
        Self::with_params(store, Argon2Params::default())
    }

    /// Create a session with explicit Argon2 parameters (e.g. from
    /// `Settings::argon2_params`).
    pub fn with_params(store: S, params: Argon2Params) -> Self {
        Self { store, params }
    }

    // ------------------------------------------------------------------
    // Master passphrase
    // ------------------------------------------------------------------

    /// True once a master passphrase has been set up.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.store.load_master()?.is_some())
    }

    /// First-time setup: strength-check the passphrase and persist its
    /// hash+salt record.
    pub fn initialize(&mut self, passphrase: &str) -> Result<()> {
        if self.store.load_master()?.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }
        guard::validate_strength(passphrase)?;

        let record = guard::hash_passphrase(passphrase, &self.params)?;
        self.store.save_master(&record)
    }

    /// Attempt to unlock the vault.
    ///
    /// Flow: normalize the persisted lockout state, refuse without
    /// verifying while a lock window is active, otherwise verify and
    /// record the result.  The updated lockout state is persisted before
    /// the outcome is returned.
    pub fn unlock(&mut self, passphrase: &str, now: DateTime<Utc>) -> Result<UnlockOutcome> {
        let state = lockout::normalize(self.store.load_lockout()?, now);

        let status = lockout::check_status(&state, now);
        if status.locked {
            return Ok(UnlockOutcome::Locked {
                remaining_seconds: status.remaining_seconds,
            });
        }

        let record = self.store.load_master()?.ok_or(VaultError::MasterNotSet)?;

        if guard::verify_passphrase(passphrase, &record, &self.params)? {
            self.store.save_lockout(&lockout::record_success(state))?;
            return Ok(UnlockOutcome::Accepted);
        }

        let state = lockout::record_failure(state, now);
        self.store.save_lockout(&state)?;

        let status = lockout::check_status(&state, now);
        if status.locked {
            Ok(UnlockOutcome::Locked {
                remaining_seconds: status.remaining_seconds,
            })
        } else {
            Ok(UnlockOutcome::Rejected {
                attempts_remaining: MAX_ATTEMPTS - state.failed_attempts,
            })
        }
    }

    /// Consume a positive result from the external biometric prompt.
    ///
    /// The prompt itself is not validated here; a confirmed biometric
    /// unlock is bookkept exactly like a successful passphrase unlock.
    pub fn biometric_unlock(&mut self) -> Result<()> {
        let state = lockout::record_success(self.store.load_lockout()?);
        self.store.save_lockout(&state)
    }

    /// Replace the master passphrase.
    ///
    /// Verifies the current passphrase first, strength-checks the new
    /// one, and replaces the record wholesale.
    pub fn change_passphrase(&mut self, current: &str, new: &str) -> Result<()> {
        let record = self.store.load_master()?.ok_or(VaultError::MasterNotSet)?;

        if !guard::verify_passphrase(current, &record, &self.params)? {
            return Err(VaultError::PassphraseMismatch);
        }
        guard::validate_strength(new)?;

        let new_record = guard::hash_passphrase(new, &self.params)?;
        self.store.save_master(&new_record)
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// The current credential list.
    pub fn entries(&self) -> Result<Vec<CredentialEntry>> {
        self.store.load_entries()
    }

    /// Add a new credential and return it (with its generated id).
    pub fn add_entry(
        &mut self,
        service: &str,
        username: &str,
        secret: &str,
    ) -> Result<CredentialEntry> {
        let entry = CredentialEntry::new(service.into(), username.into(), secret.into());

        let mut entries = self.store.load_entries()?;
        entries.push(entry.clone());
        self.store.save_entries(&entries)?;

        Ok(entry)
    }

    /// Update an existing credential's service, username, and secret.
    /// The id never changes.
    pub fn update_entry(
        &mut self,
        id: &str,
        service: &str,
        username: &str,
        secret: &str,
    ) -> Result<()> {
        let mut entries = self.store.load_entries()?;

        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;
        entry.service = service.into();
        entry.username = username.into();
        entry.secret = secret.into();

        self.store.save_entries(&entries)
    }

    /// Remove a credential by id.
    pub fn delete_entry(&mut self, id: &str) -> Result<()> {
        let mut entries = self.store.load_entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            return Err(VaultError::EntryNotFound(id.to_string()));
        }
        self.store.save_entries(&entries)
    }

    // ------------------------------------------------------------------
    // Import / export
    // ------------------------------------------------------------------

    /// Serialize the vault to CSV, ready for the external file sink.
    ///
    /// Fails with `NothingToExport` when the vault is empty.
    pub fn export_csv(&self, now: DateTime<Utc>) -> Result<CsvExport> {
        let entries = self.store.load_entries()?;
        if entries.is_empty() {
            return Err(VaultError::NothingToExport);
        }

        Ok(CsvExport {
            file_name: transfer::export_file_name(now),
            content: csv::serialize(&entries),
        })
    }

    /// Import CSV content from the external file source.
    ///
    /// Blank content is `EmptySource`; a bad header aborts the whole
    /// import; malformed rows are counted and skipped; duplicates are
    /// dropped silently.  Accepted entries are appended and persisted.
    pub fn import_csv(&mut self, content: &str) -> Result<ImportSummary> {
        if content.trim().is_empty() {
            return Err(VaultError::EmptySource);
        }

        let mut entries = self.store.load_entries()?;
        let report = csv::parse(content, &entries)?;

        let summary = ImportSummary {
            added: report.entries.len(),
            error_count: report.error_count,
        };

        if !report.entries.is_empty() {
            entries.extend(report.entries);
            self.store.save_entries(&entries)?;
        }

        Ok(summary)
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Factory reset: clears the credential list, the master record, and
    /// the lockout state (the only operation that resets `lock_cycle`).
    pub fn factory_reset(&mut self) -> Result<()> {
        self.store.clear_all()
    }
}
