//! End-to-end tests driving `VaultSession` over a `MemoryStore`.

use chrono::{DateTime, Duration, Utc};
use credvault::crypto::guard::Argon2Params;
use credvault::lockout::MAX_ATTEMPTS;
use credvault::transfer;
use credvault::vault::{MemoryStore, UnlockOutcome, VaultSession};
use credvault::VaultError;
use tempfile::TempDir;

const PASS: &str = "Master-Pass1!";

fn t0() -> DateTime<Utc> {
    "2026-05-20T09:30:00Z".parse().unwrap()
}

/// Session over a fresh in-memory store with fast Argon2 parameters.
fn new_session() -> VaultSession<MemoryStore> {
    let params = Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    VaultSession::with_params(MemoryStore::new(), params)
}

fn initialized_session() -> VaultSession<MemoryStore> {
    let mut session = new_session();
    session.initialize(PASS).expect("initialize");
    session
}

// ---------------------------------------------------------------------------
// Unlock flow
// ---------------------------------------------------------------------------

#[test]
fn correct_passphrase_unlocks() {
    let mut session = initialized_session();
    assert_eq!(session.unlock(PASS, t0()).unwrap(), UnlockOutcome::Accepted);
}

#[test]
fn wrong_passphrase_counts_down_remaining_attempts() {
    let mut session = initialized_session();

    for expected_remaining in (1..MAX_ATTEMPTS).rev() {
        let outcome = session.unlock("Wrong-Pass9?", t0()).unwrap();
        assert_eq!(
            outcome,
            UnlockOutcome::Rejected {
                attempts_remaining: expected_remaining
            }
        );
    }
}

#[test]
fn fifth_failure_locks_for_five_minutes() {
    let mut session = initialized_session();

    let mut outcome = UnlockOutcome::Accepted;
    for _ in 0..MAX_ATTEMPTS {
        outcome = session.unlock("Wrong-Pass9?", t0()).unwrap();
    }

    assert_eq!(
        outcome,
        UnlockOutcome::Locked {
            remaining_seconds: 5 * 60
        }
    );

    // Even the correct passphrase is refused while locked.
    let later = t0() + Duration::seconds(30);
    assert_eq!(
        session.unlock(PASS, later).unwrap(),
        UnlockOutcome::Locked {
            remaining_seconds: 5 * 60 - 30
        }
    );
}

#[test]
fn lock_expiry_allows_unlock_and_preserves_escalation() {
    let mut session = initialized_session();

    for _ in 0..MAX_ATTEMPTS {
        session.unlock("Wrong-Pass9?", t0()).unwrap();
    }

    let after_expiry = t0() + Duration::seconds(5 * 60);
    assert_eq!(
        session.unlock(PASS, after_expiry).unwrap(),
        UnlockOutcome::Accepted
    );

    // The next lockout escalates from cycle 1: still 5 minutes (second
    // table entry), but reached through a preserved cycle counter.
    for _ in 0..MAX_ATTEMPTS {
        session.unlock("Wrong-Pass9?", after_expiry).unwrap();
    }
    for _ in 0..MAX_ATTEMPTS {
        // Third crossing: 20 minutes.
        let t2 = after_expiry + Duration::seconds(5 * 60);
        if let UnlockOutcome::Locked { remaining_seconds } =
            session.unlock("Wrong-Pass9?", t2).unwrap()
        {
            assert_eq!(remaining_seconds, 20 * 60);
            return;
        }
    }
    panic!("third lockout never happened");
}

#[test]
fn biometric_success_clears_failure_bookkeeping() {
    let mut session = initialized_session();

    session.unlock("Wrong-Pass9?", t0()).unwrap();
    session.unlock("Wrong-Pass9?", t0()).unwrap();
    session.biometric_unlock().unwrap();

    // Counter is back at zero: a fresh failure reports 4 remaining.
    assert_eq!(
        session.unlock("Wrong-Pass9?", t0()).unwrap(),
        UnlockOutcome::Rejected {
            attempts_remaining: MAX_ATTEMPTS - 1
        }
    );
}

// ---------------------------------------------------------------------------
// Passphrase lifecycle
// ---------------------------------------------------------------------------

#[test]
fn change_passphrase_requires_the_current_one() {
    let mut session = initialized_session();

    assert!(matches!(
        session.change_passphrase("Wrong-Pass9?", "Next-Pass2@"),
        Err(VaultError::PassphraseMismatch)
    ));

    session.change_passphrase(PASS, "Next-Pass2@").unwrap();
    assert_eq!(
        session.unlock("Next-Pass2@", t0()).unwrap(),
        UnlockOutcome::Accepted
    );
    assert!(matches!(
        session.unlock(PASS, t0()).unwrap(),
        UnlockOutcome::Rejected { .. }
    ));
}

#[test]
fn change_passphrase_rejects_a_weak_replacement() {
    let mut session = initialized_session();
    assert!(matches!(
        session.change_passphrase(PASS, "weak"),
        Err(VaultError::WeakPassphrase(_))
    ));

    // The old passphrase still works.
    assert_eq!(session.unlock(PASS, t0()).unwrap(), UnlockOutcome::Accepted);
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[test]
fn add_update_delete_entry_lifecycle() {
    let mut session = initialized_session();

    let added = session.add_entry("github.com", "alice", "hunter2").unwrap();
    assert_eq!(session.entries().unwrap().len(), 1);

    session
        .update_entry(&added.id, "github.com", "alice", "rotated!")
        .unwrap();
    let entries = session.entries().unwrap();
    assert_eq!(entries[0].secret, "rotated!");
    assert_eq!(entries[0].id, added.id, "id must survive edits");

    session.delete_entry(&added.id).unwrap();
    assert!(session.entries().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Import / export through the file boundary
// ---------------------------------------------------------------------------

#[test]
fn export_import_round_trip_through_files() {
    let mut session = initialized_session();
    session.add_entry("github.com", "alice", "hunter2").unwrap();
    session.add_entry("mail.com", "bob", "p,w\"d!").unwrap();

    let export = session.export_csv(t0()).unwrap();
    assert!(export.file_name.starts_with("credentials_20-05-2026_"));

    let dir = TempDir::new().unwrap();
    let path = transfer::write_export(dir.path(), &export).unwrap();
    let content = transfer::read_import(&path).unwrap();

    // Importing our own export into the same vault adds nothing.
    let summary = session.import_csv(&content).unwrap();
    assert_eq!(summary.added, 0);
    assert_eq!(summary.error_count, 0);
    assert_eq!(session.entries().unwrap().len(), 2);

    // Importing into a fresh vault reproduces the content.
    let mut other = new_session();
    other.initialize(PASS).unwrap();
    let summary = other.import_csv(&content).unwrap();
    assert_eq!(summary.added, 2);

    let entries = other.entries().unwrap();
    assert_eq!(entries[0].service, "github.com");
    assert_eq!(entries[1].secret, "p,w\"d!");
}

#[test]
fn import_appends_only_new_rows_and_reports_errors() {
    let mut session = initialized_session();
    session.add_entry("kept.com", "alice", "old").unwrap();

    let content = "url,username,password\n\
                   \"kept.com\",\"alice\",\"old\"\n\
                   \"new.com\",\"bob\",\"fresh\"\n\
                   \"broken.com\",\"carol\",\"\"\n";

    let summary = session.import_csv(content).unwrap();
    assert_eq!(summary.added, 1);
    assert_eq!(summary.error_count, 1);

    let entries = session.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].service, "new.com");
}

// ---------------------------------------------------------------------------
// Factory reset
// ---------------------------------------------------------------------------

#[test]
fn factory_reset_clears_everything_including_lock_cycle() {
    let mut session = initialized_session();
    session.add_entry("svc", "user", "pass").unwrap();
    for _ in 0..MAX_ATTEMPTS {
        session.unlock("Wrong-Pass9?", t0()).unwrap();
    }

    session.factory_reset().unwrap();

    assert!(!session.is_initialized().unwrap());
    assert!(session.entries().unwrap().is_empty());

    // A fresh setup starts from the initial lockout state: no lock, and
    // the first lockout after reset uses the first table entry again.
    session.initialize(PASS).unwrap();
    let mut outcome = UnlockOutcome::Accepted;
    for _ in 0..MAX_ATTEMPTS {
        outcome = session.unlock("Wrong-Pass9?", t0()).unwrap();
    }
    assert_eq!(
        outcome,
        UnlockOutcome::Locked {
            remaining_seconds: 5 * 60
        }
    );
}
