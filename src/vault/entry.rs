//! The records a vault persists.
//!
//! `CredentialEntry` is one stored credential; the list of entries is
//! the vault itself.  `MasterRecord` is the hash+salt pair gating vault
//! access — exactly one exists per installation (or none before first
//! setup), and it is only ever replaced wholesale.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::crypto::random;

/// Alphabet for the random suffix of an entry id.
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix of an entry id.
const ID_SUFFIX_LEN: usize = 9;

/// A single stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    /// Unique within the vault, assigned at creation, never mutated.
    pub id: String,

    /// The service this credential belongs to (a URL or a name).
    pub service: String,

    /// The account identifier at that service.
    pub username: String,

    /// The credential itself.
    pub secret: String,
}

impl CredentialEntry {
    /// Create a new entry with a freshly generated id.
    pub fn new(service: String, username: String, secret: String) -> Self {
        Self {
            id: new_entry_id(),
            service,
            username,
            secret,
        }
    }

    /// True when `other` holds the same service, username, and secret.
    ///
    /// This is the duplicate test used by CSV import — ids are ignored.
    pub fn same_content(&self, other: &CredentialEntry) -> bool {
        self.service == other.service
            && self.username == other.username
            && self.secret == other.secret
    }
}

/// The stored master-passphrase record: base64 digest + base64 salt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterRecord {
    pub hash: String,
    pub salt: String,
}

/// Generate a unique entry id: `<unix-millis>-<9 random base-36 chars>`.
///
/// The timestamp prefix keeps ids roughly sortable by creation time; the
/// random suffix makes collisions within the same millisecond negligible.
fn new_entry_id() -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[random::random_index(ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_gets_a_fresh_id() {
        let a = CredentialEntry::new("github.com".into(), "alice".into(), "hunter2".into());
        let b = CredentialEntry::new("github.com".into(), "alice".into(), "hunter2".into());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn entry_id_has_expected_shape() {
        let entry = CredentialEntry::new("s".into(), "u".into(), "p".into());
        let (millis, suffix) = entry.id.split_once('-').expect("id has a dash");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn same_content_ignores_id() {
        let a = CredentialEntry::new("svc".into(), "user".into(), "pass".into());
        let b = CredentialEntry::new("svc".into(), "user".into(), "pass".into());
        assert!(a.same_content(&b));
    }

    #[test]
    fn same_content_compares_all_three_fields() {
        let base = CredentialEntry::new("svc".into(), "user".into(), "pass".into());

        let mut other = base.clone();
        other.secret = "different".into();
        assert!(!base.same_content(&other));

        let mut other = base.clone();
        other.username = "different".into();
        assert!(!base.same_content(&other));

        let mut other = base.clone();
        other.service = "different".into();
        assert!(!base.same_content(&other));
    }

    #[test]
    fn entry_round_trips_through_json() {
        let entry = CredentialEntry::new("example.com".into(), "bob".into(), "s3cret".into());
        let json = serde_json::to_string(&entry).unwrap();
        let back: CredentialEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
