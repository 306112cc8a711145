//! Master-passphrase hashing, verification, and strength rules.
//!
//! The stored record is a `(hash, salt)` pair of base64 strings.  The
//! digest is Argon2id — memory-hard on purpose, so a stolen local record
//! resists offline brute force.  Verification recomputes the digest with
//! the stored salt and compares in constant time.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::crypto::random;
use crate::errors::{Result, VaultError};
use crate::vault::entry::MasterRecord;

/// Length of the random salt in bytes (256 bits).
const SALT_LEN: usize = 32;

/// Length of the derived digest in bytes (256 bits).
const DIGEST_LEN: usize = 32;

/// Minimum passphrase length accepted by `validate_strength`.
const MIN_PASSPHRASE_LEN: usize = 8;

/// Characters that count as "special" for strength validation.
///
/// Matches the special class used by the password generator, so every
/// generated password passes validation.
pub const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Argon2id cost parameters.
///
/// Mirrors the fields in `Settings` so hosts can tune the work factor
/// from configuration.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Hash a passphrase with a fresh random salt.
///
/// Returns a `MasterRecord` holding the base64-encoded digest and salt.
/// Every call draws a new 32-byte salt, so two hashes of the same
/// passphrase never collide.
pub fn hash_passphrase(passphrase: &str, params: &Argon2Params) -> Result<MasterRecord> {
    let mut salt = [0u8; SALT_LEN];
    random::fill_bytes(&mut salt);

    let mut digest = derive_digest(passphrase, &salt, params)?;
    let record = MasterRecord {
        hash: BASE64.encode(digest),
        salt: BASE64.encode(salt),
    };
    digest.zeroize();

    Ok(record)
}

/// Verify a passphrase against a stored `MasterRecord`.
///
/// Recomputes the digest with the stored salt and compares against the
/// stored hash in constant time, so the comparison leaks nothing about
/// where a mismatch occurs.
pub fn verify_passphrase(
    passphrase: &str,
    record: &MasterRecord,
    params: &Argon2Params,
) -> Result<bool> {
    let salt = BASE64
        .decode(&record.salt)
        .map_err(|e| VaultError::SerializationError(format!("master record salt: {e}")))?;
    let mut expected = BASE64
        .decode(&record.hash)
        .map_err(|e| VaultError::SerializationError(format!("master record hash: {e}")))?;

    let mut digest = derive_digest(passphrase, &salt, params)?;
    let matches = digest.ct_eq(expected.as_slice()).into();

    digest.zeroize();
    expected.zeroize();

    Ok(matches)
}

/// Check passphrase strength, reporting the first violated rule.
///
/// Rules, in priority order: minimum length, an uppercase letter, a
/// digit, and a character from `SPECIAL_CHARS`.
pub fn validate_strength(passphrase: &str) -> Result<()> {
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(VaultError::WeakPassphrase(format!(
            "must be at least {MIN_PASSPHRASE_LEN} characters long"
        )));
    }
    if !passphrase.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(VaultError::WeakPassphrase(
            "must contain at least one uppercase letter".into(),
        ));
    }
    if !passphrase.chars().any(|c| c.is_ascii_digit()) {
        return Err(VaultError::WeakPassphrase(
            "must contain at least one digit".into(),
        ));
    }
    if !passphrase.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(VaultError::WeakPassphrase(format!(
            "must contain at least one special character ({SPECIAL_CHARS})"
        )));
    }
    Ok(())
}

/// Derive the Argon2id digest for `passphrase` + `salt`.
///
/// Deterministic: the same passphrase, salt, and params always produce
/// the same digest.
fn derive_digest(
    passphrase: &str,
    salt: &[u8],
    params: &Argon2Params,
) -> Result<[u8; DIGEST_LEN]> {
    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(DIGEST_LEN),
    )
    .map_err(|e| VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut digest = [0u8; DIGEST_LEN];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut digest)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(digest)
}

#[cfg(test)]
pub(crate) fn test_params() -> Argon2Params {
    // Reduced cost so the test suite stays fast.  Never use outside tests.
    Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}
