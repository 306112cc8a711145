//! Strong random password generation.
//!
//! Guarantees at least one character from each of the four classes
//! (uppercase, lowercase, digit, special), then shuffles so the
//! guaranteed characters are not predictably front-loaded.

use crate::crypto::random;
use crate::errors::{Result, VaultError};

/// Character classes, in the fixed seeding order.
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SPECIAL: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Default length of a generated password.
pub const DEFAULT_LENGTH: usize = 15;

/// Minimum length: one character per class.
const MIN_LENGTH: usize = 4;

/// Generate a random password of `DEFAULT_LENGTH` characters.
pub fn generate_default() -> Result<String> {
    generate(DEFAULT_LENGTH)
}

/// Generate a random password of exactly `length` characters.
///
/// One character from each class is drawn first, the remaining positions
/// are uniform draws over the union of all classes, and the whole
/// sequence is shuffled with a Fisher–Yates permutation.  Every draw
/// comes from the OS CSPRNG.
///
/// Fails with `InvalidArgument` when `length < 4` — there is no way to
/// cover all four classes in fewer characters.
pub fn generate(length: usize) -> Result<String> {
    if length < MIN_LENGTH {
        return Err(VaultError::InvalidArgument(format!(
            "password length must be at least {MIN_LENGTH}, got {length}"
        )));
    }

    let all: Vec<char> = [UPPERCASE, LOWERCASE, DIGITS, SPECIAL]
        .concat()
        .chars()
        .collect();

    let mut chars: Vec<char> = Vec::with_capacity(length);
    for class in [UPPERCASE, LOWERCASE, DIGITS, SPECIAL] {
        chars.push(pick(class));
    }
    while chars.len() < length {
        chars.push(all[random::random_index(all.len())]);
    }

    random::shuffle(&mut chars);

    Ok(chars.into_iter().collect())
}

/// Draw one uniform random character from an ASCII class.
fn pick(class: &str) -> char {
    let bytes = class.as_bytes();
    bytes[random::random_index(bytes.len())] as char
}
