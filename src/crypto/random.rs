//! Cryptographically strong randomness, straight from the OS CSPRNG.
//!
//! Every random draw in the crate goes through this module so there is
//! exactly one place where entropy enters: salts, password characters,
//! shuffles, entry ids, and export-file tokens.  No thread-local or
//! seeded PRNG is ever used.

use rand::rngs::OsRng;
use rand::RngCore;

/// Fill `buf` with random bytes from the OS CSPRNG.
pub fn fill_bytes(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// Return `len` random bytes from the OS CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Draw a uniform random index in `0..bound`.
///
/// Uses rejection sampling so every index is equally likely — a plain
/// `u32 % bound` would skew toward small indices when `bound` does not
/// divide `2^32`.
///
/// `bound` must be non-zero.
pub fn random_index(bound: usize) -> usize {
    debug_assert!(bound > 0, "random_index bound must be non-zero");
    let bound = bound as u32;

    // Largest multiple of `bound` that fits in a u32; draws at or above
    // it are rejected and retried.
    let zone = u32::MAX - (u32::MAX % bound);

    loop {
        let mut bytes = [0u8; 4];
        OsRng.fill_bytes(&mut bytes);
        let draw = u32::from_le_bytes(bytes);
        if draw < zone {
            return (draw % bound) as usize;
        }
    }
}

/// Shuffle `items` in place with a Fisher–Yates permutation.
///
/// Each of the `n!` orderings is equally likely because the index draws
/// come from `random_index`.
pub fn shuffle<T>(items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = random_index(i + 1);
        items.swap(i, j);
    }
}

/// Generate a random token of `digits` decimal digits (e.g. "048317").
///
/// Used to make export file names collision-resistant.
pub fn numeric_token(digits: usize) -> String {
    (0..digits)
        .map(|_| char::from(b'0' + random_index(10) as u8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_has_requested_length() {
        assert_eq!(random_bytes(16).len(), 16);
        assert_eq!(random_bytes(0).len(), 0);
    }

    #[test]
    fn random_bytes_differ_between_calls() {
        // 32 bytes colliding by chance is beyond negligible.
        assert_ne!(random_bytes(32), random_bytes(32));
    }

    #[test]
    fn random_index_stays_in_bounds() {
        for _ in 0..1000 {
            assert!(random_index(7) < 7);
        }
    }

    #[test]
    fn random_index_covers_every_value() {
        let mut seen = [false; 5];
        for _ in 0..1000 {
            seen[random_index(5)] = true;
        }
        assert!(seen.iter().all(|&s| s), "all indices should appear");
    }

    #[test]
    fn random_index_of_one_is_zero() {
        assert_eq!(random_index(1), 0);
    }

    #[test]
    fn shuffle_preserves_elements() {
        let mut items = vec![1, 2, 3, 4, 5, 6, 7, 8];
        shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn shuffle_handles_trivial_slices() {
        let mut empty: Vec<u8> = vec![];
        shuffle(&mut empty);

        let mut single = vec![42];
        shuffle(&mut single);
        assert_eq!(single, vec![42]);
    }

    #[test]
    fn numeric_token_is_all_digits() {
        let token = numeric_token(6);
        assert_eq!(token.len(), 6);
        assert!(token.chars().all(|c| c.is_ascii_digit()));
    }
}
