//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - Master-passphrase hashing, verification, and strength rules (`guard`)
//! - The OS-CSPRNG entry point used by every random draw (`random`)

pub mod guard;
pub mod random;

// Re-export the most commonly used items.
pub use guard::{hash_passphrase, validate_strength, verify_passphrase, Argon2Params};
