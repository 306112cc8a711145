use thiserror::Error;

/// All errors that can occur in CredVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Passphrase errors ---
    #[error("Weak passphrase: {0}")]
    WeakPassphrase(String),

    #[error("Passphrase mismatch — current passphrase is incorrect")]
    PassphraseMismatch,

    #[error("No master passphrase has been set up yet")]
    MasterNotSet,

    #[error("A master passphrase already exists — use change_passphrase to replace it")]
    AlreadyInitialized,

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Entry errors ---
    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    // --- Import/export errors ---
    #[error("Malformed CSV header: {0}")]
    MalformedHeader(String),

    #[error("Source is empty — select a file with CSV content")]
    EmptySource,

    #[error("No file selected")]
    NoFileSelected,

    #[error("Nothing to export — the vault has no entries yet")]
    NothingToExport,

    // --- Argument errors ---
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // --- Store errors ---
    #[error("Store error: {0}")]
    StorageError(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for CredVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
