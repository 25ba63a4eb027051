//! Durable key-value storage for the PawnRepo client.
//!
//! Session tokens live in a small client-local store that survives process
//! restarts until explicitly cleared:
//! - [`FileStorage`]: a JSON object persisted to a single file
//! - [`MemoryStorage`]: process-local, for tests and ephemeral sessions

mod file;
mod keys;
mod memory;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use traits::DurableStorage;

use std::path::PathBuf;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing file exists but does not hold a valid store
    #[error("Corrupted store at {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
