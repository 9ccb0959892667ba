//! Storage error types for fit-store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from storage operations.
///
/// `NotFound` is deliberately distinct from both "empty collection" (a
/// successful load of zero records) and "corrupt data" (recovered per line,
/// reported through `DecodeReport`).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No saved data exists for the requested user/period.
    #[error("No saved data at {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading or writing a file failed.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile file could not be encoded.
    #[error("Failed to encode profile: {0}")]
    ProfileEncode(#[from] toml::ser::Error),
}
