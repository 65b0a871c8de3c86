use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that can escape the store. Reads never produce one: a missing or
/// unreadable file is treated as an empty library.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write library file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode library")]
    Serialize(#[from] serde_json::Error),
}
