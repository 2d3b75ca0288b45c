use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("scratch storage unavailable: {0}")]
    Unavailable(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Scratch area where embedded payloads are copied so path-based loaders
/// can read them.
pub trait ScratchStoragePort: Send + Sync {
    fn scratch_dir(&self) -> &Path;

    /// Create the scratch directory if it does not exist yet.
    fn ensure_scratch_dir(&self) -> Result<(), StorageError>;

    /// Write `bytes` to `file_name` inside the scratch directory, replacing
    /// any previous content. Returns the full path.
    fn write_file(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError>;

    /// Remove a file previously written. A missing file is not an error.
    fn remove_file(&self, path: &Path) -> Result<(), StorageError>;
}
