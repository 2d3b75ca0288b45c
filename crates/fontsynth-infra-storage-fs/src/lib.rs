use fontsynth_ports::storage::{ScratchStoragePort, StorageError};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_SCRATCH_DIR_NAME: &str = "FontSynthBanks";

pub struct FsScratchStorage {
    base_dir: PathBuf,
}

impl FsScratchStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// `<cache dir>/<name>`, falling back to the system temp directory.
    pub fn default_base_dir(dir_name: &str) -> PathBuf {
        dirs_next::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(dir_name)
    }

    fn target_path(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(file_name);
        if candidate.file_name() != Some(candidate.as_os_str()) {
            return Err(StorageError::WriteFailed(format!(
                "invalid scratch file name: {file_name}"
            )));
        }
        Ok(self.base_dir.join(candidate))
    }
}

impl Default for FsScratchStorage {
    fn default() -> Self {
        Self::new(Self::default_base_dir(DEFAULT_SCRATCH_DIR_NAME))
    }
}

impl ScratchStoragePort for FsScratchStorage {
    fn scratch_dir(&self) -> &Path {
        &self.base_dir
    }

    fn ensure_scratch_dir(&self) -> Result<(), StorageError> {
        if self.base_dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.base_dir).map_err(|e| {
            StorageError::Unavailable(format!("{}: {}", self.base_dir.display(), e))
        })?;
        debug!(dir = %self.base_dir.display(), "created scratch directory");
        Ok(())
    }

    /// Writes to a hidden `.partial` sibling first and renames it into
    /// place, so a failed write never leaves a file under the final name. The
    /// partial file is removed on every failure path.
    fn write_file(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.target_path(file_name)?;
        let partial = self.base_dir.join(format!(".{file_name}.partial"));

        let written = write_synced(&partial, bytes).and_then(|()| fs::rename(&partial, &path));
        if let Err(e) = written {
            discard(&partial);
            return Err(StorageError::WriteFailed(format!("{}: {}", path.display(), e)));
        }
        Ok(path)
    }

    fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(format!("{}: {}", path.display(), e))),
        }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;

    let written = file.metadata()?.len();
    if written != bytes.len() as u64 {
        return Err(io::Error::new(
            ErrorKind::WriteZero,
            format!("wrote {} of {} bytes", written, bytes.len()),
        ));
    }
    Ok(())
}

fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "discarded partial scratch file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to discard partial scratch file"),
    }
}
