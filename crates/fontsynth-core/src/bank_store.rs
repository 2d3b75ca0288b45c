use crate::error::BankError;
use fontsynth_ports::storage::ScratchStoragePort;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankDescriptor {
    name: String,
    staged_path: Option<PathBuf>,
}

impl BankDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            staged_path: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn staged_path(&self) -> Option<&Path> {
        self.staged_path.as_deref()
    }

    pub(crate) fn set_staged_path(&mut self, path: PathBuf) {
        self.staged_path = Some(path);
    }
}

/// Registered banks in insertion order. Owns the staged file paths; the
/// files go away through `cleanup`.
#[derive(Debug, Default)]
pub struct BankStore {
    banks: Vec<BankDescriptor>,
}

impl BankStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` for a name that is already registered; the existing
    /// descriptor (and any staged path) is kept.
    pub fn register_bank(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.banks.iter().any(|bank| bank.name == name) {
            return false;
        }
        self.banks.push(BankDescriptor::new(name));
        true
    }

    pub fn list_banks(&self) -> Vec<String> {
        self.names().map(str::to_string).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.banks.iter().map(|bank| bank.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Result<&BankDescriptor, BankError> {
        self.banks
            .iter()
            .find(|bank| bank.name == name)
            .ok_or_else(|| BankError::NotFound(name.to_string()))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Result<&mut BankDescriptor, BankError> {
        self.banks
            .iter_mut()
            .find(|bank| bank.name == name)
            .ok_or_else(|| BankError::NotFound(name.to_string()))
    }

    pub fn staged_paths(&self) -> impl Iterator<Item = &Path> {
        self.banks.iter().filter_map(|bank| bank.staged_path())
    }

    /// Remove every staged file and forget the paths. Files that are already
    /// gone count as removed. A path whose removal fails is kept so the next
    /// cleanup retries it. Returns how many paths were released.
    pub fn cleanup(&mut self, scratch: &dyn ScratchStoragePort) -> usize {
        let mut released = 0;
        for bank in self.banks.iter_mut() {
            let Some(path) = bank.staged_path.take() else {
                continue;
            };
            match scratch.remove_file(&path) {
                Ok(()) => {
                    debug!(bank = %bank.name, path = %path.display(), "removed staged soundfont");
                    released += 1;
                }
                Err(err) => {
                    warn!(bank = %bank.name, error = %err, "failed to remove staged soundfont");
                    bank.staged_path = Some(path);
                }
            }
        }
        released
    }
}
