use crate::bank_stager::BankStager;
use crate::bank_store::BankStore;
use crate::error::BankError;
use fontsynth_ports::bank::BankPayloadSource;
use fontsynth_ports::storage::ScratchStoragePort;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Bank store and stager behind one registry. The store is populated from
/// the payload source, so the two cannot drift apart unless a caller
/// registers extra names by hand.
pub struct BankLibrary {
    store: BankStore,
    stager: BankStager,
}

impl BankLibrary {
    pub fn new(
        payloads: Box<dyn BankPayloadSource>,
        scratch: Box<dyn ScratchStoragePort>,
    ) -> Self {
        let mut store = BankStore::new();
        for name in payloads.bank_names() {
            store.register_bank(name);
        }
        Self {
            store,
            stager: BankStager::new(scratch, payloads),
        }
    }

    pub fn store(&self) -> &BankStore {
        &self.store
    }

    pub fn bank_names(&self) -> Vec<String> {
        self.store.list_banks()
    }

    pub fn register_bank(&mut self, name: impl Into<String>) -> bool {
        self.store.register_bank(name)
    }

    /// Lookup plus staging. Performs file I/O on first use of a bank.
    pub fn resolve(&mut self, name: &str) -> Result<PathBuf, BankError> {
        let descriptor = self.store.lookup_mut(name)?;
        self.stager.stage(descriptor)
    }

    /// Stage every registered bank. Failures are logged and left for the
    /// next `resolve` to retry. Returns the number of staged banks.
    pub fn stage_all(&mut self) -> usize {
        let mut staged = 0;
        for name in self.store.list_banks() {
            match self.resolve(&name) {
                Ok(_) => staged += 1,
                Err(err) => warn!(bank = %name, error = %err, "eager staging failed"),
            }
        }
        staged
    }

    pub fn staged_path(&self, name: &str) -> Option<&Path> {
        self.store.lookup(name).ok()?.staged_path()
    }

    pub fn write_count(&self) -> usize {
        self.stager.write_count()
    }

    pub fn scratch_dir(&self) -> &Path {
        self.stager.scratch().scratch_dir()
    }

    /// Remove staged files. Safe to call more than once.
    pub fn cleanup(&mut self) {
        let released = self.store.cleanup(self.stager.scratch());
        if released > 0 {
            info!(files = released, "cleaned up staged soundfonts");
        }
    }
}

impl Drop for BankLibrary {
    fn drop(&mut self) {
        self.cleanup();
    }
}
