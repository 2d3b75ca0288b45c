use crate::bank_store::BankDescriptor;
use crate::error::BankError;
use fontsynth_ports::bank::BankPayloadSource;
use fontsynth_ports::storage::{ScratchStoragePort, StorageError};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Copies embedded payloads into scratch storage so a path-based loader can
/// read them. Each bank is written at most once per descriptor.
pub struct BankStager {
    scratch: Box<dyn ScratchStoragePort>,
    payloads: Box<dyn BankPayloadSource>,
    instance_id: String,
    writes: usize,
}

impl BankStager {
    pub fn new(
        scratch: Box<dyn ScratchStoragePort>,
        payloads: Box<dyn BankPayloadSource>,
    ) -> Self {
        let mut instance_id = Uuid::new_v4().simple().to_string();
        instance_id.truncate(8);
        Self {
            scratch,
            payloads,
            instance_id,
            writes: 0,
        }
    }

    pub fn scratch(&self) -> &dyn ScratchStoragePort {
        self.scratch.as_ref()
    }

    pub fn payloads(&self) -> &dyn BankPayloadSource {
        self.payloads.as_ref()
    }

    /// Number of payload files written so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// `<stem>-<instance id>-<slot>.<ext>`, with anything outside
    /// `[A-Za-z0-9._-]` replaced so the name stays a single path component.
    /// Sanitizing can map distinct bank names onto one stem; the slot keeps
    /// their files apart.
    pub fn staged_file_name(&self, bank_name: &str, slot: usize) -> String {
        let sanitized: String = bank_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let sanitized = sanitized.trim_start_matches('.');
        let path = Path::new(sanitized);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("bank");

        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) => format!("{stem}-{}-{slot}.{ext}", self.instance_id),
            None => format!("{stem}-{}-{slot}", self.instance_id),
        }
    }

    pub fn stage(&mut self, descriptor: &mut BankDescriptor) -> Result<PathBuf, BankError> {
        if let Some(path) = descriptor.staged_path() {
            return Ok(path.to_path_buf());
        }

        let name = descriptor.name().to_string();
        let payload = self
            .payloads
            .payload(&name)
            .ok_or_else(|| BankError::PayloadMissing(name.clone()))?;

        self.scratch
            .ensure_scratch_dir()
            .map_err(|e| BankError::StorageUnavailable {
                bank: name.clone(),
                reason: e.to_string(),
            })?;

        // one slot per successful write, so no two banks share a file
        let file_name = self.staged_file_name(&name, self.writes);
        let path = self
            .scratch
            .write_file(&file_name, payload)
            .map_err(|e| match e {
                StorageError::Unavailable(reason) => BankError::StorageUnavailable {
                    bank: name.clone(),
                    reason,
                },
                other => BankError::WriteFailed {
                    bank: name.clone(),
                    reason: other.to_string(),
                },
            })?;

        self.writes += 1;
        info!(bank = %name, path = %path.display(), bytes = payload.len(), "staged soundfont");
        descriptor.set_staged_path(path.clone());
        Ok(path)
    }
}
