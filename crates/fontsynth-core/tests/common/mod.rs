#![allow(dead_code)]

use fontsynth_core::{EmbeddedBanks, ProcessorConfig, RenderPipeline, SynthProcessor};
use fontsynth_infra_storage_fs::FsScratchStorage;
use fontsynth_ports::storage::{ScratchStoragePort, StorageError};
use fontsynth_ports::synth::{EngineSettings, SynthEngine, SynthError};
use fontsynth_ports::types::{BankHandle, Channel};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const BANK_A: &[u8] = b"RIFF-bank-A-payload";
pub const BANK_B: &[u8] = b"RIFF-bank-B-payload-longer";

pub fn payloads_ab() -> EmbeddedBanks {
    EmbeddedBanks::new()
        .with_bank("A", BANK_A)
        .with_bank("B", BANK_B)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Configure(EngineSettings),
    Load(PathBuf),
    Unload(BankHandle),
    NoteOn { channel: Channel, note: u8, velocity: u8 },
    NoteOff { channel: Channel, note: u8 },
    ControlChange { channel: Channel, controller: u8, value: u8 },
    PitchBend { channel: Channel, value: u16 },
    ChannelPressure { channel: Channel, value: u8 },
    Reset,
    Render { frames: usize },
}

/// Shared view into a `ProbeEngine` that outlives the boxed engine.
#[derive(Clone, Default)]
pub struct Probe {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub fail_load: Arc<AtomicBool>,
    pub fail_unload: Arc<AtomicBool>,
    pub renders: Arc<AtomicUsize>,
    pub torn_renders: Arc<AtomicUsize>,
}

impl Probe {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn loads(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Load(_)))
            .count()
    }

    pub fn engine(&self) -> Box<ProbeEngine> {
        Box::new(ProbeEngine {
            probe: self.clone(),
            next_handle: 1,
            loaded: None,
            mid_switch: false,
        })
    }
}

/// Records every call. Renders a constant 0.5 while a bank is loaded and
/// counts renders that land between an unload and the following load.
pub struct ProbeEngine {
    probe: Probe,
    next_handle: u32,
    loaded: Option<BankHandle>,
    mid_switch: bool,
}

impl ProbeEngine {
    fn record(&self, call: Call) {
        self.probe.calls.lock().push(call);
    }
}

impl SynthEngine for ProbeEngine {
    fn configure(&mut self, settings: EngineSettings) {
        self.record(Call::Configure(settings));
    }

    fn load_bank(&mut self, path: &Path) -> Result<BankHandle, SynthError> {
        self.record(Call::Load(path.to_path_buf()));
        if self.probe.fail_load.load(Ordering::SeqCst) {
            return Err(SynthError::SoundFontLoad("probe refused".into()));
        }
        if !path.is_file() {
            return Err(SynthError::SoundFontLoad(format!("{} missing", path.display())));
        }
        let handle = BankHandle(self.next_handle);
        self.next_handle += 1;
        self.loaded = Some(handle);
        self.mid_switch = false;
        Ok(handle)
    }

    fn unload_bank(&mut self, handle: BankHandle) -> Result<(), SynthError> {
        self.record(Call::Unload(handle));
        if self.probe.fail_unload.load(Ordering::SeqCst) {
            return Err(SynthError::SoundFontUnload("probe refused".into()));
        }
        if self.loaded != Some(handle) {
            return Err(SynthError::UnknownHandle(handle));
        }
        self.loaded = None;
        self.mid_switch = true;
        Ok(())
    }

    fn loaded_bank_count(&self) -> usize {
        usize::from(self.loaded.is_some())
    }

    fn note_on(&mut self, channel: Channel, note: u8, velocity: u8) {
        self.record(Call::NoteOn { channel, note, velocity });
    }

    fn note_off(&mut self, channel: Channel, note: u8) {
        self.record(Call::NoteOff { channel, note });
    }

    fn control_change(&mut self, channel: Channel, controller: u8, value: u8) {
        self.record(Call::ControlChange { channel, controller, value });
    }

    fn pitch_bend(&mut self, channel: Channel, value: u16) {
        self.record(Call::PitchBend { channel, value });
    }

    fn channel_pressure(&mut self, channel: Channel, value: u8) {
        self.record(Call::ChannelPressure { channel, value });
    }

    fn reset(&mut self) {
        self.record(Call::Reset);
    }

    fn render(&mut self, left: &mut [f32], right: Option<&mut [f32]>) {
        self.probe.renders.fetch_add(1, Ordering::SeqCst);
        if self.mid_switch {
            self.probe.torn_renders.fetch_add(1, Ordering::SeqCst);
        }
        let value = if self.loaded.is_some() { 0.5 } else { 0.0 };
        left.fill(value);
        if let Some(right) = right {
            right.fill(value);
        }
        self.record(Call::Render { frames: left.len() });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScratchFailure {
    CreateDir,
    Write,
}

/// Scratch storage that fails on demand.
pub struct FailingScratch {
    dir: PathBuf,
    failure: ScratchFailure,
}

impl FailingScratch {
    pub fn new(failure: ScratchFailure) -> Self {
        Self {
            dir: PathBuf::from("/nonexistent/fontsynth-probe"),
            failure,
        }
    }
}

impl ScratchStoragePort for FailingScratch {
    fn scratch_dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_scratch_dir(&self) -> Result<(), StorageError> {
        match self.failure {
            ScratchFailure::CreateDir => Err(StorageError::Unavailable("read-only volume".into())),
            ScratchFailure::Write => Ok(()),
        }
    }

    fn write_file(&self, file_name: &str, _bytes: &[u8]) -> Result<PathBuf, StorageError> {
        Err(StorageError::WriteFailed(format!("{file_name}: disk full")))
    }

    fn remove_file(&self, _path: &Path) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Real filesystem storage whose removals can be made to fail.
pub struct StubbornScratch {
    inner: FsScratchStorage,
    pub fail_remove: Arc<AtomicBool>,
}

impl StubbornScratch {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            inner: FsScratchStorage::new(dir),
            fail_remove: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl ScratchStoragePort for StubbornScratch {
    fn scratch_dir(&self) -> &Path {
        self.inner.scratch_dir()
    }

    fn ensure_scratch_dir(&self) -> Result<(), StorageError> {
        self.inner.ensure_scratch_dir()
    }

    fn write_file(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        self.inner.write_file(file_name, bytes)
    }

    fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(StorageError::Io(format!("{}: busy", path.display())));
        }
        self.inner.remove_file(path)
    }
}

pub fn fs_scratch(dir: &tempfile::TempDir) -> Box<FsScratchStorage> {
    Box::new(FsScratchStorage::new(dir.path().join("banks")))
}

pub fn probe_processor(
    probe: &Probe,
    dir: &tempfile::TempDir,
) -> (SynthProcessor, RenderPipeline) {
    SynthProcessor::new(
        ProcessorConfig::default(),
        probe.engine(),
        Box::new(payloads_ab()),
        fs_scratch(dir),
    )
    .expect("default config is valid")
}

pub fn stereo(frames: usize, fill: f32) -> (Vec<f32>, Vec<f32>) {
    (vec![fill; frames], vec![fill; frames])
}
