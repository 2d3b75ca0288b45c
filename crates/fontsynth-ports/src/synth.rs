use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum SynthError {
    #[error("soundfont load failed: {0}")]
    SoundFontLoad(String),
    #[error("soundfont unload failed: {0}")]
    SoundFontUnload(String),
    #[error("unknown bank handle {0}")]
    UnknownHandle(BankHandle),
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub sample_rate_hz: u32,
    pub max_polyphony: usize,
    pub master_gain: Gain,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44_100,
            max_polyphony: 255,
            master_gain: Gain::default(),
        }
    }
}

/// Thread model:
/// - configure / load_bank / unload_bank / reset are called from the control
///   thread while it holds the engine lock
/// - note and controller calls plus render are called from the audio thread,
///   also under the engine lock; they must be realtime-safe (no allocation,
///   no I/O)
///
/// `render` overwrites both buffers. A `None` right channel means mono output.
pub trait SynthEngine: Send {
    fn configure(&mut self, settings: EngineSettings);

    fn load_bank(&mut self, path: &Path) -> Result<BankHandle, SynthError>;

    /// Sounding notes of the unloaded bank may run out their release; the
    /// engine must not cut them in a way that corrupts an in-flight render.
    fn unload_bank(&mut self, handle: BankHandle) -> Result<(), SynthError>;

    fn loaded_bank_count(&self) -> usize;

    fn note_on(&mut self, channel: Channel, note: u8, velocity: u8);
    fn note_off(&mut self, channel: Channel, note: u8);
    fn control_change(&mut self, channel: Channel, controller: u8, value: u8);
    fn pitch_bend(&mut self, channel: Channel, value: u16);
    fn channel_pressure(&mut self, channel: Channel, value: u8);

    /// Silence everything and reset controllers; loaded banks stay loaded.
    fn reset(&mut self);

    fn render(&mut self, left: &mut [f32], right: Option<&mut [f32]>);
}
