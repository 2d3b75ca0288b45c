use fontsynth_ports::synth::{EngineSettings, SynthEngine, SynthError};
use fontsynth_ports::types::{BankHandle, Channel};
use rustysynth::{SoundFont, Synthesizer, SynthesizerSettings};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

// rustysynth accepts 8..=256 voices.
const MIN_POLYPHONY: usize = 8;
const MAX_POLYPHONY: usize = 256;
const SCRATCH_FRAMES: usize = 8192;

pub struct RustySynth {
    settings: EngineSettings,
    next_handle: u32,
    loaded: Option<LoadedFont>,
    scratch_right: Vec<f32>,
}

struct LoadedFont {
    handle: BankHandle,
    sound_font: Arc<SoundFont>,
    synth: Synthesizer,
}

impl RustySynth {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            next_handle: 1,
            loaded: None,
            scratch_right: vec![0.0; SCRATCH_FRAMES],
        }
    }

    pub fn preset_count(&self) -> usize {
        self.loaded
            .as_ref()
            .map(|font| font.sound_font.get_presets().len())
            .unwrap_or(0)
    }

    pub fn bank_name(&self) -> Option<String> {
        let font = self.loaded.as_ref()?;
        let name = font.sound_font.get_info().get_bank_name().trim().to_string();
        (!name.is_empty()).then_some(name)
    }

    fn build_synthesizer(
        settings: &EngineSettings,
        sound_font: &Arc<SoundFont>,
    ) -> Result<Synthesizer, SynthError> {
        let mut synth_settings = SynthesizerSettings::new(settings.sample_rate_hz as i32);
        synth_settings.maximum_polyphony = settings
            .max_polyphony
            .clamp(MIN_POLYPHONY, MAX_POLYPHONY);
        synth_settings.enable_reverb_and_chorus = false;

        let mut synth = Synthesizer::new(sound_font, &synth_settings)
            .map_err(|e| SynthError::Backend(e.to_string()))?;
        synth.set_master_volume(settings.master_gain.get());
        Ok(synth)
    }

    fn with_synth(&mut self, f: impl FnOnce(&mut Synthesizer)) {
        if let Some(font) = self.loaded.as_mut() {
            f(&mut font.synth);
        }
    }
}

impl Default for RustySynth {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl SynthEngine for RustySynth {
    fn configure(&mut self, settings: EngineSettings) {
        self.settings = settings;
        if let Some(font) = self.loaded.as_mut() {
            // On failure the previous synthesizer keeps running at its old rate.
            if let Ok(synth) = Self::build_synthesizer(&settings, &font.sound_font) {
                font.synth = synth;
            }
        }
    }

    fn load_bank(&mut self, path: &Path) -> Result<BankHandle, SynthError> {
        let file = File::open(path)
            .map_err(|e| SynthError::SoundFontLoad(format!("{}: {}", path.display(), e)))?;
        let mut reader = BufReader::new(file);
        let sound_font = Arc::new(
            SoundFont::new(&mut reader).map_err(|e| SynthError::SoundFontLoad(e.to_string()))?,
        );
        let synth = Self::build_synthesizer(&self.settings, &sound_font)?;

        let handle = BankHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        self.loaded = Some(LoadedFont {
            handle,
            sound_font,
            synth,
        });
        Ok(handle)
    }

    fn unload_bank(&mut self, handle: BankHandle) -> Result<(), SynthError> {
        match self.loaded.as_ref() {
            Some(font) if font.handle == handle => {
                // Samples live in the synthesizer's Arc<SoundFont>; dropping it
                // after the current render returns is safe.
                self.loaded = None;
                Ok(())
            }
            _ => Err(SynthError::UnknownHandle(handle)),
        }
    }

    fn loaded_bank_count(&self) -> usize {
        usize::from(self.loaded.is_some())
    }

    fn note_on(&mut self, channel: Channel, note: u8, velocity: u8) {
        self.with_synth(|synth| synth.note_on(channel as i32, note as i32, velocity as i32));
    }

    fn note_off(&mut self, channel: Channel, note: u8) {
        self.with_synth(|synth| synth.note_off(channel as i32, note as i32));
    }

    fn control_change(&mut self, channel: Channel, controller: u8, value: u8) {
        self.with_synth(|synth| {
            synth.process_midi_message(channel as i32, 0xB0, controller as i32, value as i32)
        });
    }

    fn pitch_bend(&mut self, channel: Channel, value: u16) {
        let value = value.min(16_383);
        let lsb = (value & 0x7F) as i32;
        let msb = (value >> 7) as i32;
        self.with_synth(|synth| synth.process_midi_message(channel as i32, 0xE0, lsb, msb));
    }

    fn channel_pressure(&mut self, channel: Channel, value: u8) {
        self.with_synth(|synth| {
            synth.process_midi_message(channel as i32, 0xD0, value as i32, 0)
        });
    }

    fn reset(&mut self) {
        self.with_synth(|synth| synth.reset());
    }

    fn render(&mut self, left: &mut [f32], right: Option<&mut [f32]>) {
        let Some(font) = self.loaded.as_mut() else {
            left.fill(0.0);
            if let Some(right) = right {
                right.fill(0.0);
            }
            return;
        };

        match right {
            Some(right) => {
                let frames = left.len().min(right.len());
                font.synth.render(&mut left[..frames], &mut right[..frames]);
            }
            None => {
                // mono: render in scratch-sized chunks and keep the left side
                for chunk in left.chunks_mut(self.scratch_right.len()) {
                    let scratch = &mut self.scratch_right[..chunk.len()];
                    font.synth.render(chunk, scratch);
                }
            }
        }
    }
}
