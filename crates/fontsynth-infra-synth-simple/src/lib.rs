//! Additive sine engine. It accepts any non-empty bank file and derives a
//! partial count from it, which is enough to tell banks apart by ear and in
//! tests without an SF2 parser.

use fontsynth_ports::midi::{CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF, CC_SUSTAIN, PITCH_BEND_CENTER};
use fontsynth_ports::synth::{EngineSettings, SynthEngine, SynthError};
use fontsynth_ports::types::{BankHandle, Channel, MIDI_CHANNELS};
use std::f32::consts::TAU;
use std::fs;
use std::path::Path;

const MAX_BANKS: usize = 8;
const MAX_PARTIALS: u32 = 4;
const RELEASE_SECONDS: f32 = 0.2;
const BEND_RANGE_SEMITONES: f32 = 2.0;

pub struct SimpleSynth {
    sample_rate_hz: f32,
    max_voices: usize,
    master_gain: f32,
    next_handle: u32,
    banks: Vec<LoadedBank>,
    channels: [ChannelState; MIDI_CHANNELS],
    voices: Vec<Voice>,
    note_counter: u64,
}

#[derive(Clone, Copy, Debug)]
struct LoadedBank {
    handle: BankHandle,
    partials: u32,
}

#[derive(Clone, Copy, Debug)]
struct ChannelState {
    sustain_down: bool,
    volume: f32,
    bend_ratio: f32,
}

#[derive(Clone, Debug)]
struct Voice {
    bank: BankHandle,
    channel: Channel,
    note: u8,
    freq: f32,
    phase: f32,
    amplitude: f32,
    partials: u32,
    key_down: bool,
    sustained: bool,
    release_samples_left: u32,
    release_total_samples: u32,
    finished: bool,
    age: u64,
}

impl ChannelState {
    const fn new() -> Self {
        Self {
            sustain_down: false,
            volume: 1.0,
            bend_ratio: 1.0,
        }
    }
}

impl SimpleSynth {
    pub fn new(settings: EngineSettings) -> Self {
        let mut synth = Self {
            sample_rate_hz: 44_100.0,
            max_voices: 8,
            master_gain: 1.0,
            next_handle: 1,
            banks: Vec::with_capacity(MAX_BANKS),
            channels: [ChannelState::new(); MIDI_CHANNELS],
            voices: Vec::new(),
            note_counter: 0,
        };
        synth.configure(settings);
        synth
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.len()
    }

    fn current_bank(&self) -> Option<LoadedBank> {
        self.banks.last().copied()
    }

    fn release_samples(&self) -> u32 {
        ((self.sample_rate_hz * RELEASE_SECONDS) as u32).max(1)
    }

    fn release_voice(voice: &mut Voice, sustain_down: bool) {
        voice.key_down = false;
        if sustain_down {
            voice.sustained = true;
        } else if voice.release_samples_left == 0 {
            voice.release_samples_left = voice.release_total_samples;
        }
    }

    fn release_channel(&mut self, channel: Channel, immediate: bool) {
        for voice in self.voices.iter_mut().filter(|v| v.channel == channel) {
            voice.key_down = false;
            voice.sustained = false;
            voice.release_samples_left = if immediate {
                0
            } else {
                voice.release_total_samples
            };
        }
        if immediate {
            self.voices.retain(|voice| voice.channel != channel);
        }
    }

    fn sustain(&mut self, channel: Channel, down: bool) {
        let state = &mut self.channels[channel as usize];
        state.sustain_down = down;
        if down {
            return;
        }
        for voice in self.voices.iter_mut().filter(|v| v.channel == channel) {
            if !voice.key_down && voice.sustained {
                voice.sustained = false;
                voice.release_samples_left = voice.release_total_samples;
            }
        }
    }
}

impl Default for SimpleSynth {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

fn channel_index(channel: Channel) -> Option<usize> {
    let index = channel as usize;
    (index < MIDI_CHANNELS).then_some(index)
}

fn partials_for(bytes_len: u64) -> u32 {
    1 + (bytes_len % MAX_PARTIALS as u64) as u32
}

impl SynthEngine for SimpleSynth {
    fn configure(&mut self, settings: EngineSettings) {
        self.sample_rate_hz = settings.sample_rate_hz.max(1) as f32;
        self.max_voices = settings.max_polyphony.max(1);
        self.master_gain = settings.master_gain.get();
        self.voices.clear();
        self.voices.reserve(self.max_voices);
    }

    fn load_bank(&mut self, path: &Path) -> Result<BankHandle, SynthError> {
        let metadata = fs::metadata(path)
            .map_err(|e| SynthError::SoundFontLoad(format!("{}: {}", path.display(), e)))?;
        if !metadata.is_file() || metadata.len() == 0 {
            return Err(SynthError::SoundFontLoad(format!(
                "{}: empty or not a file",
                path.display()
            )));
        }
        if self.banks.len() >= MAX_BANKS {
            return Err(SynthError::Backend("too many banks loaded".to_string()));
        }

        let handle = BankHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        self.banks.push(LoadedBank {
            handle,
            partials: partials_for(metadata.len()),
        });
        Ok(handle)
    }

    fn unload_bank(&mut self, handle: BankHandle) -> Result<(), SynthError> {
        let index = self
            .banks
            .iter()
            .position(|bank| bank.handle == handle)
            .ok_or(SynthError::UnknownHandle(handle))?;
        self.banks.remove(index);

        for voice in self.voices.iter_mut().filter(|v| v.bank == handle) {
            voice.key_down = false;
            voice.sustained = false;
            if voice.release_samples_left == 0 {
                voice.release_samples_left = voice.release_total_samples;
            }
        }
        Ok(())
    }

    fn loaded_bank_count(&self) -> usize {
        self.banks.len()
    }

    fn note_on(&mut self, channel: Channel, note: u8, velocity: u8) {
        if velocity == 0 {
            self.note_off(channel, note);
            return;
        }
        let Some(index) = channel_index(channel) else {
            return;
        };
        let Some(bank) = self.current_bank() else {
            return;
        };
        self.note_counter = self.note_counter.wrapping_add(1);

        if self.voices.len() >= self.max_voices {
            if let Some((oldest, _)) = self
                .voices
                .iter()
                .enumerate()
                .min_by_key(|(_, voice)| voice.age)
            {
                self.voices.swap_remove(oldest);
            }
        }

        let normalized = velocity.min(127) as f32 / 127.0;
        let voice = Voice {
            bank: bank.handle,
            channel: index as Channel,
            note,
            freq: 440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0),
            phase: 0.0,
            amplitude: normalized * normalized,
            partials: bank.partials,
            key_down: true,
            sustained: false,
            release_samples_left: 0,
            release_total_samples: self.release_samples(),
            finished: false,
            age: self.note_counter,
        };
        self.voices.push(voice);
    }

    fn note_off(&mut self, channel: Channel, note: u8) {
        let Some(index) = channel_index(channel) else {
            return;
        };
        let sustain_down = self.channels[index].sustain_down;
        for voice in self
            .voices
            .iter_mut()
            .filter(|v| v.channel == channel && v.note == note && v.key_down)
        {
            Self::release_voice(voice, sustain_down);
        }
    }

    fn control_change(&mut self, channel: Channel, controller: u8, value: u8) {
        let Some(index) = channel_index(channel) else {
            return;
        };
        match controller {
            7 => self.channels[index].volume = value.min(127) as f32 / 127.0,
            CC_SUSTAIN => self.sustain(channel, value >= 64),
            CC_ALL_SOUND_OFF => self.release_channel(channel, true),
            CC_ALL_NOTES_OFF => self.release_channel(channel, false),
            _ => {}
        }
    }

    fn pitch_bend(&mut self, channel: Channel, value: u16) {
        let Some(index) = channel_index(channel) else {
            return;
        };
        let offset = value.min(16_383) as f32 - PITCH_BEND_CENTER as f32;
        let semitones = offset / PITCH_BEND_CENTER as f32 * BEND_RANGE_SEMITONES;
        self.channels[index].bend_ratio = 2.0_f32.powf(semitones / 12.0);
    }

    fn channel_pressure(&mut self, _channel: Channel, _value: u8) {}

    fn reset(&mut self) {
        self.voices.clear();
        self.channels = [ChannelState::new(); MIDI_CHANNELS];
    }

    fn render(&mut self, left: &mut [f32], mut right: Option<&mut [f32]>) {
        left.fill(0.0);
        if let Some(right) = right.as_deref_mut() {
            right.fill(0.0);
        }

        let frames = match right.as_deref() {
            Some(right) => left.len().min(right.len()),
            None => left.len(),
        };
        let amplitude = 0.2 * self.master_gain;

        for voice in &mut self.voices {
            let channel = self.channels[voice.channel as usize];
            let phase_step = TAU * voice.freq * channel.bend_ratio / self.sample_rate_hz;
            for i in 0..frames {
                let mut gain = voice.amplitude * channel.volume;
                if voice.release_samples_left > 0 {
                    gain *= voice.release_samples_left as f32 / voice.release_total_samples as f32;
                    voice.release_samples_left -= 1;
                    voice.finished = voice.release_samples_left == 0;
                }

                let mut sample = 0.0;
                for partial in 1..=voice.partials {
                    sample += (voice.phase * partial as f32).sin() / partial as f32;
                }
                let sample = sample * gain * amplitude;
                left[i] += sample;
                if let Some(right) = right.as_deref_mut() {
                    right[i] += sample;
                }

                voice.phase += phase_step;
                if voice.phase >= TAU {
                    voice.phase -= TAU;
                }
                if voice.finished {
                    break;
                }
            }
        }

        self.voices.retain(|voice| !voice.finished);
    }
}
