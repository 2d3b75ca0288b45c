use crate::config::{ProcessorConfig, DEFAULT_SAMPLE_RATE_HZ};
use crate::engine::SharedEngine;
use crate::gain::apply_velocity_compensation;
use crate::keyboard::{KeyboardState, MidiInputReceiver};
use crate::translator::translate_block;
use fontsynth_ports::audio::AudioBlock;
use fontsynth_ports::midi::MidiEvent;
use fontsynth_ports::synth::EngineSettings;
use fontsynth_ports::types::{Channel, Shared};
use tracing::debug;

/// Audio-thread half of the processor. `process` takes no allocation, does
/// no I/O and only blocks on the engine lock while a bank switch holds it.
pub struct RenderPipeline {
    engine: SharedEngine,
    keyboard: Shared<KeyboardState>,
    midi_in: MidiInputReceiver,
    instrument_channel: Channel,
    settings: EngineSettings,
}

impl RenderPipeline {
    pub fn new(
        engine: SharedEngine,
        keyboard: Shared<KeyboardState>,
        midi_in: MidiInputReceiver,
        config: &ProcessorConfig,
    ) -> Self {
        Self {
            engine,
            keyboard,
            midi_in,
            instrument_channel: config.instrument_channel,
            settings: config.engine_settings(DEFAULT_SAMPLE_RATE_HZ),
        }
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.settings.sample_rate_hz
    }

    /// Host hook before streaming starts; not realtime.
    pub fn prepare_to_play(&mut self, sample_rate_hz: u32) {
        self.settings.sample_rate_hz = sample_rate_hz;
        self.engine.lock().engine_mut().configure(self.settings);
        self.midi_in.clear();
        debug!(sample_rate_hz, "render pipeline prepared");
    }

    /// Host hook after streaming stops.
    pub fn release_resources(&mut self) {
        self.engine.lock().engine_mut().reset();
        self.midi_in.clear();
        self.keyboard.reset();
    }

    pub fn process(&mut self, block: &mut AudioBlock<'_, '_>, events: &[MidiEvent]) {
        let input_channels = block.input_channels();
        block.clear_from(input_channels);

        {
            let mut state = self.engine.lock();
            translate_block(state.engine_mut(), self.instrument_channel, events);
        }

        apply_velocity_compensation(block, events);

        // Display state only; the side channel never drives the engine here.
        for event in events {
            self.keyboard.apply(&event.message);
        }
        self.midi_in.drain_into(&self.keyboard);

        let mut state = self.engine.lock();
        if let Some((left, right)) = block.stereo_mut() {
            if !left.is_empty() {
                state.engine_mut().render(left, right);
            }
        }
    }
}
