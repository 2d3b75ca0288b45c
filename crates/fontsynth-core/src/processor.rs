use crate::bank_library::BankLibrary;
use crate::bank_switch::{BankSwitchController, SwitchOutcome};
use crate::config::{ProcessorConfig, StagingPolicy, DEFAULT_SAMPLE_RATE_HZ};
use crate::engine::{shared_engine, ActiveBank, SharedEngine};
use crate::error::{BankError, ConfigError};
use crate::ipc::{Command, Event};
use crate::keyboard::{midi_collector, KeyboardState, MidiInputSender};
use crate::render_pipeline::RenderPipeline;
use fontsynth_ports::bank::BankPayloadSource;
use fontsynth_ports::storage::ScratchStoragePort;
use fontsynth_ports::synth::SynthEngine;
use fontsynth_ports::types::{BankHandle, Channel, Shared};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Control-thread half of the processor: bank selection, note input from
/// the UI, and the event queue the UI drains. Its audio-thread counterpart
/// is the `RenderPipeline` returned alongside it.
pub struct SynthProcessor {
    config: ProcessorConfig,
    engine: SharedEngine,
    controller: BankSwitchController,
    keyboard: Shared<KeyboardState>,
    midi_input: MidiInputSender,
    events: VecDeque<Event>,
}

impl SynthProcessor {
    pub fn new(
        config: ProcessorConfig,
        mut engine: Box<dyn SynthEngine>,
        payloads: Box<dyn BankPayloadSource>,
        scratch: Box<dyn ScratchStoragePort>,
    ) -> Result<(Self, RenderPipeline), ConfigError> {
        config.validate()?;

        engine.configure(config.engine_settings(DEFAULT_SAMPLE_RATE_HZ));
        let engine = shared_engine(engine);

        let mut library = BankLibrary::new(payloads, scratch);
        if config.staging == StagingPolicy::Eager {
            let staged = library.stage_all();
            info!(staged, total = library.store().len(), "eager soundfont staging");
        }

        let keyboard = Arc::new(KeyboardState::new());
        let (midi_input, midi_receiver) = midi_collector(config.collector_capacity);
        let pipeline = RenderPipeline::new(engine.clone(), keyboard.clone(), midi_receiver, &config);

        let processor = Self {
            controller: BankSwitchController::new(engine.clone(), library),
            config,
            engine,
            keyboard,
            midi_input,
            events: VecDeque::new(),
        };
        Ok((processor, pipeline))
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn list_bank_names(&self) -> Vec<String> {
        self.controller.library().bank_names()
    }

    /// Switch banks. Failures are logged and queued as an `Event::Alert`
    /// as well as returned.
    pub fn select_bank(&mut self, name: &str) -> Result<SwitchOutcome, BankError> {
        match self.controller.request_switch(name) {
            Ok(outcome) => {
                if let SwitchOutcome::Switched { handle, .. } = outcome {
                    self.events.push_back(Event::BankSwitched {
                        name: name.to_string(),
                        handle,
                    });
                }
                Ok(outcome)
            }
            Err(err) => {
                warn!(bank = %name, error = %err, "soundfont selection failed");
                self.events.push_back(Event::Alert {
                    title: err.title().to_string(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Select the configured initial bank, or the first listed one.
    pub fn select_initial_bank(&mut self) -> Option<Result<SwitchOutcome, BankError>> {
        let name = self
            .config
            .initial_bank
            .clone()
            .or_else(|| self.list_bank_names().into_iter().next())?;
        Some(self.select_bank(&name))
    }

    pub fn active_bank(&self) -> Option<ActiveBank> {
        self.controller.active_bank()
    }

    pub fn active_handle(&self) -> Option<BankHandle> {
        self.engine.lock().active().map(|bank| bank.handle)
    }

    pub fn staged_path(&self, name: &str) -> Option<PathBuf> {
        self.controller
            .library()
            .staged_path(name)
            .map(|path| path.to_path_buf())
    }

    pub fn staging_write_count(&self) -> usize {
        self.controller.library().write_count()
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.controller.library().scratch_dir().to_path_buf()
    }

    pub fn note_on(&self, note: u8, velocity: u8, channel: Channel) {
        self.engine.lock().engine_mut().note_on(channel, note, velocity);
        if velocity == 0 {
            self.keyboard.note_off(channel, note);
        } else {
            self.keyboard.note_on(channel, note);
        }
    }

    pub fn note_off(&self, note: u8, channel: Channel) {
        self.engine.lock().engine_mut().note_off(channel, note);
        self.keyboard.note_off(channel, note);
    }

    pub fn keyboard_state(&self) -> Shared<KeyboardState> {
        self.keyboard.clone()
    }

    pub fn midi_input(&self) -> MidiInputSender {
        self.midi_input.clone()
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), BankError> {
        match cmd {
            Command::ListBanks => {
                let names = self.list_bank_names();
                self.events.push_back(Event::BanksListed { names });
            }
            Command::SelectBank { name } => {
                self.select_bank(&name)?;
            }
            Command::NoteOn {
                note,
                velocity,
                channel,
            } => self.note_on(note, velocity, channel),
            Command::NoteOff { note, channel } => self.note_off(note, channel),
            Command::Shutdown => self.shutdown(),
        }
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    /// Remove staged files. Call once the host has stopped the audio thread;
    /// also runs on drop.
    pub fn shutdown(&mut self) {
        self.controller.library_mut().cleanup();
    }
}
