use fontsynth_ports::synth::SynthEngine;
use fontsynth_ports::types::BankHandle;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveBank {
    pub name: String,
    pub handle: BankHandle,
    pub path: PathBuf,
}

/// Engine plus the marker of what it has loaded. Both only change together,
/// under the lock of a `SharedEngine`.
pub struct EngineState {
    engine: Box<dyn SynthEngine>,
    active: Option<ActiveBank>,
}

/// The one lock serializing render calls against bank load/unload. Handed to
/// the render pipeline and the bank switch controller at construction.
pub type SharedEngine = Arc<Mutex<EngineState>>;

pub fn shared_engine(engine: Box<dyn SynthEngine>) -> SharedEngine {
    Arc::new(Mutex::new(EngineState::new(engine)))
}

impl EngineState {
    pub fn new(engine: Box<dyn SynthEngine>) -> Self {
        Self {
            engine,
            active: None,
        }
    }

    pub fn engine(&self) -> &dyn SynthEngine {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> &mut dyn SynthEngine {
        self.engine.as_mut()
    }

    pub fn active(&self) -> Option<&ActiveBank> {
        self.active.as_ref()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|bank| bank.name.as_str())
    }

    pub(crate) fn set_active(&mut self, bank: ActiveBank) {
        self.active = Some(bank);
    }

    pub(crate) fn clear_active(&mut self) {
        self.active = None;
    }
}
