use crate::bank_library::BankLibrary;
use crate::engine::{ActiveBank, SharedEngine};
use crate::error::BankError;
use fontsynth_ports::types::BankHandle;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The requested bank was already loaded; the engine was not touched.
    AlreadyActive { handle: BankHandle },
    Switched {
        handle: BankHandle,
        previous: Option<BankHandle>,
    },
}

impl SwitchOutcome {
    pub fn handle(&self) -> BankHandle {
        match *self {
            SwitchOutcome::AlreadyActive { handle } | SwitchOutcome::Switched { handle, .. } => {
                handle
            }
        }
    }
}

/// Swaps the engine's bank from the control thread while the render
/// pipeline keeps running. Staging I/O happens before the engine lock is
/// taken; only unload, load and the marker update run under it.
pub struct BankSwitchController {
    engine: SharedEngine,
    library: BankLibrary,
}

impl BankSwitchController {
    pub fn new(engine: SharedEngine, library: BankLibrary) -> Self {
        Self { engine, library }
    }

    pub fn library(&self) -> &BankLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut BankLibrary {
        &mut self.library
    }

    pub fn active_bank(&self) -> Option<ActiveBank> {
        self.engine.lock().active().cloned()
    }

    pub fn request_switch(&mut self, name: &str) -> Result<SwitchOutcome, BankError> {
        let already_active = {
            let state = self.engine.lock();
            state
                .active()
                .filter(|bank| bank.name == name)
                .map(|bank| bank.handle)
        };
        if let Some(handle) = already_active {
            debug!(bank = %name, "soundfont already active");
            return Ok(SwitchOutcome::AlreadyActive { handle });
        }

        let path = self.library.resolve(name)?;

        let mut state = self.engine.lock();
        let previous = state.active().cloned();

        if let Some(previous) = previous.as_ref() {
            if let Err(source) = state.engine_mut().unload_bank(previous.handle) {
                drop(state);
                warn!(bank = %previous.name, error = %source, "soundfont unload failed");
                return Err(BankError::Degraded {
                    active: previous.name.clone(),
                    requested: name.to_string(),
                    source,
                });
            }
        }

        match state.engine_mut().load_bank(&path) {
            Ok(handle) => {
                state.set_active(ActiveBank {
                    name: name.to_string(),
                    handle,
                    path,
                });
                drop(state);
                info!(bank = %name, %handle, "soundfont loaded");
                Ok(SwitchOutcome::Switched {
                    handle,
                    previous: previous.map(|bank| bank.handle),
                })
            }
            Err(source) => {
                state.clear_active();
                drop(state);
                warn!(bank = %name, error = %source, "soundfont load failed, no bank active");
                Err(BankError::Load {
                    bank: name.to_string(),
                    source,
                })
            }
        }
    }
}
