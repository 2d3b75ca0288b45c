use fontsynth_ports::synth::SynthError;

/// Failures of the bank lifecycle. All of them are user-visible and
/// non-fatal; none reaches the render thread.
#[derive(thiserror::Error, Debug)]
pub enum BankError {
    #[error("could not find the soundfont: {0}")]
    NotFound(String),
    #[error("no embedded data for soundfont: {0}")]
    PayloadMissing(String),
    #[error("scratch storage unavailable for {bank}: {reason}")]
    StorageUnavailable { bank: String, reason: String },
    #[error("soundfont {bank} failed to write into scratch storage: {reason}")]
    WriteFailed { bank: String, reason: String },
    #[error("failed to load the soundfont {bank}: {source}")]
    Load {
        bank: String,
        #[source]
        source: SynthError,
    },
    /// Unload of the current bank failed mid-switch. The marker still names
    /// the old bank but the engine may have dropped part of it.
    #[error("failed to unload {active} while switching to {requested}, engine state is degraded: {source}")]
    Degraded {
        active: String,
        requested: String,
        #[source]
        source: SynthError,
    },
}

impl BankError {
    /// Dialog title shown alongside the message.
    pub fn title(&self) -> &'static str {
        match self {
            BankError::NotFound(_) => "SoundFont Error",
            BankError::PayloadMissing(_) => "Plugin Error",
            BankError::StorageUnavailable { .. } | BankError::WriteFailed { .. } => {
                "File system error"
            }
            BankError::Load { .. } => "SoundFont Load Error",
            BankError::Degraded { .. } => "SoundFont Unload Error",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}
