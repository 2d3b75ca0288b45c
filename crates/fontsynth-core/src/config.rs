use crate::error::ConfigError;
use fontsynth_ports::synth::EngineSettings;
use fontsynth_ports::types::{Channel, Gain, MIDI_CHANNELS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44_100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagingPolicy {
    /// Stage a bank the first time it is selected.
    #[default]
    Lazy,
    /// Stage every registered bank at construction.
    Eager,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub max_polyphony: usize,
    pub master_gain: Gain,
    /// Engine channel every block event is translated onto.
    pub instrument_channel: Channel,
    pub staging: StagingPolicy,
    pub collector_capacity: usize,
    pub initial_bank: Option<String>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_polyphony: 255,
            master_gain: Gain::new(1.0),
            instrument_channel: 1,
            staging: StagingPolicy::Lazy,
            collector_capacity: 1024,
            initial_bank: None,
        }
    }
}

impl ProcessorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_polyphony == 0 {
            return Err(ConfigError::Invalid("max_polyphony must be at least 1".into()));
        }
        let gain = self.master_gain.get();
        if !gain.is_finite() || gain < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "master_gain must be finite and non-negative, got {gain}"
            )));
        }
        if self.instrument_channel as usize >= MIDI_CHANNELS {
            return Err(ConfigError::Invalid(format!(
                "instrument_channel must be below {MIDI_CHANNELS}, got {}",
                self.instrument_channel
            )));
        }
        if self.collector_capacity == 0 {
            return Err(ConfigError::Invalid(
                "collector_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn engine_settings(&self, sample_rate_hz: u32) -> EngineSettings {
        EngineSettings {
            sample_rate_hz,
            max_polyphony: self.max_polyphony,
            master_gain: self.master_gain,
        }
    }
}
