use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Zero-based MIDI channel as the engine sees it (0..=15).
pub type Channel = u8;

pub const MIDI_CHANNELS: usize = 16;
pub const MIDI_NOTES: usize = 128;

/// Opaque id handed out by an engine for a loaded bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gain(pub f32);

impl Gain {
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.max(0.0))
        } else {
            Self(1.0)
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self(1.0)
    }
}

impl fmt::Display for BankHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type Shared<T> = Arc<T>;
