use crate::types::Channel;
use midly::live::LiveEvent;
use serde::{Deserialize, Serialize};

pub const PITCH_BEND_CENTER: u16 = 8192;

/// Controllers that silence a whole channel.
pub const CC_ALL_SOUND_OFF: u8 = 120;
pub const CC_ALL_NOTES_OFF: u8 = 123;
pub const CC_SUSTAIN: u8 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidiMessage {
    NoteOn {
        channel: Channel,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        channel: Channel,
        note: u8,
        velocity: u8,
    },
    ControlChange {
        channel: Channel,
        controller: u8,
        value: u8,
    },
    /// 14-bit value, centre is `PITCH_BEND_CENTER`.
    PitchBend {
        channel: Channel,
        value: u16,
    },
    ChannelPressure {
        channel: Channel,
        value: u8,
    },
    /// Anything outside the instrument's vocabulary (program change, poly
    /// aftertouch, sysex, realtime...). Carried so callers can skip it.
    Other {
        status: u8,
    },
}

impl MidiMessage {
    /// Decode one raw MIDI message. A NoteOn with velocity 0 is a NoteOff.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let status = *bytes.first()?;
        let event = LiveEvent::parse(bytes).ok()?;
        let LiveEvent::Midi { channel, message } = event else {
            return Some(MidiMessage::Other { status });
        };
        let channel = channel.as_int();

        let decoded = match message {
            midly::MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => MidiMessage::NoteOff {
                channel,
                note: key.as_int(),
                velocity: 0,
            },
            midly::MidiMessage::NoteOn { key, vel } => MidiMessage::NoteOn {
                channel,
                note: key.as_int(),
                velocity: vel.as_int(),
            },
            midly::MidiMessage::NoteOff { key, vel } => MidiMessage::NoteOff {
                channel,
                note: key.as_int(),
                velocity: vel.as_int(),
            },
            midly::MidiMessage::Controller { controller, value } => MidiMessage::ControlChange {
                channel,
                controller: controller.as_int(),
                value: value.as_int(),
            },
            midly::MidiMessage::PitchBend { bend } => MidiMessage::PitchBend {
                channel,
                value: bend.0.as_int(),
            },
            midly::MidiMessage::ChannelAftertouch { vel } => MidiMessage::ChannelPressure {
                channel,
                value: vel.as_int(),
            },
            _ => MidiMessage::Other { status },
        };
        Some(decoded)
    }

    pub fn channel(&self) -> Option<Channel> {
        match *self {
            MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. }
            | MidiMessage::ControlChange { channel, .. }
            | MidiMessage::PitchBend { channel, .. }
            | MidiMessage::ChannelPressure { channel, .. } => Some(channel),
            MidiMessage::Other { .. } => None,
        }
    }
}

/// A message scheduled at a frame offset inside the current block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiEvent {
    pub frame: u32,
    pub message: MidiMessage,
}

impl MidiEvent {
    pub fn new(frame: u32, message: MidiMessage) -> Self {
        Self { frame, message }
    }

    pub fn at_start(message: MidiMessage) -> Self {
        Self::new(0, message)
    }
}
