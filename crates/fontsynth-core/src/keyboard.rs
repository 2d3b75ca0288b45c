use fontsynth_ports::midi::{MidiMessage, CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF};
use fontsynth_ports::types::{Channel, MIDI_CHANNELS, MIDI_NOTES};
use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const WORDS_PER_CHANNEL: usize = MIDI_NOTES / 64;

/// Which keys are down, for UI highlighting. Written by the render thread
/// and the note input path, read by the UI; all lock-free.
#[derive(Debug)]
pub struct KeyboardState {
    notes: [[AtomicU64; WORDS_PER_CHANNEL]; MIDI_CHANNELS],
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardState {
    pub fn new() -> Self {
        Self {
            notes: std::array::from_fn(|_| std::array::from_fn(|_| AtomicU64::new(0))),
        }
    }

    fn slot(&self, channel: Channel, note: u8) -> Option<(&AtomicU64, u64)> {
        let note = note as usize;
        if note >= MIDI_NOTES {
            return None;
        }
        let words = self.notes.get(channel as usize)?;
        Some((&words[note / 64], 1u64 << (note % 64)))
    }

    pub fn note_on(&self, channel: Channel, note: u8) {
        if let Some((word, mask)) = self.slot(channel, note) {
            word.fetch_or(mask, Ordering::Relaxed);
        }
    }

    pub fn note_off(&self, channel: Channel, note: u8) {
        if let Some((word, mask)) = self.slot(channel, note) {
            word.fetch_and(!mask, Ordering::Relaxed);
        }
    }

    pub fn is_note_on(&self, channel: Channel, note: u8) -> bool {
        self.slot(channel, note)
            .map(|(word, mask)| word.load(Ordering::Relaxed) & mask != 0)
            .unwrap_or(false)
    }

    pub fn notes_on(&self, channel: Channel) -> Vec<u8> {
        (0..MIDI_NOTES as u8)
            .filter(|&note| self.is_note_on(channel, note))
            .collect()
    }

    pub fn clear_channel(&self, channel: Channel) {
        if let Some(words) = self.notes.get(channel as usize) {
            for word in words {
                word.store(0, Ordering::Relaxed);
            }
        }
    }

    pub fn reset(&self) {
        for channel in 0..MIDI_CHANNELS {
            self.clear_channel(channel as Channel);
        }
    }

    pub fn apply(&self, message: &MidiMessage) {
        match *message {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => {
                if velocity == 0 {
                    self.note_off(channel, note);
                } else {
                    self.note_on(channel, note);
                }
            }
            MidiMessage::NoteOff { channel, note, .. } => self.note_off(channel, note),
            MidiMessage::ControlChange {
                channel,
                controller: CC_ALL_NOTES_OFF | CC_ALL_SOUND_OFF,
                ..
            } => self.clear_channel(channel),
            _ => {}
        }
    }
}

/// Sending half of the side-channel MIDI queue (virtual keyboard, MIDI
/// input threads). Cloneable; senders serialize on a small lock that the
/// render thread never touches.
#[derive(Clone)]
pub struct MidiInputSender {
    producer: Arc<Mutex<Producer<MidiMessage>>>,
}

impl MidiInputSender {
    /// Returns `false` when the queue is full and the message was dropped.
    pub fn send(&self, message: MidiMessage) -> bool {
        self.producer.lock().push(message).is_ok()
    }

    pub fn send_bytes(&self, bytes: &[u8]) -> bool {
        match MidiMessage::from_bytes(bytes) {
            Some(message) => self.send(message),
            None => false,
        }
    }
}

/// Receiving half, owned by the render pipeline.
pub struct MidiInputReceiver {
    consumer: Consumer<MidiMessage>,
}

impl MidiInputReceiver {
    /// Apply everything queued so far to the display state.
    pub fn drain_into(&mut self, keyboard: &KeyboardState) -> usize {
        let mut drained = 0;
        while let Ok(message) = self.consumer.pop() {
            keyboard.apply(&message);
            drained += 1;
        }
        drained
    }

    pub fn clear(&mut self) {
        while self.consumer.pop().is_ok() {}
    }
}

pub fn midi_collector(capacity: usize) -> (MidiInputSender, MidiInputReceiver) {
    let (producer, consumer) = RingBuffer::new(capacity.max(1));
    (
        MidiInputSender {
            producer: Arc::new(Mutex::new(producer)),
        },
        MidiInputReceiver { consumer },
    )
}
