use fontsynth_ports::audio::AudioBlock;
use fontsynth_ports::midi::{MidiEvent, MidiMessage};

/// Inverse of the engine's velocity curve, `1 / (v/127)^2`. Velocity 0 maps
/// to unity.
pub fn gain_factor_to_cancel_velocity(velocity: u8) -> f32 {
    if velocity == 0 {
        return 1.0;
    }
    let normalized = velocity as f32 / 127.0;
    1.0 / (normalized * normalized)
}

/// Scale the whole block once per NoteOn in `events`; several NoteOns in one
/// block compound. This is buffer-wide rather than per voice and applies to
/// every input source, not only the on-screen keyboard it is meant for.
pub fn apply_velocity_compensation(block: &mut AudioBlock<'_, '_>, events: &[MidiEvent]) {
    for event in events {
        if let MidiMessage::NoteOn { velocity, .. } = event.message {
            block.apply_gain(gain_factor_to_cancel_velocity(velocity));
        }
    }
}
