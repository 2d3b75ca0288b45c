use fontsynth_ports::midi::{MidiEvent, MidiMessage};
use fontsynth_ports::synth::SynthEngine;
use fontsynth_ports::types::Channel;

/// Drive the engine with one message on the instrument channel.
/// Messages outside the instrument's vocabulary are skipped.
pub fn translate(engine: &mut dyn SynthEngine, channel: Channel, message: &MidiMessage) {
    match *message {
        MidiMessage::NoteOn { note, velocity, .. } => engine.note_on(channel, note, velocity),
        MidiMessage::NoteOff { note, .. } => engine.note_off(channel, note),
        MidiMessage::ControlChange {
            controller, value, ..
        } => engine.control_change(channel, controller, value),
        MidiMessage::PitchBend { value, .. } => engine.pitch_bend(channel, value),
        MidiMessage::ChannelPressure { value, .. } => engine.channel_pressure(channel, value),
        MidiMessage::Other { .. } => {}
    }
}

/// Events are forwarded in list order, one engine call each.
pub fn translate_block(engine: &mut dyn SynthEngine, channel: Channel, events: &[MidiEvent]) {
    for event in events {
        translate(engine, channel, &event.message);
    }
}

/// On-screen keyboards report velocity as 0..1; truncate onto 0..127.
pub fn velocity_from_unit(velocity: f32) -> u8 {
    if !velocity.is_finite() {
        return 0;
    }
    (velocity.clamp(0.0, 1.0) * 127.0) as u8
}
