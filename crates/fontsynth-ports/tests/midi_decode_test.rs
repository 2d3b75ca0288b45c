use fontsynth_ports::midi::{MidiMessage, PITCH_BEND_CENTER};
use pretty_assertions::assert_eq;

#[test]
fn note_on_with_zero_velocity_decodes_as_note_off() {
    assert_eq!(
        MidiMessage::from_bytes(&[0x93, 60, 0]),
        Some(MidiMessage::NoteOff {
            channel: 3,
            note: 60,
            velocity: 0
        })
    );
    assert_eq!(
        MidiMessage::from_bytes(&[0x90, 60, 100]),
        Some(MidiMessage::NoteOn {
            channel: 0,
            note: 60,
            velocity: 100
        })
    );
}

#[test]
fn decodes_controller_bend_and_pressure() {
    assert_eq!(
        MidiMessage::from_bytes(&[0xB1, 64, 127]),
        Some(MidiMessage::ControlChange {
            channel: 1,
            controller: 64,
            value: 127
        })
    );
    // lsb first, msb second
    assert_eq!(
        MidiMessage::from_bytes(&[0xE0, 0x00, 0x40]),
        Some(MidiMessage::PitchBend {
            channel: 0,
            value: PITCH_BEND_CENTER
        })
    );
    assert_eq!(
        MidiMessage::from_bytes(&[0xE2, 0x7F, 0x7F]),
        Some(MidiMessage::PitchBend {
            channel: 2,
            value: 16383
        })
    );
    assert_eq!(
        MidiMessage::from_bytes(&[0xDF, 42]),
        Some(MidiMessage::ChannelPressure {
            channel: 15,
            value: 42
        })
    );
}

#[test]
fn messages_outside_the_vocabulary_are_other() {
    let program = MidiMessage::from_bytes(&[0xC0, 5]).expect("program change");
    assert_eq!(program, MidiMessage::Other { status: 0xC0 });
    assert_eq!(program.channel(), None);

    assert_eq!(MidiMessage::from_bytes(&[]), None);
    assert_eq!(MidiMessage::from_bytes(&[0x90, 60]), None);
}
