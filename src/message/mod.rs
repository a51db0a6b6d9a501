#![doc = r#"
Decoding the events of a track

# Status bytes

Every event starts with a status byte, whose high bit is set. For channel
messages the high nibble is the message type and the low nibble the
[`Channel`]:

| status      | message            | data bytes |
|-------------|--------------------|------------|
| `8n`        | note off           | key, velocity |
| `9n`        | note on            | key, velocity |
| `An`        | key pressure       | key, pressure |
| `Bn`        | control change     | controller, value |
| `Cn`        | program change     | program |
| `Dn`        | channel pressure   | pressure |
| `En`        | pitch bend         | lsb, msb |
| `F0`-`FF`   | system / meta      | see [`crate::file::meta`] |

# Running status

A channel message may leave out its status byte when it repeats the previous
one. Such an event starts directly with a data byte (high bit clear), and the
status is taken from the last channel message of the same track. A track that
starts with a data byte plays it as a note on channel 1.
Meta and system exclusive events cancel running status; real-time messages
leave it alone.
"#]

mod channel;
pub use channel::*;

use crate::{
    MidiSource, ReaderErrorKind, Transport, file::meta::decode_system, handler::EventHandler,
    reader::TrackReader,
};

/// Status assumed for a data byte on a track without running status.
pub const DEFAULT_RUNNING_STATUS: u8 = 0x90;

/// What decoding one event did to its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// An event was decoded; the track continues.
    Event,
    /// The track's end-of-track event was reached.
    EndOfTrack,
    /// The track's data ran out in the middle of an event.
    Truncated,
}

/// Decode the event at the reader's position and dispatch it to `handler`.
///
/// The delta-time in front of the event must already have been read.
///
/// # Errors
/// [`ReaderErrorKind::BadMetaEvent`] for meta or system exclusive events whose
/// length their type does not allow.
pub fn decode_event<S: MidiSource, H: EventHandler>(
    reader: &mut TrackReader<'_, S>,
    handler: &mut H,
    transport: &Transport,
) -> Result<Decoded, ReaderErrorKind> {
    let first = take!(reader.read_byte());

    if first & 0x80 == 0 {
        let status = reader
            .track()
            .running_status()
            .unwrap_or(DEFAULT_RUNNING_STATUS);
        return decode_voice(status, Some(first), reader, handler);
    }

    match first {
        0x80..=0xEF => {
            reader.track_mut().running_status = Some(first);
            decode_voice(first, None, reader, handler)
        }
        0xF0..=0xF7 | 0xFF => {
            reader.track_mut().running_status = None;
            decode_system(first, reader, handler, transport)
        }
        _ => decode_system(first, reader, handler, transport),
    }
}

fn decode_voice<S: MidiSource, H: EventHandler>(
    status: u8,
    first: Option<u8>,
    reader: &mut TrackReader<'_, S>,
    handler: &mut H,
) -> Result<Decoded, ReaderErrorKind> {
    let channel = Channel::from_status(status);
    let data = match first {
        Some(byte) => byte,
        None => take!(reader.read_byte()),
    };

    match status >> 4 {
        0x8 => {
            let velocity = take!(reader.read_byte());
            handler.note_off(channel, data, velocity);
        }
        0x9 => {
            let velocity = take!(reader.read_byte());
            if velocity == 0 {
                handler.note_off(channel, data, velocity);
            } else {
                handler.note_on(channel, data, velocity);
            }
        }
        0xA => {
            let pressure = take!(reader.read_byte());
            handler.key_pressure(channel, data, pressure);
        }
        0xB => {
            let value = take!(reader.read_byte());
            handler.control_change(channel, data, value);
        }
        0xC => handler.program_change(channel, data),
        0xD => handler.channel_pressure(channel, data),
        _ => {
            let msb = take!(reader.read_byte());
            let bend = (u16::from(msb & 0x7F) << 7) | u16::from(data & 0x7F);
            handler.pitch_bend(channel, bend);
        }
    }
    Ok(Decoded::Event)
}

#[cfg(test)]
fn decode_all(bytes: &[u8]) -> (std::vec::Vec<(u8, u8, u16)>, Option<u8>) {
    use crate::{SliceSource, file::TrackState};

    #[derive(Default)]
    struct Voices(std::vec::Vec<(u8, u8, u16)>);
    impl EventHandler for Voices {
        fn note_on(&mut self, channel: Channel, key: u8, velocity: u8) {
            self.0.push((0x90 | channel.index(), key, velocity.into()));
        }
        fn note_off(&mut self, channel: Channel, key: u8, velocity: u8) {
            self.0.push((0x80 | channel.index(), key, velocity.into()));
        }
        fn pitch_bend(&mut self, channel: Channel, bend: u16) {
            self.0.push((0xE0 | channel.index(), 0, bend));
        }
    }

    let mut source = SliceSource::new(bytes);
    let mut track = TrackState::new(0, bytes.len() as u32);
    let mut voices = Voices::default();
    let transport = Transport::new();
    loop {
        let mut reader = TrackReader::new(&mut source, &mut track);
        match decode_event(&mut reader, &mut voices, &transport) {
            Ok(Decoded::Event) => continue,
            _ => break,
        }
    }
    (voices.0, track.running_status())
}

#[test]
fn running_status_survives_voice_messages() {
    use pretty_assertions::assert_eq;
    let (events, status) = decode_all(&[0x93, 0x3C, 0x64, 0x3E, 0x00, 0x83, 0x3C, 0x40]);
    assert_eq!(
        events,
        std::vec![(0x93, 0x3C, 0x64), (0x83, 0x3E, 0x00), (0x83, 0x3C, 0x40)]
    );
    assert_eq!(status, Some(0x83));
}

#[test]
fn pitch_bend_joins_both_data_bytes() {
    use pretty_assertions::assert_eq;
    let (events, _) = decode_all(&[0xE5, 0x7F, 0x7F, 0x00, 0x40]);
    assert_eq!(events, std::vec![(0xE5, 0, 0x3FFF), (0xE5, 0, 0x2000)]);
}

#[test]
fn sysex_clears_running_status() {
    use pretty_assertions::assert_eq;
    let (events, status) = decode_all(&[0x91, 0x3C, 0x64, 0xF0, 0x01, 0xF7, 0x3C, 0x64]);
    assert_eq!(events, std::vec![(0x91, 0x3C, 0x64), (0x90, 0x3C, 0x64)]);
    assert_eq!(status, None);
}
