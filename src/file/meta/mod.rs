#![doc = r#"
Meta events and system messages found inside a track

# Meta events

A meta event is `FF <type> <length> <data>`, with the length encoded as a
variable-length quantity. Each known type has a fixed length, or at least a
non-empty one; a mismatch aborts playback with
[`ReaderErrorKind::BadMetaEvent`].

| type        | event               | length   |
|-------------|---------------------|----------|
| `00`        | sequence number     | 2        |
| `01`-`07`   | text, copyright...  | non-zero |
| `20`        | channel prefix      | 1        |
| `21`        | port prefix         | 1        |
| `2F`        | end of track        | 0        |
| `51`        | set tempo           | 3        |
| `54`        | SMPTE offset        | 5        |
| `58`        | time signature      | 4        |
| `59`        | key signature       | 2        |
| `7F`        | sequencer specific  | non-zero |

Other types are skipped.

# System messages

`F0`/`F7` carry system exclusive data of a variable-length size, which must
not be empty. The real-time messages `FA` (start) and `FB` (continue) resume
playback, `FC` (stop) pauses it, `F8` (clock) is ignored.
"#]

mod smpte_offset;
pub use smpte_offset::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    MidiSource, ReaderErrorKind, Transport, handler::EventHandler, message::Decoded,
    reader::TrackReader,
};

const SEQUENCE_NUMBER: u8 = 0x00;
const CHANNEL_PREFIX: u8 = 0x20;
const PORT_PREFIX: u8 = 0x21;
const END_OF_TRACK: u8 = 0x2F;
const SET_TEMPO: u8 = 0x51;
const SMPTE_OFFSET: u8 = 0x54;
const TIME_SIGNATURE: u8 = 0x58;
const KEY_SIGNATURE: u8 = 0x59;

/// Events whose payload is handed to [`EventHandler::meta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// Any text
    Text = 0x01,
    /// Copyright notice
    Copyright = 0x02,
    /// Sequence or track name
    TrackName = 0x03,
    /// Instrument name
    InstrumentName = 0x04,
    /// Lyric
    Lyric = 0x05,
    /// Marker
    Marker = 0x06,
    /// Cue point
    CuePoint = 0x07,
    /// Sequencer-specific data
    SequencerSpecific = 0x7F,
    /// System exclusive message (`F0`)
    SystemExclusive = 0xF0,
    /// System exclusive continuation or escape (`F7`)
    SysexEscape = 0xF7,
}

impl MetaKind {
    /// True for the two system exclusive kinds.
    pub const fn is_sysex(&self) -> bool {
        matches!(self, Self::SystemExclusive | Self::SysexEscape)
    }

    /// True for the text-like meta events `01`-`07`.
    pub const fn is_text(&self) -> bool {
        (*self as u8) < 0x08
    }
}

/// Time signature meta event, as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar.
    pub numerator: u8,
    /// Beat unit as a power of two: 2 means a quarter note.
    pub denominator_power: u8,
    /// MIDI clocks per metronome click.
    pub clocks_per_click: u8,
    /// Notated 32nd notes per MIDI quarter note (24 clocks).
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// Build from the 4 data bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            numerator: bytes[0],
            denominator_power: bytes[1],
            clocks_per_click: bytes[2],
            thirty_seconds_per_quarter: bytes[3],
        }
    }

    /// The beat unit, e.g. 4 for x/4. `None` if it does not fit a u16.
    pub const fn denominator(&self) -> Option<u16> {
        if self.denominator_power < 16 {
            Some(1 << self.denominator_power)
        } else {
            None
        }
    }
}

/// Key signature meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Number of sharps if positive, of flats if negative.
    pub accidentals: i8,
    /// Minor key if true, major otherwise.
    pub minor: bool,
}

impl KeySignature {
    /// Build from the 2 data bytes.
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self {
            accidentals: bytes[0] as i8,
            minor: bytes[1] == 1,
        }
    }
}

/// Decode a system message whose status byte (`F0`-`FF`) was just read.
pub(crate) fn decode_system<S: MidiSource, H: EventHandler>(
    status: u8,
    reader: &mut TrackReader<'_, S>,
    handler: &mut H,
    transport: &Transport,
) -> Result<Decoded, ReaderErrorKind> {
    match status {
        0xFF => decode_meta(reader, handler, transport),
        0xF0 | 0xF7 => {
            let len = take!(reader.read_varlen());
            debug!("sysex {:#04X}, {} bytes", status, len);
            if len == 0 {
                return Err(ReaderErrorKind::BadMetaEvent);
            }
            let kind = if status == 0xF0 {
                MetaKind::SystemExclusive
            } else {
                MetaKind::SysexEscape
            };
            reader.with_payload(len, |payload| handler.meta(kind, payload));
            Ok(completed(reader))
        }
        // start, continue
        0xFA | 0xFB => {
            transport.resume();
            Ok(Decoded::Event)
        }
        // stop
        0xFC => {
            transport.pause();
            Ok(Decoded::Event)
        }
        _ => Ok(Decoded::Event),
    }
}

fn decode_meta<S: MidiSource, H: EventHandler>(
    reader: &mut TrackReader<'_, S>,
    handler: &mut H,
    transport: &Transport,
) -> Result<Decoded, ReaderErrorKind> {
    let kind = take!(reader.read_byte());
    let len = take!(reader.read_varlen());
    debug!("meta {:#04X}, {} bytes", kind, len);

    let expect = |valid: bool| {
        if valid {
            Ok(())
        } else {
            Err(ReaderErrorKind::BadMetaEvent)
        }
    };

    match kind {
        SEQUENCE_NUMBER => {
            expect(len == 2)?;
            let bytes = take!(reader.read_exact_size::<2>());
            handler.sequence_number(u16::from_be_bytes(bytes));
        }
        CHANNEL_PREFIX => {
            expect(len == 1)?;
            handler.channel_prefix(take!(reader.read_byte()));
        }
        PORT_PREFIX => {
            expect(len == 1)?;
            handler.port_prefix(take!(reader.read_byte()));
        }
        END_OF_TRACK => {
            expect(len == 0)?;
            reader.track_mut().done = true;
            return Ok(Decoded::EndOfTrack);
        }
        SET_TEMPO => {
            expect(len == 3)?;
            let [a, b, c] = take!(reader.read_exact_size::<3>());
            let tempo = u32::from_be_bytes([0, a, b, c]);
            debug!("tempo {}", tempo);
            transport.set_tempo(tempo);
            handler.tempo_changed(tempo);
        }
        SMPTE_OFFSET => {
            expect(len == 5)?;
            let bytes = take!(reader.read_exact_size::<5>());
            match SmpteOffset::parse(&bytes) {
                Ok(offset) => handler.smpte_offset(&offset),
                Err(_e) => warn!("ignoring SMPTE offset: {}", _e),
            }
        }
        TIME_SIGNATURE => {
            expect(len == 4)?;
            handler.time_signature(TimeSignature::from_bytes(take!(reader.read_exact_size::<4>())));
        }
        KEY_SIGNATURE => {
            expect(len == 2)?;
            handler.key_signature(KeySignature::from_bytes(take!(reader.read_exact_size::<2>())));
        }
        other => match MetaKind::try_from(other) {
            Ok(kind) if !kind.is_sysex() => {
                expect(len != 0)?;
                reader.with_payload(len, |payload| handler.meta(kind, payload));
                return Ok(completed(reader));
            }
            _ => {
                debug!("skipping unknown meta {:#04X}", other);
                if !reader.skip(len) {
                    return Ok(Decoded::Truncated);
                }
            }
        },
    }
    Ok(Decoded::Event)
}

fn completed<S: MidiSource>(reader: &TrackReader<'_, S>) -> Decoded {
    if reader.track().is_exhausted() {
        Decoded::Truncated
    } else {
        Decoded::Event
    }
}

#[test]
fn meta_kinds() {
    use pretty_assertions::assert_eq;
    assert_eq!(MetaKind::try_from(0x03u8).unwrap(), MetaKind::TrackName);
    assert!(MetaKind::try_from(0x08u8).is_err());
    assert!(MetaKind::Lyric.is_text());
    assert!(!MetaKind::SequencerSpecific.is_text());
    assert!(MetaKind::SysexEscape.is_sysex());
    assert_eq!(u8::from(MetaKind::SystemExclusive), 0xF0);
}

#[test]
fn signatures_from_bytes() {
    use pretty_assertions::assert_eq;
    let time = TimeSignature::from_bytes([6, 3, 36, 8]);
    assert_eq!(time.numerator, 6);
    assert_eq!(time.denominator(), Some(8));
    let key = KeySignature::from_bytes([0xFD, 1]);
    assert_eq!(key.accidentals, -3);
    assert!(key.minor);
}
