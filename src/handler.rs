#![doc = r#"
Receiving decoded events.

Implement [`EventHandler`] and override the methods for the events you care
about. Every method has an empty default, so an event without an override is
decoded, its bytes are skipped, and nothing else happens.

Meta events with free-form content (text, sequencer-specific data) and system
exclusive messages are not copied anywhere: the handler gets a [`Payload`]
that reads straight from the source, bounded to the event's length.
"#]

use crate::{
    MidiSource, ReaderError,
    file::{KeySignature, MetaKind, SmpteOffset, TimeSignature},
    message::Channel,
};

/// Callbacks invoked by the sequencer as events become due.
#[allow(unused_variables)]
pub trait EventHandler {
    /// Note on. `velocity` is never 0: those arrive as [`EventHandler::note_off`].
    fn note_on(&mut self, channel: Channel, key: u8, velocity: u8) {}
    /// Note off.
    fn note_off(&mut self, channel: Channel, key: u8, velocity: u8) {}
    /// Polyphonic key pressure (aftertouch).
    fn key_pressure(&mut self, channel: Channel, key: u8, pressure: u8) {}
    /// Control change.
    fn control_change(&mut self, channel: Channel, controller: u8, value: u8) {}
    /// Program (patch) change.
    fn program_change(&mut self, channel: Channel, program: u8) {}
    /// Channel pressure (aftertouch).
    fn channel_pressure(&mut self, channel: Channel, pressure: u8) {}
    /// Pitch bend, as the 14-bit value `0..=0x3FFF`, centered on `0x2000`.
    fn pitch_bend(&mut self, channel: Channel, bend: u16) {}

    /// Text-like meta events, sequencer-specific data and system exclusive messages.
    ///
    /// Read as much of `payload` as needed; the rest is skipped.
    fn meta(&mut self, kind: MetaKind, payload: &mut Payload<'_>) {}
    /// MIDI channel prefix meta event.
    fn channel_prefix(&mut self, channel: u8) {}
    /// MIDI port prefix meta event.
    fn port_prefix(&mut self, port: u8) {}
    /// Time signature meta event.
    fn time_signature(&mut self, signature: TimeSignature) {}
    /// Key signature meta event.
    fn key_signature(&mut self, signature: KeySignature) {}
    /// Sequence number meta event.
    fn sequence_number(&mut self, number: u16) {}
    /// SMPTE offset meta event. Does not affect playback timing.
    fn smpte_offset(&mut self, offset: &SmpteOffset) {}
    /// A set-tempo event changed the active tempo, in microseconds per quarter note.
    fn tempo_changed(&mut self, tempo: u32) {}
    /// The track at `track` hit its end-of-track event.
    fn end_of_track(&mut self, track: usize) {}

    /// Playback was aborted. Called once, right before `play` returns the same error.
    fn on_error(&mut self, error: &ReaderError) {}
}

impl EventHandler for () {}

impl<H: EventHandler + ?Sized> EventHandler for &mut H {
    fn note_on(&mut self, channel: Channel, key: u8, velocity: u8) {
        (**self).note_on(channel, key, velocity)
    }
    fn note_off(&mut self, channel: Channel, key: u8, velocity: u8) {
        (**self).note_off(channel, key, velocity)
    }
    fn key_pressure(&mut self, channel: Channel, key: u8, pressure: u8) {
        (**self).key_pressure(channel, key, pressure)
    }
    fn control_change(&mut self, channel: Channel, controller: u8, value: u8) {
        (**self).control_change(channel, controller, value)
    }
    fn program_change(&mut self, channel: Channel, program: u8) {
        (**self).program_change(channel, program)
    }
    fn channel_pressure(&mut self, channel: Channel, pressure: u8) {
        (**self).channel_pressure(channel, pressure)
    }
    fn pitch_bend(&mut self, channel: Channel, bend: u16) {
        (**self).pitch_bend(channel, bend)
    }
    fn meta(&mut self, kind: MetaKind, payload: &mut Payload<'_>) {
        (**self).meta(kind, payload)
    }
    fn channel_prefix(&mut self, channel: u8) {
        (**self).channel_prefix(channel)
    }
    fn port_prefix(&mut self, port: u8) {
        (**self).port_prefix(port)
    }
    fn time_signature(&mut self, signature: TimeSignature) {
        (**self).time_signature(signature)
    }
    fn key_signature(&mut self, signature: KeySignature) {
        (**self).key_signature(signature)
    }
    fn sequence_number(&mut self, number: u16) {
        (**self).sequence_number(number)
    }
    fn smpte_offset(&mut self, offset: &SmpteOffset) {
        (**self).smpte_offset(offset)
    }
    fn tempo_changed(&mut self, tempo: u32) {
        (**self).tempo_changed(tempo)
    }
    fn end_of_track(&mut self, track: usize) {
        (**self).end_of_track(track)
    }
    fn on_error(&mut self, error: &ReaderError) {
        (**self).on_error(error)
    }
}

/// The body of a variable-length event, read directly from the source.
///
/// [`Payload::len`] counts the bytes the track chunk actually holds. It is
/// smaller than [`Payload::declared_len`] when the event is cut off by the end
/// of its chunk.
pub struct Payload<'a> {
    source: &'a mut dyn MidiSource,
    len: u32,
    declared: u32,
    remaining: u32,
}

impl<'a> Payload<'a> {
    pub(crate) fn new(source: &'a mut dyn MidiSource, len: u32, declared: u32) -> Self {
        Self {
            source,
            len,
            declared,
            remaining: len,
        }
    }

    /// Length of the payload available to the handler, capped at the end of the track chunk.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Length the event declares for itself.
    pub fn declared_len(&self) -> u32 {
        self.declared
    }

    /// True if the track chunk ends before the declared length.
    pub fn is_truncated(&self) -> bool {
        self.len < self.declared
    }

    /// True for a payload without bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes not read yet.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Read the next byte of the payload.
    pub fn read_byte(&mut self) -> Option<u8> {
        if self.remaining == 0 || self.source.at_end() {
            return None;
        }
        self.remaining -= 1;
        Some(self.source.read_byte())
    }

    /// Fill as much of `buf` as the payload allows. Returns the number of bytes read.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.read_byte() {
                Some(byte) => *slot = byte,
                None => break,
            }
            count += 1;
        }
        count
    }
}

impl Iterator for Payload<'_> {
    type Item = u8;
    fn next(&mut self) -> Option<u8> {
        self.read_byte()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

#[test]
fn payload_is_bounded() {
    use pretty_assertions::assert_eq;
    let bytes = *b"hello world";
    let mut source = crate::SliceSource::new(&bytes);
    let mut payload = Payload::new(&mut source, 5, 5);
    assert!(!payload.is_truncated());
    let mut buf = [0; 8];
    assert_eq!(payload.read(&mut buf), 5);
    assert_eq!(&buf[..5], b"hello");
    assert_eq!(payload.read_byte(), None);
    assert_eq!(payload.remaining(), 0);
}
