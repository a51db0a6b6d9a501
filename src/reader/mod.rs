#![doc = r#"
Bounded reading of one track's bytes.

A [`TrackReader`] ties a [`MidiSource`] to one [`TrackState`]: every byte it
reads advances the track's cursor and decrements its remaining length, and it
refuses to read past the end of the track chunk. When it has to refuse, it
returns `None` and the track is flagged as exhausted; if the refusal came from
the source itself running out, the reader also reports
[`TrackReader::hit_end_of_stream`].
"#]

mod error;
pub use error::*;

mod varint;

use crate::{MidiSource, file::TrackState, handler::Payload};

/// Reads the bytes of a single track chunk, starting at the track's cursor.
pub struct TrackReader<'a, S> {
    source: &'a mut S,
    track: &'a mut TrackState,
    end_of_stream: bool,
}

impl<'a, S: MidiSource> TrackReader<'a, S> {
    /// Seek the source to the track's cursor and start reading there.
    pub fn new(source: &'a mut S, track: &'a mut TrackState) -> Self {
        source.seek(track.pointer);
        Self {
            source,
            track,
            end_of_stream: false,
        }
    }

    /// Absolute offset of the next byte.
    pub fn position(&self) -> u32 {
        self.track.pointer
    }

    /// Bytes left in the track chunk.
    pub fn remaining(&self) -> u32 {
        self.track.remaining
    }

    /// The track being read.
    pub fn track(&self) -> &TrackState {
        self.track
    }

    pub(crate) fn track_mut(&mut self) -> &mut TrackState {
        self.track
    }

    /// True if a read was refused because the source had no more bytes.
    pub fn hit_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /// Read one byte of the track.
    ///
    /// Returns `None`, without touching the source, once the chunk is used up
    /// or the source is at its end.
    pub fn read_byte(&mut self) -> Option<u8> {
        if self.track.remaining == 0 {
            self.track.exhausted = true;
            return None;
        }
        if self.source.at_end() {
            self.track.exhausted = true;
            self.end_of_stream = true;
            return None;
        }
        self.track.remaining -= 1;
        self.track.pointer += 1;
        Some(self.source.read_byte())
    }

    /// Read `L` bytes of the track, or none at all if fewer are available.
    pub fn read_exact_size<const L: usize>(&mut self) -> Option<[u8; L]> {
        let mut bytes = [0; L];
        for byte in bytes.iter_mut() {
            *byte = self.read_byte()?;
        }
        Some(bytes)
    }

    /// Skip `len` bytes, or the rest of the chunk if it is shorter.
    ///
    /// Returns false if the chunk did not hold `len` more bytes.
    pub fn skip(&mut self, len: u32) -> bool {
        let step = len.min(self.track.remaining);
        self.track.pointer += step;
        self.track.remaining -= step;
        self.source.seek(self.track.pointer);
        if step < len {
            self.track.exhausted = true;
            if self.source.at_end() {
                self.end_of_stream = true;
            }
            return false;
        }
        true
    }

    /// Lend the next `len` bytes out as a [`Payload`], then move past all of them.
    ///
    /// The payload is capped at the end of the chunk; it still reports `len`
    /// as its [`Payload::declared_len`]. The cursor ends up `len` bytes
    /// further, or at the end of the chunk, regardless of how much `f` read.
    pub fn with_payload<T>(&mut self, len: u32, f: impl FnOnce(&mut Payload<'_>) -> T) -> T {
        let bounded = len.min(self.track.remaining);
        let out = {
            let mut payload = Payload::new(&mut *self.source, bounded, len);
            f(&mut payload)
        };
        self.skip(len);
        out
    }
}

#[test]
fn payload_cut_short_by_its_chunk_keeps_the_declared_length() {
    use crate::SliceSource;
    use pretty_assertions::assert_eq;

    let bytes = *b"abcdef";
    let mut source = SliceSource::new(&bytes);
    let mut track = TrackState::new(0, 3);
    let mut reader = TrackReader::new(&mut source, &mut track);

    let (len, declared, truncated, first) = reader.with_payload(10, |payload| {
        (
            payload.len(),
            payload.declared_len(),
            payload.is_truncated(),
            payload.read_byte(),
        )
    });
    assert_eq!((len, declared, truncated, first), (3, 10, true, Some(b'a')));
    assert_eq!(reader.remaining(), 0);
    assert!(reader.track().is_exhausted());
    assert!(!reader.hit_end_of_stream());
}
