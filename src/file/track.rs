use crate::{MidiSource, ReadResult, ReaderError, ReaderErrorKind, UMicros};

const MTRK: [u8; 4] = *b"MTrk";

#[doc = r#"
Playback state of one track chunk.

Holds the absolute offset of the track's next unread byte, how many bytes of
the chunk are left, how long to wait before its next event, whether it has
finished and the status byte that running status falls back to.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackState {
    pub(crate) pointer: u32,
    pub(crate) remaining: u32,
    pub(crate) wait: UMicros,
    pub(crate) done: bool,
    pub(crate) exhausted: bool,
    pub(crate) running_status: Option<u8>,
}

impl TrackState {
    /// An unused track slot.
    pub const EMPTY: Self = Self::new(0, 0);

    /// A track whose data starts at `pointer` and is `length` bytes long.
    pub const fn new(pointer: u32, length: u32) -> Self {
        Self {
            pointer,
            remaining: length,
            wait: UMicros::ZERO,
            done: false,
            exhausted: false,
            running_status: None,
        }
    }

    /// Read a track chunk header at the current position of `source`.
    ///
    /// On success the source is positioned at the first byte of the track's
    /// data. Use [`TrackState::end`] to find the next chunk.
    ///
    /// # Errors
    /// [`ReaderErrorKind::BadTrackHeader`] if the chunk type is not `MTrk`.
    pub fn read<S: MidiSource>(source: &mut S) -> ReadResult<Self> {
        let magic: [u8; 4] = source.read_exact_size();
        let length = u32::from_be_bytes(source.read_exact_size());

        if magic != MTRK {
            return Err(ReaderError::new(
                source.tell(),
                ReaderErrorKind::BadTrackHeader,
            ));
        }

        let pointer = source.tell();
        debug!("track chunk at {}, {} bytes", pointer, length);
        Ok(Self::new(pointer, length))
    }

    /// Absolute offset of the track's next unread byte.
    pub const fn position(&self) -> u32 {
        self.pointer
    }

    /// Bytes of the chunk not read yet.
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Offset one past the last byte of the chunk.
    pub const fn end(&self) -> u32 {
        self.pointer.saturating_add(self.remaining)
    }

    /// Time left until the track's next event.
    pub const fn wait(&self) -> UMicros {
        self.wait
    }

    /// True once the track reached its end.
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// True if the track ran out of data before an end-of-track event.
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// True if the track's next event is due now.
    pub const fn is_due(&self) -> bool {
        !self.done && self.wait.is_zero()
    }

    /// The last channel status byte seen on this track.
    pub const fn running_status(&self) -> Option<u8> {
        self.running_status
    }
}

impl Default for TrackState {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[test]
fn reads_a_track_header() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'r', b'k', 0x00, 0x00, 0x00, 0x04, 0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut source = crate::SliceSource::new(&bytes);
    let track = TrackState::read(&mut source).unwrap();
    assert_eq!(track.position(), 8);
    assert_eq!(track.remaining(), 4);
    assert_eq!(track.end(), 12);
    assert!(!track.is_done());
    assert_eq!(track.running_status(), None);
}

#[test]
fn rejects_a_corrupted_track_magic() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'r', b'x', 0x00, 0x00, 0x00, 0x04, 0x00, 0xFF, 0x2F, 0x00,
    ];
    let err = TrackState::read(&mut crate::SliceSource::new(&bytes)).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::BadTrackHeader);
}
