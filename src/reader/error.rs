use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

#[doc = r#"
An error that aborts parsing or playback of a MIDI file
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: u32,
    track: Option<usize>,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce.
///
/// The discriminants are stable error codes, starting at 1 so that `0` can
/// stand for "no error" on targets that report codes as plain integers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ReaderErrorKind {
    /// The header chunk is not `MThd` or its length is not 6.
    #[error("Invalid file header")]
    BadFileHeader = 1,
    /// A track chunk is not `MTrk`.
    #[error("Invalid track header")]
    BadTrackHeader = 2,
    /// A meta or system exclusive event declared a length its type does not allow.
    #[error("Invalid meta event length")]
    BadMetaEvent = 3,
    /// The file ends right after its header.
    #[error("File has no track data")]
    BadFileStruct = 4,
    /// Format 2 files are not supported.
    #[error("Multiple song (format 2) files are not supported")]
    NoMultipleSongSupport = 5,
    /// SMPTE time division is not supported.
    #[error("SMPTE time division is not supported")]
    NoSmpteSupport = 6,
}

impl ReaderErrorKind {
    /// The numeric error code.
    pub fn code(self) -> u8 {
        self.into()
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: u32, kind: ReaderErrorKind) -> Self {
        Self {
            position,
            track: None,
            kind,
        }
    }

    /// Attach the index of the track being read.
    pub const fn in_track(mut self, track: usize) -> Self {
        self.track = Some(track);
        self
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Returns the track the error occurred in, if it happened past the file header.
    pub fn track(&self) -> Option<usize> {
        self.track
    }

    /// The numeric error code of [`Self::error_kind`].
    pub fn code(&self) -> u8 {
        self.kind.code()
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

#[test]
fn error_codes_are_stable() {
    use pretty_assertions::assert_eq;
    assert_eq!(ReaderErrorKind::BadFileHeader.code(), 1);
    assert_eq!(ReaderErrorKind::NoSmpteSupport.code(), 6);
    assert_eq!(
        ReaderErrorKind::try_from(3u8).unwrap(),
        ReaderErrorKind::BadMetaEvent
    );
    assert!(ReaderErrorKind::try_from(0u8).is_err());
}
