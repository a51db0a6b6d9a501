use num_enum::FromPrimitive;

use crate::{MidiSource, ReadResult, ReaderError, ReaderErrorKind};

const MTHD: [u8; 4] = *b"MThd";
const HEADER_LENGTH: u32 = 6;

#[doc = r#"
How the tracks of a file relate to each other.

Format 0 holds a single multi-channel track, format 1 holds tracks meant to be
played simultaneously, and format 2 holds independent songs. Values outside
0-2 are kept as [`FormatType::Other`] and played like format 1.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleTrack = 0,
    /// Format 1
    MultiTrack = 1,
    /// Format 2 (unsupported)
    MultiSong = 2,
    /// Anything else
    #[num_enum(catch_all)]
    Other(u16),
}

#[doc = r#"
The validated `MThd` chunk of a MIDI file.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileHeader {
    length: u32,
    format: FormatType,
    declared_tracks: u16,
    tracks: u16,
    division: i16,
}

impl FileHeader {
    /// Read the header chunk at the current position of `source`.
    ///
    /// At most `max_tracks` tracks are kept; tracks declared beyond that are
    /// dropped silently.
    ///
    /// # Errors
    /// Checked in this order:
    /// - [`ReaderErrorKind::BadFileHeader`] if the magic is not `MThd`
    ///   or the declared length is not 6
    /// - [`ReaderErrorKind::NoMultipleSongSupport`] for format 2
    /// - [`ReaderErrorKind::NoSmpteSupport`] for a negative (SMPTE) time division
    /// - [`ReaderErrorKind::BadFileStruct`] if nothing follows the header
    pub fn read<S: MidiSource>(source: &mut S, max_tracks: usize) -> ReadResult<Self> {
        let magic: [u8; 4] = source.read_exact_size();
        let length = u32::from_be_bytes(source.read_exact_size());
        let format = FormatType::from_primitive(u16::from_be_bytes(source.read_exact_size()));
        let declared_tracks = u16::from_be_bytes(source.read_exact_size());
        let division = i16::from_be_bytes(source.read_exact_size());

        debug!(
            "header: length {}, format {:?}, {} tracks, division {}",
            length, format, declared_tracks, division
        );

        let tracks = (declared_tracks as usize).min(max_tracks) as u16;
        if tracks < declared_tracks {
            warn!(
                "file declares {} tracks, only {} will be played",
                declared_tracks, tracks
            );
        }

        let fail = |source: &mut S, kind: ReaderErrorKind| -> ReadResult<Self> {
            Err(ReaderError::new(source.tell(), kind))
        };

        if magic != MTHD || length != HEADER_LENGTH {
            return fail(source, ReaderErrorKind::BadFileHeader);
        }
        if format == FormatType::MultiSong {
            return fail(source, ReaderErrorKind::NoMultipleSongSupport);
        }
        if division < 0 {
            return fail(source, ReaderErrorKind::NoSmpteSupport);
        }
        if source.at_end() {
            return fail(source, ReaderErrorKind::BadFileStruct);
        }

        Ok(Self {
            length,
            format,
            declared_tracks,
            tracks,
            division,
        })
    }

    /// The declared length of the header chunk. Always 6.
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// The format of the file.
    pub const fn format(&self) -> FormatType {
        self.format
    }

    /// Number of tracks that will be read, after clamping.
    pub const fn track_count(&self) -> usize {
        self.tracks as usize
    }

    /// Number of tracks the file itself declares.
    pub const fn declared_track_count(&self) -> u16 {
        self.declared_tracks
    }

    /// Delta-time ticks per quarter note.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.division as u16
    }
}

#[cfg(test)]
fn header_bytes(magic: &[u8; 4], length: u32, format: u16, tracks: u16, division: u16) -> [u8; 15] {
    let mut bytes = [0; 15];
    bytes[..4].copy_from_slice(magic);
    bytes[4..8].copy_from_slice(&length.to_be_bytes());
    bytes[8..10].copy_from_slice(&format.to_be_bytes());
    bytes[10..12].copy_from_slice(&tracks.to_be_bytes());
    bytes[12..14].copy_from_slice(&division.to_be_bytes());
    // first byte of whatever follows the header
    bytes[14] = b'M';
    bytes
}

#[cfg(test)]
fn read(bytes: &[u8]) -> Result<FileHeader, ReaderErrorKind> {
    FileHeader::read(&mut crate::SliceSource::new(bytes), 12).map_err(|e| *e.error_kind())
}

#[test]
fn reads_a_valid_header() {
    use pretty_assertions::assert_eq;
    let header = read(&header_bytes(b"MThd", 6, 1, 3, 480)).unwrap();
    assert_eq!(header.length(), 6);
    assert_eq!(header.format(), FormatType::MultiTrack);
    assert_eq!(header.track_count(), 3);
    assert_eq!(header.ticks_per_quarter_note(), 480);
}

#[test]
fn rejects_bad_magic_and_length() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        read(&header_bytes(b"MThD", 6, 0, 1, 96)),
        Err(ReaderErrorKind::BadFileHeader)
    );
    assert_eq!(
        read(&header_bytes(b"MThd", 7, 0, 1, 96)),
        Err(ReaderErrorKind::BadFileHeader)
    );
}

#[test]
fn rejects_multi_song_and_smpte() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        read(&header_bytes(b"MThd", 6, 2, 1, 96)),
        Err(ReaderErrorKind::NoMultipleSongSupport)
    );
    // -25 fps, 40 ticks per frame
    assert_eq!(
        read(&header_bytes(b"MThd", 6, 1, 1, 0xE728)),
        Err(ReaderErrorKind::NoSmpteSupport)
    );
}

#[test]
fn magic_is_checked_before_format() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        read(&header_bytes(b"RIFF", 6, 2, 1, 0xE728)),
        Err(ReaderErrorKind::BadFileHeader)
    );
}

#[test]
fn header_without_tracks_is_a_bad_structure() {
    use pretty_assertions::assert_eq;
    let bytes = header_bytes(b"MThd", 6, 0, 1, 96);
    assert_eq!(read(&bytes[..14]), Err(ReaderErrorKind::BadFileStruct));
}

#[test]
fn unknown_formats_are_accepted() {
    use pretty_assertions::assert_eq;
    let header = read(&header_bytes(b"MThd", 6, 7, 1, 0)).unwrap();
    assert_eq!(header.format(), FormatType::Other(7));
    assert_eq!(header.ticks_per_quarter_note(), 0);
}

#[test]
fn track_count_is_clamped() {
    use pretty_assertions::assert_eq;
    let bytes = header_bytes(b"MThd", 6, 1, 40, 96);
    let header = FileHeader::read(&mut crate::SliceSource::new(&bytes), 4).unwrap();
    assert_eq!(header.track_count(), 4);
    assert_eq!(header.declared_track_count(), 40);
    for declared in [0u16, 1, 12, 13, 255, u16::MAX] {
        let bytes = header_bytes(b"MThd", 6, 1, declared, 96);
        let header = read(&bytes).unwrap();
        assert!(header.track_count() <= 12);
        assert_eq!(header.track_count(), (declared as usize).min(12));
    }
}
