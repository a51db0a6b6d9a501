#![doc = r#"
Byte sources the sequencer reads from.

The sequencer never buffers a file. It keeps one absolute cursor per track and
jumps between them, so a source only has to support reading a single byte,
seeking to an absolute offset, reporting its position and telling whether it
is exhausted.

Two sources are provided:
- [`SliceSource`], over a borrowed byte slice (no allocation, no `std`)
- [`IoSource`], over anything implementing `std::io::Read + Seek` (`std` feature)
"#]

/// A seekable, byte-oriented input for the sequencer.
///
/// Reading past the end is not an error at this level: implementations return
/// `0` and keep reporting [`MidiSource::at_end`]. The decoder checks
/// `at_end` before every read and stops there.
pub trait MidiSource {
    /// Read the next byte and advance the position by one.
    fn read_byte(&mut self) -> u8;
    /// Move to an absolute byte offset from the start of the file.
    fn seek(&mut self, position: u32);
    /// Current absolute byte offset.
    fn tell(&mut self) -> u32;
    /// True when no more bytes can be read.
    fn at_end(&mut self) -> bool;

    /// Read `L` consecutive bytes.
    fn read_exact_size<const L: usize>(&mut self) -> [u8; L]
    where
        Self: Sized,
    {
        let mut bytes = [0; L];
        for byte in bytes.iter_mut() {
            *byte = self.read_byte();
        }
        bytes
    }
}

impl<S: MidiSource + ?Sized> MidiSource for &mut S {
    fn read_byte(&mut self) -> u8 {
        (**self).read_byte()
    }
    fn seek(&mut self, position: u32) {
        (**self).seek(position)
    }
    fn tell(&mut self) -> u32 {
        (**self).tell()
    }
    fn at_end(&mut self) -> bool {
        (**self).at_end()
    }
}

/// A [`MidiSource`] over a borrowed slice of bytes.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    /// Wrap a slice, positioned at offset 0.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// The underlying bytes.
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl MidiSource for SliceSource<'_> {
    fn read_byte(&mut self) -> u8 {
        match self.bytes.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                byte
            }
            None => 0,
        }
    }

    fn seek(&mut self, position: u32) {
        self.position = (position as usize).min(self.bytes.len());
    }

    fn tell(&mut self) -> u32 {
        self.position as u32
    }

    fn at_end(&mut self) -> bool {
        self.position >= self.bytes.len()
    }
}

#[cfg(feature = "std")]
pub use io::IoSource;

#[cfg(feature = "std")]
mod io {
    use super::MidiSource;
    use std::io::{self, Read, Seek, SeekFrom};

    /// A [`MidiSource`] over a `Read + Seek` stream.
    ///
    /// Every byte is a separate `read` call on the stream, so wrap files in a
    /// [`std::io::BufReader`] rather than passing a bare `std::fs::File`:
    ///
    /// ```rust,no_run
    /// # use midix_seq::source::IoSource;
    /// # fn open() -> std::io::Result<()> {
    /// let file = std::fs::File::open("song.mid")?;
    /// let source = IoSource::new(std::io::BufReader::new(file))?;
    /// # let _ = source;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// I/O errors while reading end the stream: the failed read yields `0` and
    /// the source reports [`MidiSource::at_end`] from then on.
    #[derive(Debug)]
    pub struct IoSource<R> {
        inner: R,
        position: u64,
        len: u64,
    }

    impl<R: Read + Seek> IoSource<R> {
        /// Wrap a stream. Its length is measured once, up front.
        pub fn new(mut inner: R) -> io::Result<Self> {
            let len = inner.seek(SeekFrom::End(0))?;
            inner.seek(SeekFrom::Start(0))?;
            Ok(Self {
                inner,
                position: 0,
                len,
            })
        }

        /// Length of the stream in bytes.
        pub fn len(&self) -> u64 {
            self.len
        }

        /// True if the stream holds no bytes at all.
        pub fn is_empty(&self) -> bool {
            self.len == 0
        }

        /// Give the stream back.
        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    impl<R: Read + Seek> MidiSource for IoSource<R> {
        fn read_byte(&mut self) -> u8 {
            if self.position >= self.len {
                return 0;
            }
            let mut byte = [0];
            match self.inner.read_exact(&mut byte) {
                Ok(()) => {
                    self.position += 1;
                    byte[0]
                }
                Err(_e) => {
                    warn!("read failed at {}: {}", self.position, _e);
                    self.position = self.len;
                    0
                }
            }
        }

        fn seek(&mut self, position: u32) {
            let target = u64::from(position).min(self.len);
            match self.inner.seek(SeekFrom::Start(target)) {
                Ok(at) => self.position = at,
                Err(_e) => {
                    warn!("seek to {} failed: {}", target, _e);
                    self.position = self.len;
                }
            }
        }

        fn tell(&mut self) -> u32 {
            self.position as u32
        }

        fn at_end(&mut self) -> bool {
            self.position >= self.len
        }
    }

    #[test]
    fn reads_through_a_cursor() {
        use pretty_assertions::assert_eq;
        let mut source = IoSource::new(io::Cursor::new(std::vec![1u8, 2, 3])).unwrap();
        assert_eq!(source.len(), 3);
        assert_eq!(source.read_byte(), 1);
        source.seek(2);
        assert_eq!(source.tell(), 2);
        assert_eq!(source.read_byte(), 3);
        assert!(source.at_end());
        assert_eq!(source.read_byte(), 0);
    }

    #[test]
    fn seeks_through_a_buffered_reader() {
        use pretty_assertions::assert_eq;
        let data: std::vec::Vec<u8> = (0..=255).collect();
        let buffered = io::BufReader::with_capacity(16, io::Cursor::new(data));
        let mut source = IoSource::new(buffered).unwrap();
        assert_eq!(source.len(), 256);
        source.seek(200);
        assert_eq!(source.read_byte(), 200);
        source.seek(3);
        assert_eq!(source.read_exact_size::<2>(), [3, 4]);
        assert_eq!(source.tell(), 5);
        source.seek(255);
        assert_eq!(source.read_byte(), 255);
        assert!(source.at_end());
    }
}

#[test]
fn slice_source_reads_seeks_and_ends() {
    use pretty_assertions::assert_eq;
    let bytes = [0x4D, 0x54, 0x68, 0x64];
    let mut source = SliceSource::new(&bytes);
    assert_eq!(source.read_exact_size::<2>(), [0x4D, 0x54]);
    assert_eq!(source.tell(), 2);
    source.seek(3);
    assert_eq!(source.read_byte(), 0x64);
    assert!(source.at_end());
    assert_eq!(source.read_byte(), 0);
    source.seek(100);
    assert_eq!(source.tell(), 4);
}
