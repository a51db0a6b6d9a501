#![doc = r#"
SMPTE Offset - the time code at which a track is meant to start

The SMPTE Offset meta event (`FF 54 05 hr mn se fr ff`) pins the start of a
track to a SMPTE time code, which is how MIDI sequences are lined up with
video or film. The sequencer reports it to the handler but does not shift
playback by it.

The five data bytes are:
- `0rrhhhhh`: frame rate `rr` (24, 25, 29.97 or 30 fps) and hours `hhhhh`
- minutes (0-59)
- seconds (0-59)
- frames (below the frame rate)
- fractional frames, in hundredths (0-99)
"#]

use thiserror::Error;

use crate::UMicros;

/// The four frame rates MIDI time code knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second, film
    TwentyFour,
    /// 25 frames per second, PAL/SECAM
    TwentyFive,
    /// 29.97 frames per second (30000/1001), NTSC drop-frame
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// Nominal frame count per second. Drop-frame counts 30 frames per second.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine | Self::Thirty => 30,
        }
    }

    /// Actual frame rate.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

const DROP_FRAME: f64 = 30_000. / 1001.;

/// Why a SMPTE offset could not be parsed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SmpteError {
    /// The event does not carry exactly 5 bytes.
    #[error("SMPTE offset needs 5 bytes, got {0}")]
    Length(usize),
    /// The frame rate bits are out of range.
    #[error("Invalid SMPTE frame rate {0}")]
    TrackFrame(u8),
    /// Hours above 23.
    #[error("Invalid SMPTE hour {0}")]
    HourOffset(u8),
    /// Minutes above 59.
    #[error("Invalid SMPTE minute {0}")]
    MinuteOffset(u8),
    /// Seconds above 59.
    #[error("Invalid SMPTE second {0}")]
    SecondOffset(u8),
    /// A frame number the frame rate cannot reach.
    #[error("Invalid SMPTE frame {0}")]
    FrameOffset(u8),
    /// Fractional frames above 99.
    #[error("Invalid SMPTE subframe {0}")]
    Subframe(u8),
}

/// The time code a track starts at.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// Frame rate the offset is counted in.
    pub fps: SmpteFps,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
    /// Frame within the second, below [`SmpteFps::as_division`].
    pub frame: u8,
    /// Hundredths of a frame, 0-99.
    pub subframe: u8,
}

impl SmpteOffset {
    /// Parse the 5 data bytes of an SMPTE offset meta event.
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len()));
        }

        let fps = match data[0] >> 5 {
            0 => SmpteFps::TwentyFour,
            1 => SmpteFps::TwentyFive,
            2 => SmpteFps::TwentyNine,
            3 => SmpteFps::Thirty,
            v => return Err(SmpteError::TrackFrame(v)),
        };
        let hour = data[0] & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        let minute = data[1];
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        let second = data[2];
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        let frame = data[3];
        if frame >= fps.as_division() {
            return Err(SmpteError::FrameOffset(frame));
        }
        let subframe = data[4];
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }

        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// The offset from 00:00:00:00, rounded down to whole microseconds.
    pub fn as_micros(&self) -> UMicros {
        let whole_seconds =
            self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64;
        let frames = self.frame as f64 + self.subframe as f64 / 100.;
        let fraction = frames * 1_000_000. / self.fps.as_f64();
        UMicros::new(whole_seconds * 1_000_000 + fraction as u64)
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // bytes after FF 54 05
    let offset = SmpteOffset::parse(&[0x41, 0x17, 0x2D, 0x0C, 0x22]).unwrap();
    assert_eq!(
        offset,
        SmpteOffset {
            fps: SmpteFps::TwentyNine,
            hour: 1,
            minute: 23,
            second: 45,
            frame: 12,
            subframe: 34,
        }
    );
}

#[test]
fn offset_in_micros() {
    use pretty_assertions::assert_eq;
    // 00:00:01, frame 12 + 50/100 at 25 fps = 1.5 s
    let offset = SmpteOffset::parse(&[0x20, 0x00, 0x01, 0x0C, 0x32]).unwrap();
    assert_eq!(offset.as_micros(), UMicros::new(1_500_000));
}

#[test]
fn parse_invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        SmpteOffset::parse(&[0x7F, 0x17, 0x2D, 0x0C, 0x22]),
        Err(SmpteError::HourOffset(31))
    );
    assert_eq!(
        SmpteOffset::parse(&[0x41, 0x50, 0x2D, 0x0C, 0x22]),
        Err(SmpteError::MinuteOffset(80))
    );
    assert_eq!(
        SmpteOffset::parse(&[0x00, 0x00, 0x00, 24, 0x00]),
        Err(SmpteError::FrameOffset(24))
    );
}
