use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The MIDI channel of a channel voice message.

Channels are numbered 1-16 for humans and 0-15 on the wire: the low nibble of
the status byte. `u8::from(channel)` gives the wire value.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// The channel addressed by a status byte.
    pub const fn from_status(status: u8) -> Self {
        use Channel::*;
        match status & 0x0F {
            0 => One,
            1 => Two,
            2 => Three,
            3 => Four,
            4 => Five,
            5 => Six,
            6 => Seven,
            7 => Eight,
            8 => Nine,
            9 => Ten,
            10 => Eleven,
            11 => Twelve,
            12 => Thirteen,
            13 => Fourteen,
            14 => Fifteen,
            _ => Sixteen,
        }
    }

    /// The wire value, 0-15.
    pub const fn index(&self) -> u8 {
        *self as u8
    }

    /// The channel number as printed on instruments, 1-16.
    pub const fn number(&self) -> u8 {
        *self as u8 + 1
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.number())
    }
}

#[test]
fn channel_from_status() {
    use pretty_assertions::assert_eq;
    assert_eq!(Channel::from_status(0x90), Channel::One);
    assert_eq!(Channel::from_status(0x8F), Channel::Sixteen);
    assert_eq!(Channel::from_status(0xB9).number(), 10);
    assert_eq!(u8::from(Channel::Three), 2);
    assert_eq!(Channel::try_from(4u8).unwrap(), Channel::Five);
}
