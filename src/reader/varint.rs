use super::TrackReader;
use crate::MidiSource;

impl<S: MidiSource> TrackReader<'_, S> {
    /// Read a variable-length quantity: big-endian groups of 7 bits, where a
    /// set high bit means another byte follows.
    ///
    /// There is no limit on the number of continuation bytes. A quantity that
    /// never terminates consumes the rest of the track and yields `None`.
    /// Bits beyond the 32nd are shifted out.
    pub fn read_varlen(&mut self) -> Option<u32> {
        let mut value = 0u32;
        loop {
            let byte = self.read_byte()?;
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Some(value);
            }
        }
    }
}

#[cfg(test)]
fn encode(mut value: u32, out: &mut [u8; 5]) -> &[u8] {
    let mut groups = [0u8; 5];
    let mut len = 0;
    loop {
        groups[len] = (value & 0x7F) as u8;
        len += 1;
        value >>= 7;
        if value == 0 {
            break;
        }
    }
    for (i, group) in groups[..len].iter().rev().enumerate() {
        out[i] = if i + 1 < len { group | 0x80 } else { *group };
    }
    &out[..len]
}

#[cfg(test)]
fn decode(bytes: &[u8]) -> (Option<u32>, u32) {
    use crate::{SliceSource, file::TrackState};
    let mut source = SliceSource::new(bytes);
    let mut track = TrackState::new(0, bytes.len() as u32);
    let value = TrackReader::new(&mut source, &mut track).read_varlen();
    (value, track.position())
}

#[test]
fn known_quantities() {
    use pretty_assertions::assert_eq;
    assert_eq!(decode(&[0x00]), (Some(0), 1));
    assert_eq!(decode(&[0x40]), (Some(0x40), 1));
    assert_eq!(decode(&[0x7F]), (Some(0x7F), 1));
    assert_eq!(decode(&[0x81, 0x00]), (Some(0x80), 2));
    assert_eq!(decode(&[0xC0, 0x00]), (Some(0x2000), 2));
    assert_eq!(decode(&[0xFF, 0x7F]), (Some(0x3FFF), 2));
    assert_eq!(decode(&[0x81, 0x80, 0x00]), (Some(0x4000), 3));
    assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0x7F]), (Some(0x0FFF_FFFF), 4));
}

#[test]
fn round_trips_every_four_byte_boundary() {
    use pretty_assertions::assert_eq;
    let mut buf = [0; 5];
    for value in [
        0,
        1,
        0x7F,
        0x80,
        0x3FFF,
        0x4000,
        0x1F_FFFF,
        0x20_0000,
        0x0765_4321,
        0x0FFF_FFFF,
    ] {
        let encoded = encode(value, &mut buf);
        assert!(encoded.len() <= 4);
        let len = encoded.len() as u32;
        assert_eq!(decode(encoded), (Some(value), len));
    }
}

#[test]
fn only_consumes_its_own_bytes() {
    use pretty_assertions::assert_eq;
    assert_eq!(decode(&[0x83, 0x60, 0x90, 0x3C]), (Some(480), 2));
}

#[test]
fn unterminated_quantity_runs_out() {
    use pretty_assertions::assert_eq;
    assert_eq!(decode(&[0x81, 0x82, 0x83]), (None, 3));
}
