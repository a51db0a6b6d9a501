#![doc = r#"
An allocation-free Standard MIDI File decoder and real-time sequencer.

`midix-seq` reads a Standard MIDI File (SMF) from a seekable byte source,
validates its chunks, and replays the events of every track at the right
relative time by calling an [`EventHandler`]. It owns no clock and no thread:
waiting is delegated to a caller-supplied [`Delay`], and bytes come from a
caller-supplied [`MidiSource`].

# Overview
```text
MidiSource ──▶ FileHeader::read ──▶ TrackState::read (per track)
                                        │
                        ┌───────────────┘
                        ▼
        scheduler (min wait, advance) ──▶ Delay::delay_micros
                        │
                        ▼
        message::decode_event ──▶ EventHandler
```

# Example
```rust
# use midix_seq::prelude::*;
struct Printer;

impl EventHandler for Printer {
    fn note_on(&mut self, channel: Channel, key: u8, velocity: u8) {
        let _ = (channel, key, velocity);
    }
}

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 8,
    0x00, 0x90, 0x3C, 0x64, // note on, middle C
    0x00, 0xFF, 0x2F, 0x00, // end of track
];

let transport = Transport::new();
let mut sequencer = Sequencer::new(SliceSource::new(&bytes), NoDelay, Printer, &transport);
sequencer.play().unwrap();
assert_eq!(sequencer.finished_tracks(), 1);
```

# Features
- `std` (default): [`IoSource`](source::IoSource) and
  [`ThreadSleep`](delay::ThreadSleep).
- `tracing`: structured logging of the decoder through `tracing`.
- `serde`: serde derives on the plain value types.
"#]
#![no_std]
#![warn(missing_docs)]

#[cfg(any(feature = "std", test))]
extern crate std;

#[macro_use]
mod macros;

pub mod delay;
pub mod file;
pub mod handler;
pub mod message;
mod micros;
pub mod reader;
pub mod scheduler;
pub mod sequencer;
pub mod source;
pub mod transport;

pub use delay::{Delay, NoDelay};
pub use handler::{EventHandler, Payload};
pub use micros::*;
pub use reader::{ReadResult, ReaderError, ReaderErrorKind};
pub use sequencer::{DEFAULT_MAX_TRACKS, Sequencer};
pub use source::{MidiSource, SliceSource};
pub use transport::{DEFAULT_TEMPO, Transport};

/// Commonly used types
pub mod prelude {
    pub use crate::delay::*;
    pub use crate::file::*;
    pub use crate::handler::*;
    pub use crate::message::Channel;
    pub use crate::micros::*;
    pub use crate::reader::{ReadResult, ReaderError, ReaderErrorKind, TrackReader};
    pub use crate::sequencer::*;
    pub use crate::source::*;
    pub use crate::transport::*;
}
