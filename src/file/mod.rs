#![doc = r#"
The chunks of a Standard MIDI File

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data.

```text
[Header Chunk: "MThd", length 6]
[Track Chunk 1: "MTrk", length n]
[Track Chunk 2: "MTrk", length m]
...
```

## [`FileHeader`]

The header chunk must be the first chunk in a MIDI file. It holds the file's
[`FormatType`], the number of tracks that follow and the time division, the
number of delta-time ticks in a quarter note.

## [`TrackState`]

Each track chunk holds a stream of delta-time/event pairs. Tracks are not
loaded into memory: a [`TrackState`] only records where the track's next
unread byte is and how many bytes of the chunk are left.

## Meta events

[`meta`] decodes the meta and system exclusive events found inside tracks.
"#]

mod header;
pub use header::*;

mod track;
pub use track::*;

pub mod meta;
pub use meta::{KeySignature, MetaKind, SmpteFps, SmpteOffset, TimeSignature};
