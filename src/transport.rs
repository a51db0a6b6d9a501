#![doc = r#"
Playback controls shared with other execution contexts.

A [`Transport`] holds the only sequencer state that may be touched while
[`Sequencer::play`](crate::Sequencer::play) runs: the pause flag, a stop
request and the active tempo. Everything is atomic, so a transport can be
shared by reference with an interrupt handler, another thread, or the event
handler itself, and it can live in a `static`:

```rust
# use midix_seq::Transport;
static TRANSPORT: Transport = Transport::new();

TRANSPORT.pause();
assert!(TRANSPORT.is_paused());
TRANSPORT.resume();
```
"#]

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Tempo assumed until a set-tempo meta event says otherwise: 120 bpm.
pub const DEFAULT_TEMPO: u32 = 500_000;

/// Pause, stop and tempo controls for a running sequencer.
#[derive(Debug)]
pub struct Transport {
    paused: AtomicBool,
    stop: AtomicBool,
    tempo: AtomicU32,
}

impl Transport {
    /// A transport that is playing at [`DEFAULT_TEMPO`].
    pub const fn new() -> Self {
        Self {
            paused: AtomicBool::new(false),
            stop: AtomicBool::new(false),
            tempo: AtomicU32::new(DEFAULT_TEMPO),
        }
    }

    /// Suspend playback at the next loop iteration.
    pub fn pause(&self) {
        debug!("pause requested");
        self.paused.store(true, Ordering::Release);
    }

    /// Continue a paused playback.
    pub fn resume(&self) {
        debug!("resume requested");
        self.paused.store(false, Ordering::Release);
    }

    /// True while playback is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Finish every track. Playback ends at its next loop iteration, even if paused.
    pub fn stop(&self) {
        debug!("stop requested");
        self.stop.store(true, Ordering::Release);
    }

    /// True if a stop was requested and playback has not acknowledged it yet.
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Active tempo in microseconds per quarter note.
    pub fn tempo(&self) -> u32 {
        self.tempo.load(Ordering::Relaxed)
    }

    /// Override the active tempo, in microseconds per quarter note.
    ///
    /// Takes effect from the next delta-time the sequencer converts.
    pub fn set_tempo(&self, tempo: u32) {
        self.tempo.store(tempo, Ordering::Relaxed);
    }

    /// Clears pause and stop at the start of a playback.
    pub(crate) fn rewind(&self) {
        self.paused.store(false, Ordering::Release);
        self.stop.store(false, Ordering::Release);
    }

    /// Consumes a pending stop request.
    pub(crate) fn take_stop(&self) -> bool {
        self.stop.swap(false, Ordering::AcqRel)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn stop_is_consumed_once() {
    let transport = Transport::new();
    transport.stop();
    assert!(transport.is_stop_requested());
    assert!(transport.take_stop());
    assert!(!transport.take_stop());
}

#[test]
fn rewind_clears_pause_and_stop_but_keeps_tempo() {
    let transport = Transport::new();
    transport.set_tempo(400_000);
    transport.pause();
    transport.stop();
    transport.rewind();
    assert!(!transport.is_paused());
    assert!(!transport.is_stop_requested());
    assert_eq!(transport.tempo(), 400_000);
}
