//! The waiting primitive the sequencer drives playback with.

use crate::UMicros;

/// Blocks the caller for a number of microseconds.
///
/// The sequencer calls [`Delay::delay_micros`] with the gap to the next due
/// event and [`Delay::idle`] in a loop while playback is paused. Both are the
/// only points where another context can change the [`Transport`](crate::Transport).
pub trait Delay {
    /// Sleep for `micros`.
    fn delay_micros(&mut self, micros: UMicros);

    /// Called repeatedly while playback is paused. Must not advance playback time.
    fn idle(&mut self) {
        core::hint::spin_loop();
    }
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_micros(&mut self, micros: UMicros) {
        (**self).delay_micros(micros)
    }
    fn idle(&mut self) {
        (**self).idle()
    }
}

/// A delay that returns immediately.
///
/// Useful to walk through a file as fast as possible, e.g. to validate it or
/// to collect its events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn delay_micros(&mut self, _micros: UMicros) {}
}

#[cfg(feature = "std")]
/// Sleeps the current thread, and yields it while paused.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

#[cfg(feature = "std")]
impl Delay for ThreadSleep {
    fn delay_micros(&mut self, micros: UMicros) {
        std::thread::sleep(micros.to_duration());
    }

    fn idle(&mut self) {
        std::thread::yield_now();
    }
}
