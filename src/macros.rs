//! Crate-internal macros: logging shims that expand to `tracing` when the feature is on, and early returns for truncated reads.

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::debug!($($arg)*);
        }
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::warn!($($arg)*);
        }
    }};
}

/// Unwraps a read from a track, or reports the track as truncated.
macro_rules! take {
    ($read:expr) => {
        match $read {
            Some(value) => value,
            None => return Ok($crate::message::Decoded::Truncated),
        }
    };
}
