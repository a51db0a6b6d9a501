#![doc = r#"
Merging the tracks of a file into one timeline.

Each track keeps the time left until its next event. Playback repeatedly
takes the smallest of those waits over the unfinished tracks, sleeps that
long, subtracts it from every unfinished track and then plays exactly the
tracks whose wait dropped to zero. Events of different tracks therefore come
out in time order without building a merged event list, at the cost of a scan
over all tracks per step, which is cheap for the small, fixed number of tracks
a sequencer holds.
"#]

use crate::{UMicros, file::TrackState};

/// Convert a delta-time in ticks to microseconds.
///
/// `tempo` is in microseconds per quarter note. A division of 0 is treated as 1.
pub const fn delta_to_micros(ticks: u32, tempo: u32, ticks_per_quarter_note: u16) -> UMicros {
    let division = if ticks_per_quarter_note == 0 {
        1
    } else {
        ticks_per_quarter_note as u64
    };
    UMicros::new(ticks as u64 * tempo as u64 / division)
}

/// The smallest wait over the unfinished tracks, or `None` if all are finished.
pub fn min_wait(tracks: &[TrackState]) -> Option<UMicros> {
    tracks
        .iter()
        .filter(|track| !track.is_done())
        .map(TrackState::wait)
        .min()
}

/// Subtract `elapsed` from the wait of every unfinished track.
///
/// With `elapsed` from [`min_wait`], at least one track becomes due.
pub fn advance(tracks: &mut [TrackState], elapsed: UMicros) {
    for track in tracks.iter_mut().filter(|track| !track.is_done()) {
        track.wait = track.wait.saturating_sub(elapsed);
    }
}

#[cfg(test)]
fn track(wait: u64, done: bool) -> TrackState {
    let mut track = TrackState::new(0, 0);
    track.wait = UMicros::new(wait);
    track.done = done;
    track
}

#[test]
fn converts_ticks_at_the_active_tempo() {
    use pretty_assertions::assert_eq;
    // 480 ticks at 120 bpm = half a second
    assert_eq!(delta_to_micros(480, 500_000, 480), UMicros::new(500_000));
    assert_eq!(delta_to_micros(240, 500_000, 480), UMicros::new(250_000));
    assert_eq!(delta_to_micros(96, 1_000_000, 96), UMicros::new(1_000_000));
    assert_eq!(delta_to_micros(0, 500_000, 96), UMicros::ZERO);
    // no overflow on the largest delta and tempo
    assert_eq!(
        delta_to_micros(0x0FFF_FFFF, 0xFF_FFFF, 1),
        UMicros::new(0x0FFF_FFFF * 0xFF_FFFF)
    );
    assert_eq!(delta_to_micros(10, 500_000, 0), UMicros::new(5_000_000));
}

#[test]
fn min_wait_skips_finished_tracks() {
    use pretty_assertions::assert_eq;
    let tracks = [track(50, true), track(250, false), track(100, false)];
    assert_eq!(min_wait(&tracks), Some(UMicros::new(100)));
    assert_eq!(min_wait(&[track(0, true)]), None);
    assert_eq!(min_wait(&[]), None);
}

#[test]
fn advance_makes_the_earliest_track_due() {
    use pretty_assertions::assert_eq;
    let mut tracks = [track(100, false), track(250, false), track(30, true)];
    let step = min_wait(&tracks).unwrap();
    advance(&mut tracks, step);
    assert!(tracks[0].is_due());
    assert!(!tracks[1].is_due());
    assert_eq!(tracks[1].wait(), UMicros::new(150));
    assert_eq!(tracks[2].wait(), UMicros::new(30));
}
