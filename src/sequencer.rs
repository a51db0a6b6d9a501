#![doc = r#"
Parsing a file and playing it back in real time.

[`Sequencer::play`] reads the header and every track header, then loops:

1. while the [`Transport`] is paused, idle without advancing time
2. find the smallest wait over the unfinished tracks
3. sleep that long through the [`Delay`]
4. subtract it from every unfinished track
5. decode the next event of every track whose wait reached zero, dispatch it
   to the [`EventHandler`] and read that track's next delta-time

Playback ends when every track has reached its end-of-track event, when the
source runs out of bytes, or when [`Transport::stop`] is called.
"#]

use crate::{
    Delay, EventHandler, MidiSource, ReadResult, ReaderError, Transport,
    file::{FileHeader, TrackState},
    message::{Decoded, decode_event},
    reader::TrackReader,
    scheduler,
    transport::DEFAULT_TEMPO,
};

/// Number of tracks a [`Sequencer`] holds unless told otherwise.
pub const DEFAULT_MAX_TRACKS: usize = 12;

/// Plays a Standard MIDI File from a [`MidiSource`].
///
/// `N` is the maximum number of tracks played; tracks beyond it are ignored.
/// Track state lives in a fixed array, so playback never allocates.
///
/// The pause flag, stop request and tempo are kept in a [`Transport`] the
/// sequencer borrows, so they can be changed while [`Sequencer::play`] runs.
pub struct Sequencer<'t, S, D, H, const N: usize = DEFAULT_MAX_TRACKS> {
    source: S,
    delay: D,
    handler: H,
    transport: &'t Transport,
    header: Option<FileHeader>,
    tracks: [TrackState; N],
    finished: usize,
    end_of_stream: bool,
    last_error: Option<ReaderError>,
}

impl<'t, S, D, H> Sequencer<'t, S, D, H>
where
    S: MidiSource,
    D: Delay,
    H: EventHandler,
{
    /// A sequencer for up to [`DEFAULT_MAX_TRACKS`] tracks.
    pub fn new(source: S, delay: D, handler: H, transport: &'t Transport) -> Self {
        Self::with_capacity(source, delay, handler, transport)
    }
}

impl<'t, S, D, H, const N: usize> Sequencer<'t, S, D, H, N>
where
    S: MidiSource,
    D: Delay,
    H: EventHandler,
{
    /// A sequencer for up to `N` tracks.
    ///
    /// ```rust
    /// # use midix_seq::prelude::*;
    /// let transport = Transport::new();
    /// let sequencer = Sequencer::<_, _, _, 2>::with_capacity(
    ///     SliceSource::new(&[]),
    ///     NoDelay,
    ///     (),
    ///     &transport,
    /// );
    /// assert!(sequencer.header().is_none());
    /// ```
    pub fn with_capacity(source: S, delay: D, handler: H, transport: &'t Transport) -> Self {
        Self {
            source,
            delay,
            handler,
            transport,
            header: None,
            tracks: [TrackState::EMPTY; N],
            finished: 0,
            end_of_stream: false,
            last_error: None,
        }
    }

    /// Parse the file and play it until it ends, is stopped, or fails.
    ///
    /// # Errors
    /// Any [`ReaderError`] met while parsing or decoding. The handler's
    /// [`EventHandler::on_error`] is called with it first, and it is kept as
    /// [`Sequencer::last_error`]. Events dispatched before the error are not
    /// taken back.
    pub fn play(&mut self) -> ReadResult<()> {
        self.last_error = None;
        let loaded = self.load().map(|_| ());
        let result = loaded.and_then(|()| self.run());
        if let Err(error) = &result {
            warn!("playback aborted: {}", error);
            self.last_error = Some(*error);
            self.handler.on_error(error);
        }
        result
    }

    /// Parse the header and the track headers, without playing anything.
    ///
    /// Tracks are left positioned at their first delta-time.
    pub fn load(&mut self) -> ReadResult<&FileHeader> {
        self.header = None;
        self.tracks = [TrackState::EMPTY; N];
        self.source.seek(0);

        let header = FileHeader::read(&mut self.source, N)?;
        self.transport.set_tempo(DEFAULT_TEMPO);

        for (index, slot) in self.tracks[..header.track_count()].iter_mut().enumerate() {
            let track = TrackState::read(&mut self.source).map_err(|e| e.in_track(index))?;
            self.source.seek(track.end());
            *slot = track;
        }

        Ok(self.header.insert(header))
    }

    fn run(&mut self) -> ReadResult<()> {
        let Some(header) = self.header else {
            return Ok(());
        };
        let count = header.track_count();
        let division = header.ticks_per_quarter_note();

        self.transport.rewind();
        self.finished = 0;
        self.end_of_stream = false;

        for index in 0..count {
            self.schedule(index, division);
        }

        while self.finished < count && !self.end_of_stream {
            while self.transport.is_paused() && !self.transport.is_stop_requested() {
                self.delay.idle();
            }
            if self.transport.take_stop() {
                self.finish_all(count);
                break;
            }

            let Some(step) = scheduler::min_wait(&self.tracks[..count]) else {
                break;
            };
            if !step.is_zero() {
                self.delay.delay_micros(step);
            }
            scheduler::advance(&mut self.tracks[..count], step);

            for index in 0..count {
                if self.transport.is_stop_requested() {
                    break;
                }
                if self.tracks[index].is_due() {
                    self.step(index, division)?;
                }
            }
        }

        debug!(
            "playback finished: {}/{} tracks done, end of stream: {}",
            self.finished, count, self.end_of_stream
        );
        Ok(())
    }

    /// Play the due event of one track and schedule the one after it.
    fn step(&mut self, index: usize, division: u16) -> ReadResult<()> {
        let track = &mut self.tracks[index];
        let mut reader = TrackReader::new(&mut self.source, track);
        let decoded = decode_event(&mut reader, &mut self.handler, self.transport);
        let position = reader.position();
        let end_of_stream = reader.hit_end_of_stream();

        match decoded {
            Err(kind) => return Err(ReaderError::new(position, kind).in_track(index)),
            Ok(Decoded::Event) => self.schedule(index, division),
            Ok(Decoded::EndOfTrack) => {
                debug!("track {} ended", index);
                self.finished += 1;
                self.handler.end_of_track(index);
            }
            Ok(Decoded::Truncated) => self.retire(index, end_of_stream),
        }
        Ok(())
    }

    /// Read the next delta-time of a track and turn it into its wait.
    fn schedule(&mut self, index: usize, division: u16) {
        let tempo = self.transport.tempo();
        let track = &mut self.tracks[index];
        let mut reader = TrackReader::new(&mut self.source, track);
        let ticks = reader.read_varlen();
        let end_of_stream = reader.hit_end_of_stream();

        match ticks {
            Some(ticks) => track.wait = scheduler::delta_to_micros(ticks, tempo, division),
            None => self.retire(index, end_of_stream),
        }
    }

    /// A track ran out of data without an end-of-track event.
    fn retire(&mut self, index: usize, end_of_stream: bool) {
        if end_of_stream {
            debug!("track {} hit the end of the stream", index);
            self.end_of_stream = true;
            return;
        }
        warn!("track {} ended without an end-of-track event", index);
        self.tracks[index].done = true;
        self.finished += 1;
    }

    fn finish_all(&mut self, count: usize) {
        debug!("stopping playback");
        for track in self.tracks[..count].iter_mut() {
            track.done = true;
        }
        self.finished = count;
    }

    /// The parsed header, once [`Sequencer::load`] or [`Sequencer::play`] got that far.
    pub fn header(&self) -> Option<&FileHeader> {
        self.header.as_ref()
    }

    /// The tracks being played.
    pub fn tracks(&self) -> &[TrackState] {
        let count = self.header.map_or(0, |header| header.track_count());
        &self.tracks[..count]
    }

    /// Number of tracks that have finished.
    pub fn finished_tracks(&self) -> usize {
        self.finished
    }

    /// True if the last playback stopped because the source ran out of bytes.
    pub fn reached_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /// The error that aborted the last playback.
    pub fn last_error(&self) -> Option<&ReaderError> {
        self.last_error.as_ref()
    }

    /// The transport controlling this sequencer.
    pub fn transport(&self) -> &'t Transport {
        self.transport
    }

    /// Active tempo in microseconds per quarter note.
    pub fn tempo(&self) -> u32 {
        self.transport.tempo()
    }

    /// Override the active tempo, in microseconds per quarter note.
    pub fn set_tempo(&self, tempo: u32) {
        self.transport.set_tempo(tempo)
    }

    /// The event handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The event handler, mutably.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Take the sequencer apart.
    pub fn into_parts(self) -> (S, D, H) {
        (self.source, self.delay, self.handler)
    }
}
