#![allow(dead_code)]

use std::cell::Cell;

use midix_seq::prelude::*;

/// End of track: delta 0, `FF 2F 00`.
pub const EOT: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Build a file whose header declares exactly the given tracks.
pub fn smf(format: u16, division: u16, tracks: &[&[u8]]) -> Vec<u8> {
    smf_declaring(format, tracks.len() as u16, division, tracks)
}

/// Build a file with an arbitrary declared track count.
pub fn smf_declaring(format: u16, declared: u16, division: u16, tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&declared.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    for events in tracks {
        bytes.extend_from_slice(&track(events));
    }
    bytes
}

/// An `MTrk` chunk around `events`.
pub fn track(events: &[u8]) -> Vec<u8> {
    chunk(b"MTrk", events)
}

/// Any chunk.
pub fn chunk(magic: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(magic);
    bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
    bytes.extend_from_slice(data);
    bytes
}

/// Microseconds slept and events dispatched so far, shared by the delay and the handler.
#[derive(Default)]
pub struct Clock {
    now: Cell<u64>,
    dispatched: Cell<usize>,
}

impl Clock {
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched.get()
    }
}

/// A delay that only advances a [`Clock`].
pub struct RecordingDelay<'a> {
    pub clock: &'a Clock,
    pub sleeps: Vec<u64>,
    pub idles: usize,
    /// Sleeps and dispatched events seen at each idle call.
    pub idle_snapshots: Vec<(usize, usize)>,
    /// Resume the transport after this many idle calls.
    pub resume_after: Option<(usize, &'a Transport)>,
}

impl<'a> RecordingDelay<'a> {
    pub fn new(clock: &'a Clock) -> Self {
        Self {
            clock,
            sleeps: Vec::new(),
            idles: 0,
            idle_snapshots: Vec::new(),
            resume_after: None,
        }
    }
}

impl Delay for RecordingDelay<'_> {
    fn delay_micros(&mut self, micros: UMicros) {
        self.sleeps.push(micros.us());
        self.clock.now.set(self.clock.now() + micros.us());
    }

    fn idle(&mut self) {
        self.idles += 1;
        self.idle_snapshots
            .push((self.sleeps.len(), self.clock.dispatched()));
        if let Some((after, transport)) = self.resume_after {
            if self.idles >= after {
                transport.resume();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    NoteOn(Channel, u8, u8),
    NoteOff(Channel, u8, u8),
    KeyPressure(Channel, u8, u8),
    ControlChange(Channel, u8, u8),
    ProgramChange(Channel, u8),
    ChannelPressure(Channel, u8),
    PitchBend(Channel, u16),
    Meta(MetaKind, u32, Vec<u8>),
    ChannelPrefix(u8),
    PortPrefix(u8),
    TimeSignature(TimeSignature),
    KeySignature(KeySignature),
    SequenceNumber(u16),
    SmpteOffset(SmpteOffset),
    Tempo(u32),
    EndOfTrack(usize),
}

/// Records every event with the clock time it was dispatched at.
pub struct RecordingHandler<'a> {
    pub clock: &'a Clock,
    pub events: Vec<(u64, Event)>,
    pub errors: Vec<ReaderError>,
    /// Declared length of every payload handed to `meta`.
    pub declared_lens: Vec<u32>,
    /// Read at most this many bytes of a meta payload.
    pub meta_limit: usize,
    /// Stop the transport once this many events were recorded.
    pub stop_after: Option<(usize, &'a Transport)>,
    /// Pause the transport once this many events were recorded.
    pub pause_after: Option<(usize, &'a Transport)>,
    /// Set this tempo on the transport at every note on.
    pub retempo_on_note: Option<(u32, &'a Transport)>,
}

impl<'a> RecordingHandler<'a> {
    pub fn new(clock: &'a Clock) -> Self {
        Self {
            clock,
            events: Vec::new(),
            errors: Vec::new(),
            declared_lens: Vec::new(),
            meta_limit: usize::MAX,
            stop_after: None,
            pause_after: None,
            retempo_on_note: None,
        }
    }

    fn push(&mut self, event: Event) {
        self.events.push((self.clock.now(), event));
        self.clock.dispatched.set(self.events.len());
        if let Some((after, transport)) = self.stop_after {
            if self.events.len() >= after {
                transport.stop();
            }
        }
        if let Some((after, transport)) = self.pause_after {
            if self.events.len() == after {
                transport.pause();
            }
        }
    }

    /// The recorded events without their times.
    pub fn kinds(&self) -> Vec<Event> {
        self.events.iter().map(|(_, event)| event.clone()).collect()
    }

    /// Channel events only, with their times.
    pub fn notes(&self) -> Vec<(u64, Event)> {
        self.events
            .iter()
            .filter(|(_, event)| {
                matches!(
                    event,
                    Event::NoteOn(..) | Event::NoteOff(..) | Event::ControlChange(..)
                )
            })
            .cloned()
            .collect()
    }
}

impl EventHandler for RecordingHandler<'_> {
    fn note_on(&mut self, channel: Channel, key: u8, velocity: u8) {
        self.push(Event::NoteOn(channel, key, velocity));
        if let Some((tempo, transport)) = self.retempo_on_note {
            transport.set_tempo(tempo);
        }
    }
    fn note_off(&mut self, channel: Channel, key: u8, velocity: u8) {
        self.push(Event::NoteOff(channel, key, velocity));
    }
    fn key_pressure(&mut self, channel: Channel, key: u8, pressure: u8) {
        self.push(Event::KeyPressure(channel, key, pressure));
    }
    fn control_change(&mut self, channel: Channel, controller: u8, value: u8) {
        self.push(Event::ControlChange(channel, controller, value));
    }
    fn program_change(&mut self, channel: Channel, program: u8) {
        self.push(Event::ProgramChange(channel, program));
    }
    fn channel_pressure(&mut self, channel: Channel, pressure: u8) {
        self.push(Event::ChannelPressure(channel, pressure));
    }
    fn pitch_bend(&mut self, channel: Channel, bend: u16) {
        self.push(Event::PitchBend(channel, bend));
    }
    fn meta(&mut self, kind: MetaKind, payload: &mut Payload<'_>) {
        self.declared_lens.push(payload.declared_len());
        let len = payload.len();
        let data = payload.by_ref().take(self.meta_limit).collect();
        self.push(Event::Meta(kind, len, data));
    }
    fn channel_prefix(&mut self, channel: u8) {
        self.push(Event::ChannelPrefix(channel));
    }
    fn port_prefix(&mut self, port: u8) {
        self.push(Event::PortPrefix(port));
    }
    fn time_signature(&mut self, signature: TimeSignature) {
        self.push(Event::TimeSignature(signature));
    }
    fn key_signature(&mut self, signature: KeySignature) {
        self.push(Event::KeySignature(signature));
    }
    fn sequence_number(&mut self, number: u16) {
        self.push(Event::SequenceNumber(number));
    }
    fn smpte_offset(&mut self, offset: &SmpteOffset) {
        self.push(Event::SmpteOffset(*offset));
    }
    fn tempo_changed(&mut self, tempo: u32) {
        self.push(Event::Tempo(tempo));
    }
    fn end_of_track(&mut self, track: usize) {
        self.push(Event::EndOfTrack(track));
    }
    fn on_error(&mut self, error: &ReaderError) {
        self.errors.push(*error);
    }
}

/// Play `bytes` to completion with recording delay and handler.
pub fn play<'a>(
    bytes: &[u8],
    clock: &'a Clock,
    transport: &'a Transport,
) -> (ReadResult<()>, RecordingDelay<'a>, RecordingHandler<'a>) {
    let mut delay = RecordingDelay::new(clock);
    let mut handler = RecordingHandler::new(clock);
    let result = {
        let mut sequencer = Sequencer::new(
            SliceSource::new(bytes),
            &mut delay,
            &mut handler,
            transport,
        );
        sequencer.play()
    };
    (result, delay, handler)
}
