mod common;

use common::*;
use midix_seq::prelude::*;
use pretty_assertions::assert_eq;

fn play_err(bytes: &[u8]) -> (ReaderError, RecordingHandlerSummary) {
    let clock = Clock::default();
    let transport = Transport::new();
    let (result, _delay, handler) = play(bytes, &clock, &transport);
    let error = result.unwrap_err();
    let summary = RecordingHandlerSummary {
        events: handler.kinds(),
        errors: handler.errors.clone(),
    };
    (error, summary)
}

struct RecordingHandlerSummary {
    events: Vec<Event>,
    errors: Vec<ReaderError>,
}

#[test]
fn corrupted_track_magic() {
    let mut bytes = smf(0, 96, &[]);
    bytes[11] = 1;
    bytes.extend_from_slice(&chunk(b"MTrx", &[0x00, 0x90, 0x3C, 0x64, 0x00, 0xFF, 0x2F, 0x00]));

    let (error, handler) = play_err(&bytes);
    assert_eq!(error.error_kind(), &ReaderErrorKind::BadTrackHeader);
    assert_eq!(error.track(), Some(0));
    assert_eq!(error.code(), 2);
    assert!(handler.events.is_empty());
    assert_eq!(handler.errors, vec![error]);
}

#[test]
fn second_track_magic_is_checked_before_playback() {
    let good = track(&[0x00, 0x90, 0x3C, 0x64, 0x00, 0xFF, 0x2F, 0x00]);
    let mut bytes = smf_declaring(1, 2, 96, &[]);
    bytes.extend_from_slice(&good);
    bytes.extend_from_slice(&chunk(b"XXXX", &[]));

    let (error, handler) = play_err(&bytes);
    assert_eq!(error.error_kind(), &ReaderErrorKind::BadTrackHeader);
    assert_eq!(error.track(), Some(1));
    assert!(handler.events.is_empty());
}

#[test]
fn header_errors_carry_their_codes() {
    let cases: [(Vec<u8>, ReaderErrorKind); 4] = [
        (
            {
                let mut bytes = smf(0, 96, &[&EOT]);
                bytes[0] = b'X';
                bytes
            },
            ReaderErrorKind::BadFileHeader,
        ),
        (smf(2, 96, &[&EOT]), ReaderErrorKind::NoMultipleSongSupport),
        (smf(0, 0xE728, &[&EOT]), ReaderErrorKind::NoSmpteSupport),
        (smf(0, 96, &[]), ReaderErrorKind::BadFileStruct),
    ];

    for (bytes, kind) in cases {
        let (error, handler) = play_err(&bytes);
        assert_eq!(error.error_kind(), &kind);
        assert_eq!(error.track(), None);
        assert_eq!(handler.errors.len(), 1);
    }
}

#[test]
fn end_of_track_with_a_length_is_rejected() {
    let events = [0x00, 0x90, 0x3C, 0x64, 0x00, 0xFF, 0x2F, 0x01, 0x00];
    let bytes = smf(0, 96, &[&events]);

    let (error, handler) = play_err(&bytes);
    assert_eq!(error.error_kind(), &ReaderErrorKind::BadMetaEvent);
    assert_eq!(error.track(), Some(0));
    // events before the error are already out
    assert_eq!(handler.events, vec![Event::NoteOn(Channel::One, 0x3C, 0x64)]);
}

#[test]
fn fixed_length_meta_events_are_checked() {
    let bad = [
        [0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1],
        [0x00, 0xFF, 0x00, 0x01, 0x07, 0x00],
        [0x00, 0xFF, 0x20, 0x02, 0x00, 0x00],
        [0x00, 0xFF, 0x21, 0x00, 0x00, 0x00],
        [0x00, 0xFF, 0x58, 0x03, 0x04, 0x02],
        [0x00, 0xFF, 0x59, 0x01, 0x00, 0x00],
        [0x00, 0xFF, 0x54, 0x04, 0x00, 0x00],
    ];
    for events in bad {
        let mut events = events.to_vec();
        events.extend_from_slice(&EOT);
        let bytes = smf(0, 96, &[&events]);

        let (error, handler) = play_err(&bytes);
        assert_eq!(error.error_kind(), &ReaderErrorKind::BadMetaEvent, "{events:02X?}");
        assert!(handler.events.is_empty());
    }
}

#[test]
fn a_rejected_tempo_leaves_the_tempo_alone() {
    let events = [0x00, 0xFF, 0x51, 0x04, 0x00, 0x07, 0xA1, 0x20];
    let bytes = smf(0, 96, &[&events]);

    let clock = Clock::default();
    let transport = Transport::new();
    let (result, _delay, handler) = play(&bytes, &clock, &transport);

    assert_eq!(result.unwrap_err().error_kind(), &ReaderErrorKind::BadMetaEvent);
    assert_eq!(transport.tempo(), DEFAULT_TEMPO);
    assert!(handler.events.is_empty());
}

#[test]
fn empty_text_and_sysex_are_rejected() {
    for events in [
        [0x00, 0xFF, 0x01, 0x00],
        [0x00, 0xFF, 0x7F, 0x00],
        [0x00, 0xF0, 0x00, 0x00],
        [0x00, 0xF7, 0x00, 0x00],
    ] {
        let bytes = smf(0, 96, &[&events]);
        let (error, _handler) = play_err(&bytes);
        assert_eq!(error.error_kind(), &ReaderErrorKind::BadMetaEvent);
        assert_eq!(error.code(), 3);
    }
}

#[test]
fn last_error_is_kept_and_cleared() {
    let broken = smf(2, 96, &[&EOT]);
    let fine = smf(0, 96, &[&EOT]);

    let transport = Transport::new();
    let mut sequencer = Sequencer::new(SliceSource::new(&broken), NoDelay, (), &transport);
    assert!(sequencer.play().is_err());
    assert_eq!(
        sequencer.last_error().map(ReaderError::error_kind),
        Some(&ReaderErrorKind::NoMultipleSongSupport)
    );

    let mut sequencer = Sequencer::new(SliceSource::new(&fine), NoDelay, (), &transport);
    sequencer.play().unwrap();
    assert!(sequencer.last_error().is_none());
    assert_eq!(sequencer.finished_tracks(), 1);
}

#[test]
fn errors_display_their_position() {
    let events = [0x00, 0xF0, 0x00];
    let bytes = smf(0, 96, &[&events]);
    let (error, _handler) = play_err(&bytes);
    // header 14 + track header 8 + three bytes read
    assert_eq!(error.position(), 25);
    assert_eq!(
        error.to_string(),
        "Reading at Position 25, Invalid meta event length"
    );
}
