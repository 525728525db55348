use mdmc::{
    mdmc::{MAGIC, encoded_len},
    prelude::*,
};
use pretty_assertions::assert_eq;

/// Encodes a variable length quantity
fn vlq(mut value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push(0x80 | (value & 0x7F) as u8);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}

fn note_on(delta: u32, key: u8, velocity: u8) -> Vec<u8> {
    let mut bytes = vlq(delta);
    bytes.extend_from_slice(&[0x90, key, velocity]);
    bytes
}

fn note_off(delta: u32, key: u8) -> Vec<u8> {
    let mut bytes = vlq(delta);
    bytes.extend_from_slice(&[0x80, key, 0x40]);
    bytes
}

fn track_name(delta: u32, name: &str) -> Vec<u8> {
    let mut bytes = vlq(delta);
    bytes.extend_from_slice(&[0xFF, 0x03, name.len() as u8]);
    bytes.extend_from_slice(name.as_bytes());
    bytes
}

fn tempo(delta: u32, micros_per_quarter: u32) -> Vec<u8> {
    let mut bytes = vlq(delta);
    bytes.extend_from_slice(&[0xFF, 0x51, 0x03]);
    bytes.extend_from_slice(&micros_per_quarter.to_be_bytes()[1..]);
    bytes
}

/// Wraps events into an `MTrk` chunk, appending the end of track event
fn track(events: &[Vec<u8>]) -> Vec<u8> {
    let mut body: Vec<u8> = events.concat();
    body.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

/// Builds a format 1 file from track chunks
fn midi_file(division: [u8; 2], tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x01]);
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division);
    for track in tracks {
        bytes.extend_from_slice(track);
    }
    bytes
}

fn sequence_number(number: u16) -> Vec<u8> {
    let mut bytes = vec![0x00, 0xFF, 0x00, 0x02];
    bytes.extend_from_slice(&number.to_be_bytes());
    bytes
}

fn ppq(ticks: u16) -> [u8; 2] {
    ticks.to_be_bytes()
}

fn two_track_song() -> Vec<u8> {
    midi_file(
        ppq(480),
        &[
            track(&[track_name(0, "Piano"), note_on(0, 60, 100), note_off(480, 60)]),
            track(&[tempo(10, 500_000), note_on(0, 72, 90), note_off(480, 72)]),
        ],
    )
}

#[test]
fn parses_tracks_through_midly() {
    let file = MidiFile::parse(&two_track_song()).unwrap();
    assert_eq!(file.timing(), Timing::TicksPerQuarterNote(480));
    assert_eq!(file.tracks().len(), 2);
    assert_eq!(file.tracks()[0][0], RawEvent::track_name(0, "Piano"));
    assert_eq!(file.tracks()[1][0], RawEvent::tempo(10, 500_000));
    assert_eq!(file.tracks()[1][1], RawEvent::note_on(0, 72, 90));
}

#[test]
fn sequence_number_is_read_and_skipped() {
    let song = midi_file(
        ppq(96),
        &[track(&[
            sequence_number(1),
            track_name(0, "Flute"),
            note_on(96, 60, 100),
            note_on(0, 62, 100),
        ])],
    );
    let file = MidiFile::parse(&song).unwrap();
    assert_eq!(file.tracks()[0][0], RawEvent::meta(0, 0x00, MetaData::Integer(1)));

    let conversion = convert(&song).unwrap();
    assert_eq!(conversion.note_count(), 2);
    assert!(conversion.notes().iter().all(|n| n.timbre == Timbre::Flute));
    assert_eq!(conversion.duration_millis(), 500);
}

#[test]
fn converts_two_track_song() {
    let conversion = convert(&two_track_song()).unwrap();
    let bytes = conversion.bytes();

    assert_eq!(bytes.len(), encoded_len(2));
    assert_eq!(bytes[..4].to_vec(), MAGIC.to_vec());
    assert_eq!(
        u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        conversion.duration_millis()
    );
    // piano on harp, pitches 60 and 72 around their mean of 66
    assert_eq!(bytes[8..].to_vec(), vec![2, 0, 0, 6, 2, 0, 50, 18, 0, 0, 0, 0]);
    assert!(conversion.speed_multiplier() > 4.79 && conversion.speed_multiplier() < 4.81);
}

#[test]
fn output_is_deterministic() {
    let song = two_track_song();
    assert_eq!(convert(&song).unwrap(), convert(&song).unwrap());
}

#[test]
fn zero_velocity_note_on_is_not_counted() {
    let song = midi_file(
        ppq(96),
        &[track(&[
            note_on(96, 60, 100),
            note_on(0, 60, 0),
            note_on(96, 62, 100),
            note_on(0, 64, 80),
        ])],
    );
    let conversion = convert(&song).unwrap();
    assert_eq!(conversion.note_count(), 3);
    assert_eq!(conversion.bytes().len(), encoded_len(3));
}

#[test]
fn iron_xylophone_plays_as_xylophone() {
    let song = midi_file(
        ppq(96),
        &[track(&[
            track_name(0, "Iron Xylophone"),
            note_on(96, 60, 100),
            note_on(0, 62, 100),
        ])],
    );
    let conversion = convert(&song).unwrap();
    assert!(conversion.notes().iter().all(|n| n.timbre == Timbre::Xylophone));
    assert_eq!(conversion.bytes()[8], 10);
}

#[test]
fn single_note_cannot_set_the_tempo() {
    let song = midi_file(ppq(96), &[track(&[note_on(0, 60, 100), note_off(96, 60)])]);
    let err = convert(&song).unwrap_err();
    assert!(matches!(err, ConvertError::InsufficientNotes));
}

#[test]
fn chord_only_cannot_set_the_tempo() {
    let song = midi_file(
        ppq(96),
        &[
            track(&[note_on(0, 60, 100), note_on(0, 64, 100)]),
            track(&[note_on(0, 67, 100)]),
        ],
    );
    assert!(convert(&song).unwrap_err().is_insufficient_notes());
}

#[test]
fn smpte_timing_is_rejected() {
    // -30 fps, 40 ticks per frame
    let song = midi_file([0xE2, 40], &[track(&[note_on(10, 60, 100), note_on(0, 62, 100)])]);
    assert!(matches!(convert(&song), Err(ConvertError::UnsupportedTiming)));
}

#[test]
fn garbage_is_a_parse_error() {
    assert!(matches!(
        convert(b"definitely not a midi file"),
        Err(ConvertError::Parse(_))
    ));
}

#[test]
fn output_reads_back() {
    let conversion = convert(&two_track_song()).unwrap();
    let file = MdmcFile::parse(conversion.bytes()).unwrap();
    assert_eq!(file.duration_millis(), conversion.duration_millis());
    assert_eq!(file.notes(), conversion.notes());
}

/// Deterministic pseudo random bytes, good enough to shake out range bugs
struct Lcg(u32);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.0 >> 8
    }
}

#[test]
fn encoded_fields_stay_in_range() {
    let names = ["Piano", "Cow Bell", "Drums", "Synth Choir", "Tuba", "Didgeridoo"];
    let mut rng = Lcg(7);

    let mut tracks = Vec::new();
    let mut sounding = 0;
    for name in names {
        let mut events = vec![track_name(0, name), tempo(0, 300_000 + rng.next() % 600_000)];
        for _ in 0..50 {
            let velocity = (rng.next() % 128) as u8;
            if velocity > 0 {
                sounding += 1;
            }
            events.push(note_on(rng.next() % 2_000, (rng.next() % 128) as u8, velocity));
        }
        tracks.push(track(&events));
    }

    let conversion = convert(&midi_file(ppq(192), &tracks)).unwrap();
    let bytes = conversion.bytes();
    assert_eq!(conversion.note_count(), sounding);
    assert_eq!(bytes.len(), encoded_len(sounding));
    assert!(conversion.speed_multiplier() >= 1.);

    for record in bytes[8..bytes.len() - 4].chunks_exact(4) {
        assert!(record[0] <= 16, "timbre {}", record[0]);
        assert!(record[0] >= 2, "classifier never yields stop or nothing");
        assert!(record[3] <= 24, "pitch {}", record[3]);
    }
    assert_eq!(bytes[bytes.len() - 4..].to_vec(), vec![0, 0, 0, 0]);
}
