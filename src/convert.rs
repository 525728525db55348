#![doc = r#"
Runs the whole pipeline, from MIDI bytes to an MDMC buffer.
"#]

use crate::{
    ConvertError,
    file::{MidiFile, RawEvent, flatten},
    mdmc::{self, EncodedNote},
    note::{NoteEvent, extract_notes},
    pitch::{CENTER_PITCH, MAX_PITCH, PitchFolder},
    quantize::{TICK_MILLIS, quantize},
};

/// Tunables of the conversion. The defaults describe the note block device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    tick_millis: u32,
    center_pitch: i32,
    max_pitch: i32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            tick_millis: TICK_MILLIS,
            center_pitch: CENTER_PITCH,
            max_pitch: MAX_PITCH,
        }
    }
}

impl ConvertOptions {
    /// Milliseconds per device tick. Zero is treated as one.
    pub fn with_tick_millis(mut self, tick_millis: u32) -> Self {
        self.tick_millis = tick_millis.max(1);
        self
    }

    /// Pitch the mean note of the piece is moved to
    pub fn with_center_pitch(mut self, center_pitch: i32) -> Self {
        self.center_pitch = center_pitch;
        self
    }

    /// Highest encodable pitch
    pub fn with_max_pitch(mut self, max_pitch: i32) -> Self {
        self.max_pitch = max_pitch;
        self
    }

    /// Milliseconds per device tick
    pub fn tick_millis(&self) -> u32 {
        self.tick_millis
    }

    /// Pitch the mean note of the piece is moved to
    pub fn center_pitch(&self) -> i32 {
        self.center_pitch
    }

    /// Highest encodable pitch
    pub fn max_pitch(&self) -> i32 {
        self.max_pitch
    }
}

/// The result of a conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    bytes: Vec<u8>,
    notes: Vec<EncodedNote>,
    duration_millis: u32,
    speed_multiplier: f64,
}

impl Conversion {
    /// The MDMC buffer
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the conversion, returning the MDMC buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The records that were written
    pub fn notes(&self) -> &[EncodedNote] {
        &self.notes
    }

    /// Number of notes written
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Playback length in milliseconds
    pub fn duration_millis(&self) -> u32 {
        self.duration_millis
    }

    /// Factor every delta was stretched by
    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Playback speed relative to the source, `1 / speed_multiplier`
    pub fn playback_speed(&self) -> f64 {
        1. / self.speed_multiplier
    }
}

/// Converts MIDI files with a fixed set of [`ConvertOptions`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// The options in use
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parses `bytes` as a Standard MIDI File and converts it.
    pub fn convert(&self, bytes: &[u8]) -> Result<Conversion, ConvertError> {
        let file = MidiFile::parse(bytes)?;
        self.convert_file(file)
    }

    /// Converts an already parsed file.
    pub fn convert_file(&self, file: MidiFile) -> Result<Conversion, ConvertError> {
        let ppq = file.ticks_per_quarter_note()?;
        let events = file.into_events();
        self.convert_notes(&extract_notes(&events, ppq)?)
    }

    /// Converts raw tracks whose deltas are in ticks of `ppq`.
    pub fn convert_events<T>(&self, tracks: &[T], ppq: u16) -> Result<Conversion, ConvertError>
    where
        T: AsRef<[RawEvent]>,
    {
        let events = flatten(tracks.iter().map(|track| track.as_ref().iter().cloned()));
        self.convert_notes(&extract_notes(&events, ppq)?)
    }

    /// Quantizes, folds and encodes extracted notes.
    pub fn convert_notes(&self, notes: &[NoteEvent]) -> Result<Conversion, ConvertError> {
        let quantized = quantize(notes, self.options.tick_millis)?;
        let folder = PitchFolder::from_pitches(
            notes.iter().map(|n| n.pitch),
            self.options.center_pitch,
            self.options.max_pitch,
        )?;

        let records = mdmc::encode_notes(
            notes
                .iter()
                .zip(&quantized.deltas)
                .map(|(note, delta)| (&note.instrument, *delta, note.pitch)),
            &folder,
        );
        let bytes = mdmc::encode(quantized.duration_millis, &records);

        tracing::debug!(
            "Encoded {} note(s) into {} bytes, pitch offset {}",
            records.len(),
            bytes.len(),
            folder.offset()
        );

        Ok(Conversion {
            bytes,
            notes: records,
            duration_millis: quantized.duration_millis,
            speed_multiplier: quantized.speed_multiplier,
        })
    }
}

/// Converts a Standard MIDI File with the default options
pub fn convert(bytes: &[u8]) -> Result<Conversion, ConvertError> {
    Converter::default().convert(bytes)
}

/// Converts raw tracks with the default options
pub fn convert_events<T>(tracks: &[T], ppq: u16) -> Result<Conversion, ConvertError>
where
    T: AsRef<[RawEvent]>,
{
    Converter::default().convert_events(tracks, ppq)
}

#[cfg(test)]
use crate::timbre::Timbre;

#[test]
fn two_track_example() {
    // Piano plays at tick 0, the second track's note lands on tick 10
    let a = vec![RawEvent::track_name(0, "Piano"), RawEvent::note_on(0, 60, 100)];
    let b = vec![RawEvent::tempo(10, 500_000), RawEvent::note_on(0, 72, 90)];
    let conversion = convert_events(&[a, b], 480).unwrap();

    assert!((conversion.speed_multiplier() - 50. / (10. * 500_000. / 480. / 1000.)).abs() < 1e-9);
    // 10.41666..ms × 4.8 sums to a hair above 50
    assert_eq!(conversion.duration_millis(), 51);
    assert_eq!(
        conversion.notes(),
        &[
            EncodedNote::new(Timbre::Harp, 0, 6),
            EncodedNote::new(Timbre::Harp, 50, 18),
        ]
    );
    assert_eq!(conversion.bytes().len(), mdmc::encoded_len(2));
    assert_eq!(&conversion.bytes()[..4], b"MDMC");
}

#[test]
fn single_note_is_insufficient() {
    let track = vec![RawEvent::note_on(0, 60, 100)];
    let err = convert_events(&[track], 480).unwrap_err();
    assert!(err.is_insufficient_notes());
    assert_eq!(err.to_string(), "cannot compute tempo: insufficient note events");
}

#[test]
fn no_notes_is_insufficient() {
    let track = vec![RawEvent::tempo(0, 500_000)];
    assert!(convert_events(&[track], 480).unwrap_err().is_insufficient_notes());
    assert!(convert_events::<Vec<RawEvent>>(&[], 480).unwrap_err().is_insufficient_notes());
}

#[test]
fn zero_ppq_is_rejected() {
    let track = vec![RawEvent::note_on(10, 60, 100), RawEvent::note_on(0, 60, 100)];
    assert!(matches!(
        convert_events(&[track], 0),
        Err(ConvertError::ZeroTicksPerQuarterNote)
    ));
}

#[test]
fn options_change_grid_and_range() {
    let track = vec![
        RawEvent::note_on(500, 60, 100),
        RawEvent::note_on(500, 62, 100),
        RawEvent::note_on(0, 64, 100),
    ];
    // 500 ticks at 500 ppq and 120 bpm are 500ms
    let converter = Converter::new(
        ConvertOptions::default()
            .with_tick_millis(300)
            .with_center_pitch(6)
            .with_max_pitch(12),
    );
    assert_eq!(converter.options().tick_millis(), 300);
    assert_eq!(converter.options().center_pitch(), 6);
    assert_eq!(converter.options().max_pitch(), 12);
    assert_eq!(Converter::default().options(), &ConvertOptions::default());

    let conversion = converter.convert_events(&[track], 500).unwrap();
    assert_eq!(conversion.speed_multiplier(), 600. / 500.);
    assert_eq!(conversion.duration_millis(), 1200);
    let pitches: Vec<u8> = conversion.notes().iter().map(|n| n.pitch).collect();
    assert_eq!(pitches, vec![4, 6, 8]);
}

#[test]
fn extreme_center_pitch_still_encodes() {
    for center in [i32::MIN, i32::MAX] {
        let converter = Converter::new(ConvertOptions::default().with_center_pitch(center));
        let track = [RawEvent::note_on(480, 60, 100), RawEvent::note_on(0, 72, 100)];
        let conversion = converter.convert_events(&[track], 480).unwrap();
        assert_eq!(conversion.note_count(), 2);
        assert!(conversion.notes().iter().all(|n| n.pitch <= 24));
    }
}
