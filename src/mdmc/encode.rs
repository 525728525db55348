use std::{collections::HashMap, sync::Arc};

use super::{EncodedNote, MAGIC, TERMINATOR, encoded_len};
use crate::{
    pitch::PitchFolder,
    timbre::{Timbre, classify},
};

/// Rounds a rescaled delta to whole milliseconds and keeps the low 16 bits.
///
/// Deltas of 65536ms and more wrap around instead of failing.
pub fn delta_word(delta_millis: f64) -> u16 {
    let rounded = delta_millis.round() as i64;
    if !(0..=u16::MAX as i64).contains(&rounded) {
        tracing::warn!("Delta of {rounded}ms does not fit in 16 bits and is truncated");
    }
    // `as u16` keeps the low 16 bits
    rounded as u16
}

/// Caches the timbre of every instrument name seen so far.
///
/// [`classify`] is pure, so the cache never changes the outcome.
#[derive(Debug, Default, Clone)]
pub struct TimbreCache {
    seen: HashMap<Arc<str>, Timbre>,
}

impl TimbreCache {
    /// Returns the timbre for `instrument`, classifying it on first sight
    pub fn get(&mut self, instrument: &Arc<str>) -> Timbre {
        if let Some(timbre) = self.seen.get(instrument) {
            return *timbre;
        }
        let timbre = classify(instrument);
        tracing::debug!("Instrument \"{instrument}\" plays as {timbre}");
        self.seen.insert(Arc::clone(instrument), timbre);
        timbre
    }

    /// Number of distinct instrument names seen
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True if no instrument was looked up yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Builds the records for a list of notes.
///
/// `notes` yields `(instrument, rescaled delta, source pitch)`.
pub fn encode_notes<'a, I>(notes: I, folder: &PitchFolder) -> Vec<EncodedNote>
where
    I: IntoIterator<Item = (&'a Arc<str>, f64, u8)>,
{
    let mut timbres = TimbreCache::default();
    notes
        .into_iter()
        .map(|(instrument, delta, pitch)| {
            EncodedNote::new(timbres.get(instrument), delta_word(delta), folder.fold(pitch))
        })
        .collect()
}

/// Writes a complete MDMC buffer.
///
/// The buffer is allocated once at its final size.
pub fn encode(duration_millis: u32, notes: &[EncodedNote]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(encoded_len(notes.len()));
    buffer.extend_from_slice(&MAGIC);
    buffer.extend_from_slice(&duration_millis.to_be_bytes());
    for note in notes {
        buffer.extend_from_slice(&note.to_bytes());
    }
    buffer.extend_from_slice(&TERMINATOR);
    debug_assert_eq!(buffer.len(), encoded_len(notes.len()));
    buffer
}

#[test]
fn delta_word_rounds_and_truncates() {
    assert_eq!(delta_word(0.), 0);
    assert_eq!(delta_word(49.6), 50);
    assert_eq!(delta_word(300.4), 300);
    assert_eq!(delta_word(65_535.), 0xFFFF);
    assert_eq!(delta_word(65_536.), 0);
    assert_eq!(delta_word(70_000.), (70_000 & 0xFFFF) as u16);
}

#[test]
fn encode_writes_header_records_and_terminator() {
    let notes = [
        EncodedNote::new(Timbre::Harp, 0, 12),
        EncodedNote::new(Timbre::Bass, 0x0102, 24),
    ];
    let bytes = encode(0x0A0B0C0D, &notes);
    assert_eq!(
        bytes,
        vec![
            b'M', b'D', b'M', b'C', 0x0A, 0x0B, 0x0C, 0x0D, 2, 0, 0, 12, 6, 1, 2, 24, 0, 0, 0, 0,
        ]
    );
}

#[test]
fn cache_keeps_classification() {
    let piano: Arc<str> = Arc::from("Piano");
    let flute: Arc<str> = Arc::from("Flute");
    let mut cache = TimbreCache::default();
    assert_eq!(cache.get(&piano), Timbre::Harp);
    assert_eq!(cache.get(&flute), Timbre::Flute);
    assert_eq!(cache.get(&Arc::from("Piano")), Timbre::Harp);
    assert_eq!(cache.len(), 2);
}

#[test]
fn encode_notes_folds_and_classifies() {
    let snare: Arc<str> = Arc::from("Snare");
    let folder = PitchFolder::new(-48, 24);
    let records = encode_notes([(&snare, 100.2, 60), (&snare, 0., 90)], &folder);
    assert_eq!(
        records,
        vec![
            EncodedNote::new(Timbre::Snare, 100, 12),
            EncodedNote::new(Timbre::Snare, 0, 18),
        ]
    );
}
