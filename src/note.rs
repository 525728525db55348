//! Note extraction from the merged event stream.

use std::sync::Arc;

use crate::{
    ConvertError,
    file::{AnnotatedEvent, NOTE_ON},
};

#[doc = r#"
A struck note, reduced to what the device can play.

`delta_millis` is the time since the previous *kept* note, corrected for the
tempo active at this note.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// MIDI note number
    pub pitch: u8,
    /// Name of the track the note was played on
    pub instrument: Arc<str>,
    /// Milliseconds since the previous note
    pub delta_millis: f64,
}

impl NoteEvent {
    /// Create a new note event
    pub fn new(pitch: u8, instrument: impl Into<Arc<str>>, delta_millis: f64) -> Self {
        Self {
            pitch,
            instrument: instrument.into(),
            delta_millis,
        }
    }
}

/// Keeps the note-ons with a positive velocity and measures the time
/// between them.
///
/// Skipped events don't move the reference point, so the gap they span is
/// folded into the next kept note's delta. The first note is measured from
/// tick 0.
///
/// # Errors
/// [`ConvertError::ZeroTicksPerQuarterNote`] if `ppq` is zero.
pub fn extract_notes<'a, I>(events: I, ppq: u16) -> Result<Vec<NoteEvent>, ConvertError>
where
    I: IntoIterator<Item = &'a AnnotatedEvent>,
{
    if ppq == 0 {
        return Err(ConvertError::ZeroTicksPerQuarterNote);
    }
    let mut last_time = 0u64;
    let mut notes = Vec::new();

    for annotated in events {
        if annotated.event.event_type() != NOTE_ON {
            continue;
        }
        let Some((pitch, velocity)) = annotated.event.note_data() else {
            continue;
        };
        if velocity == 0 {
            continue;
        }

        let ticks = annotated.time as f64 - last_time as f64;
        notes.push(NoteEvent {
            pitch,
            instrument: Arc::clone(&annotated.instrument),
            delta_millis: ticks * annotated.tempo.millis_per_tick(ppq),
        });
        last_time = annotated.time;
    }

    tracing::debug!("Extracted {} note(s)", notes.len());
    Ok(notes)
}

#[cfg(test)]
use crate::file::{RawEvent, flatten};

#[cfg(test)]
fn deltas(notes: &[NoteEvent]) -> Vec<f64> {
    notes.iter().map(|n| n.delta_millis).collect()
}

#[test]
fn only_sounding_note_ons_are_kept() {
    let events = flatten([vec![
        RawEvent::note_on(0, 60, 100),
        RawEvent::note_on(0, 61, 0),
        RawEvent::note_off(0, 60),
        RawEvent::tempo(0, 500_000),
        RawEvent::note_on(0, 62, 1),
    ]]);
    let notes = extract_notes(&events, 480).unwrap();
    let pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();
    assert_eq!(pitches, vec![60, 62]);
}

#[test]
fn skipped_events_fold_into_next_delta() {
    // times: 0, 240, 480, 960
    let events = flatten([vec![
        RawEvent::note_on(240, 60, 100),
        RawEvent::note_off(240, 60),
        RawEvent::note_on(480, 62, 0),
        RawEvent::note_on(0, 64, 100),
    ]]);
    let notes = extract_notes(&events, 500).unwrap();
    assert_eq!(deltas(&notes), vec![0., 960.]);
}

#[test]
fn delta_uses_tempo_of_the_note() {
    let events = flatten([vec![
        RawEvent::tempo(500, 1_000_000),
        RawEvent::note_on(0, 60, 100),
    ]]);
    let notes = extract_notes(&events, 500).unwrap();
    assert_eq!(deltas(&notes), vec![1000.]);
}

#[test]
fn first_note_is_measured_from_zero() {
    let events = flatten([vec![RawEvent::tempo(96, 480_000), RawEvent::note_on(0, 60, 100)]]);
    let notes = extract_notes(&events, 96).unwrap();
    assert_eq!(deltas(&notes), vec![480.]);
    assert_eq!(&*notes[0].instrument, "unknown");
}

#[test]
fn no_notes_is_empty() {
    let events = flatten([vec![RawEvent::tempo(0, 1)], vec![]]);
    assert!(extract_notes(&events, 480).unwrap().is_empty());
}

#[test]
fn zero_ppq_is_an_error() {
    let events = flatten([vec![RawEvent::note_on(96, 60, 100), RawEvent::note_on(0, 62, 100)]]);
    assert!(matches!(
        extract_notes(&events, 0),
        Err(ConvertError::ZeroTicksPerQuarterNote)
    ));
}
