#![doc = r#"
Owned representation of a parsed MIDI file, as far as the converter cares.

Reading the byte stream itself is left to [`midly`]. This module copies out
what the pipeline needs: the file's [`Timing`] and, for every track, the
ordered list of [`RawEvent`]s.
"#]

mod event;
pub use event::*;

mod flatten;
pub use flatten::*;

mod timing;
pub use timing::*;

use crate::ConvertError;

#[doc = r#"
A MIDI file reduced to its timing and tracks.

# Example
```rust
# use mdmc::prelude::*;
let file = MidiFile::new(
    Timing::TicksPerQuarterNote(96),
    vec![vec![RawEvent::track_name(0, "Harp"), RawEvent::note_on(0, 60, 64)]],
);

assert_eq!(file.ticks_per_quarter_note().unwrap(), 96);
let events = file.into_events();
assert_eq!(&*events[1].instrument, "Harp");
```
"#]
#[derive(Clone, Debug, PartialEq)]
pub struct MidiFile {
    timing: Timing,
    tracks: Vec<Vec<RawEvent>>,
}

impl MidiFile {
    /// Build a file from already decoded tracks
    pub fn new(timing: Timing, tracks: Vec<Vec<RawEvent>>) -> Self {
        Self { timing, tracks }
    }

    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8]) -> Result<Self, ConvertError> {
        let smf = midly::Smf::parse(bytes)?;
        let tracks: Vec<Vec<RawEvent>> = smf
            .tracks
            .iter()
            .map(|track| track.iter().map(RawEvent::from_midly).collect())
            .collect();

        tracing::debug!(
            "Parsed {} track(s), {} event(s), timing {:?}",
            tracks.len(),
            tracks.iter().map(Vec::len).sum::<usize>(),
            smf.header.timing
        );

        Ok(Self {
            timing: smf.header.timing.into(),
            tracks,
        })
    }

    /// Returns header info
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// The ticks per quarter note the deltas are expressed in.
    ///
    /// Fails for SMPTE timed files and for a zero resolution.
    pub fn ticks_per_quarter_note(&self) -> Result<u16, ConvertError> {
        self.timing.ppq()
    }

    /// Returns a track list
    pub fn tracks(&self) -> &[Vec<RawEvent>] {
        &self.tracks
    }

    /// Annotates and merges all tracks into a single time ordered stream.
    ///
    /// See [`flatten`](fn@flatten).
    pub fn into_events(self) -> Vec<AnnotatedEvent> {
        flatten(self.tracks)
    }
}
