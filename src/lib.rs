#![warn(missing_docs)]
#![doc = r#"
Convert MIDI files into MDMC, the fixed-tick note format played back by
note block style devices.

The device knows 17 timbres, a two octave pitch range and a single 50ms
tick, so the conversion is lossy by nature:

1. Every track is annotated with its absolute time, instrument and tempo,
   then merged into one time ordered stream ([`file::flatten`]).
2. Note-on events become [`NoteEvent`](note::NoteEvent)s with a
   tempo corrected delta in milliseconds ([`note::extract_notes`]).
3. Instrument names are mapped onto a [`Timbre`](timbre::Timbre)
   ([`timbre::classify`]).
4. Deltas are stretched so their mean lands on the tick grid
   ([`quantize::quantize`]).
5. Pitches are shifted around the piece's mean and folded by octaves into
   range ([`pitch::PitchFolder`]).
6. Everything is written out as MDMC ([`mdmc::encode`]).

# Example
```rust
use mdmc::prelude::*;

// An event is stamped before its own delta is added to the clock,
// so the second note lands one quarter note after the first.
let piano = vec![
    RawEvent::track_name(0, "Piano"),
    RawEvent::note_on(480, 60, 100),
    RawEvent::note_on(0, 64, 100),
];

let conversion = convert_events(&[piano], 480).unwrap();
assert_eq!(&conversion.bytes()[..4], b"MDMC");
assert_eq!(conversion.bytes().len(), 8 + 4 * 2 + 4);
```
"#]

pub mod cli;
pub mod convert;
mod error;
pub mod file;
pub mod mdmc;
pub mod note;
pub mod pitch;
pub mod quantize;
pub mod tempo;
pub mod timbre;

pub use error::*;

#[doc = r#"
Common re-exports
"#]
pub mod prelude {
    pub use crate::{
        ConvertError, MdmcError, UsageError,
        convert::{Conversion, ConvertOptions, Converter, convert, convert_events},
        file::{AnnotatedEvent, MetaData, MidiFile, RawEvent, RawEventKind, Timing},
        mdmc::{EncodedNote, MdmcFile},
        note::NoteEvent,
        tempo::Tempo,
        timbre::{Timbre, classify},
    };
}
