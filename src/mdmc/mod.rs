#![doc = r#"
The MDMC container.

```text
offset  size  field
0       4     magic, ASCII "MDMC"
4       4     duration in milliseconds, u32 big-endian
8       4×N   note records
8+4N    4     terminator, four zero bytes
```

Each record is `[timbre, delta_hi, delta_lo, pitch]`, where the delta is
the milliseconds since the previous note as a big-endian u16.
"#]

mod encode;
pub use encode::*;

mod decode;
pub use decode::*;

use crate::{quantize::TICK_MILLIS, timbre::Timbre};

/// The first four bytes of every MDMC buffer
pub const MAGIC: [u8; 4] = *b"MDMC";

/// Bytes before the first record
pub const HEADER_LEN: usize = 8;

/// Bytes per note record, and of the terminator
pub const RECORD_LEN: usize = 4;

/// The record closing the note list
pub const TERMINATOR: [u8; RECORD_LEN] = [0; RECORD_LEN];

/// Exact size of a buffer holding `note_count` notes
pub const fn encoded_len(note_count: usize) -> usize {
    HEADER_LEN + RECORD_LEN * note_count + RECORD_LEN
}

/// One note record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodedNote {
    /// The sound to play
    pub timbre: Timbre,
    /// Milliseconds since the previous note
    pub delta_millis: u16,
    /// Pitch in `0..=24`
    pub pitch: u8,
}

impl EncodedNote {
    /// Create a new record
    pub const fn new(timbre: Timbre, delta_millis: u16, pitch: u8) -> Self {
        Self {
            timbre,
            delta_millis,
            pitch,
        }
    }

    /// The delta in device ticks
    pub fn delta_ticks(&self) -> f64 {
        self.delta_millis as f64 / TICK_MILLIS as f64
    }

    /// The four bytes of this record
    pub const fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let [hi, lo] = self.delta_millis.to_be_bytes();
        [self.timbre.index(), hi, lo, self.pitch]
    }
}

#[test]
fn record_layout() {
    let note = EncodedNote::new(Timbre::Flute, 0x1234, 7);
    assert_eq!(note.to_bytes(), [7, 0x12, 0x34, 7]);
    assert_eq!(EncodedNote::new(Timbre::Harp, 150, 0).delta_ticks(), 3.);
    assert_eq!(encoded_len(0), 12);
    assert_eq!(encoded_len(2), 20);
}
