use super::{EncodedNote, HEADER_LEN, MAGIC, RECORD_LEN, TERMINATOR};
use crate::{MdmcError, timbre::Timbre};

#[doc = r#"
An MDMC buffer read back into records.

This only inspects converter output. Going back to MIDI is not possible:
note lengths, velocities and channels are gone.

# Example
```rust
# use mdmc::prelude::*;
let bytes = [b'M', b'D', b'M', b'C', 0, 0, 0, 50, 2, 0, 50, 12, 0, 0, 0, 0];
let file = MdmcFile::parse(&bytes).unwrap();
assert_eq!(file.duration_millis(), 50);
assert_eq!(file.notes(), &[EncodedNote::new(Timbre::Harp, 50, 12)]);
```
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdmcFile {
    duration_millis: u32,
    notes: Vec<EncodedNote>,
}

impl MdmcFile {
    /// Reads the header and every record up to the terminator.
    ///
    /// Bytes after the terminator are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, MdmcError> {
        if bytes.len() < HEADER_LEN {
            return Err(MdmcError::Truncated(bytes.len()));
        }
        let magic: [u8; 4] = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != MAGIC {
            return Err(MdmcError::BadMagic(magic));
        }
        let duration_millis = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        let mut notes = Vec::new();
        let mut position = HEADER_LEN;
        loop {
            let Some(record) = bytes.get(position..position + RECORD_LEN) else {
                return Err(if position == bytes.len() {
                    MdmcError::MissingTerminator
                } else {
                    MdmcError::Truncated(bytes.len())
                });
            };
            if record == TERMINATOR {
                break;
            }
            let timbre =
                Timbre::try_from(record[0]).map_err(|_| MdmcError::UnknownTimbre(record[0]))?;
            notes.push(EncodedNote::new(
                timbre,
                u16::from_be_bytes([record[1], record[2]]),
                record[3],
            ));
            position += RECORD_LEN;
        }

        Ok(Self {
            duration_millis,
            notes,
        })
    }

    /// Playback length stored in the header
    pub fn duration_millis(&self) -> u32 {
        self.duration_millis
    }

    /// The note records
    pub fn notes(&self) -> &[EncodedNote] {
        &self.notes
    }

    /// Sum of every note delta.
    ///
    /// Rounding each delta may make this differ slightly from
    /// [`duration_millis`](Self::duration_millis).
    pub fn total_delta_millis(&self) -> u64 {
        self.notes.iter().map(|n| n.delta_millis as u64).sum()
    }
}

#[test]
fn rejects_bad_magic() {
    let bytes = *b"MIDI\0\0\0\0\0\0\0\0";
    assert_eq!(MdmcFile::parse(&bytes), Err(MdmcError::BadMagic(*b"MIDI")));
}

#[test]
fn rejects_truncated_buffers() {
    assert_eq!(MdmcFile::parse(b"MDM"), Err(MdmcError::Truncated(3)));
    let bytes = [b'M', b'D', b'M', b'C', 0, 0, 0, 0, 2, 0];
    assert_eq!(MdmcFile::parse(&bytes), Err(MdmcError::Truncated(10)));
}

#[test]
fn requires_terminator() {
    let bytes = [b'M', b'D', b'M', b'C', 0, 0, 0, 0, 2, 0, 0, 3];
    assert_eq!(MdmcFile::parse(&bytes), Err(MdmcError::MissingTerminator));
}

#[test]
fn rejects_unknown_timbre() {
    let bytes = [b'M', b'D', b'M', b'C', 0, 0, 0, 0, 17, 0, 0, 3, 0, 0, 0, 0];
    assert_eq!(MdmcFile::parse(&bytes), Err(MdmcError::UnknownTimbre(17)));
}

#[test]
fn reads_encoder_output() {
    let notes = [
        EncodedNote::new(Timbre::Chime, 0, 0),
        EncodedNote::new(Timbre::Pling, 1000, 24),
    ];
    let file = MdmcFile::parse(&super::encode(1000, &notes)).unwrap();
    assert_eq!(file.notes(), &notes);
    assert_eq!(file.total_delta_millis(), 1000);
}
