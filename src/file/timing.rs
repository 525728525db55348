use crate::ConvertError;

/// The header timing type.
///
/// Only files timed in ticks per quarter note can be converted. SMPTE timed
/// files are still read so the caller can report what they got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(u16),

    /// The midi file's delta times are defined using an SMPTE and MIDI Time Code
    Smpte {
        /// Frames per second, rounded (29.97 is reported as 29)
        fps: u8,
        /// Subdivisions of a frame
        ticks_per_frame: u8,
    },
}

impl Timing {
    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns the ticks per quarter note, rejecting timings the pipeline
    /// can't divide by.
    pub const fn ppq(&self) -> Result<u16, ConvertError> {
        match self {
            Self::TicksPerQuarterNote(0) => Err(ConvertError::ZeroTicksPerQuarterNote),
            Self::TicksPerQuarterNote(t) => Ok(*t),
            Self::Smpte { .. } => Err(ConvertError::UnsupportedTiming),
        }
    }
}

impl From<midly::Timing> for Timing {
    fn from(value: midly::Timing) -> Self {
        match value {
            midly::Timing::Metrical(tpqn) => Self::TicksPerQuarterNote(tpqn.as_int()),
            midly::Timing::Timecode(fps, ticks_per_frame) => Self::Smpte {
                fps: fps.as_int(),
                ticks_per_frame,
            },
        }
    }
}

#[test]
fn ppq_rejects_unusable_timing() {
    assert_eq!(Timing::TicksPerQuarterNote(480).ppq().ok(), Some(480));
    assert!(matches!(
        Timing::TicksPerQuarterNote(0).ppq(),
        Err(ConvertError::ZeroTicksPerQuarterNote)
    ));
    let smpte = Timing::Smpte {
        fps: 30,
        ticks_per_frame: 40,
    };
    assert_eq!(smpte.ticks_per_quarter_note(), None);
    assert!(matches!(smpte.ppq(), Err(ConvertError::UnsupportedTiming)));
}
