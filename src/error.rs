use thiserror::Error;

#[doc = r#"
A set of errors that can occur while converting a MIDI file into MDMC
"#]
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The external parser rejected the MIDI bytes.
    #[error("Parsing {0}")]
    Parse(#[from] midly::Error),
    /// The file times its events in SMPTE frames rather than ticks per quarter note.
    #[error("SMPTE timecode timing is not supported, expected ticks per quarter note")]
    UnsupportedTiming,
    /// The header declares zero ticks per quarter note.
    #[error("The file declares 0 ticks per quarter note")]
    ZeroTicksPerQuarterNote,
    /// There are no notes, or no two notes that are apart in time,
    /// so the mean delta cannot be computed.
    #[error("cannot compute tempo: insufficient note events")]
    InsufficientNotes,
}

impl ConvertError {
    /// True if the input had too few notes to derive a tempo from
    pub const fn is_insufficient_notes(&self) -> bool {
        matches!(self, Self::InsufficientNotes)
    }
}

/// Errors produced when reading back an MDMC buffer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MdmcError {
    /// The first four bytes are not `MDMC`
    #[error("Bad magic {0:?}, expected \"MDMC\"")]
    BadMagic([u8; 4]),
    /// The buffer ends in the middle of the header or a record
    #[error("Buffer truncated at position {0}")]
    Truncated(usize),
    /// Every record was read but the all-zero terminator never showed up
    #[error("Missing terminator record")]
    MissingTerminator,
    /// A record names a timbre byte above 16
    #[error("Unknown timbre byte {0}")]
    UnknownTimbre(u8),
}

/// The command line did not name both files
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Usage: {program} <midi-in-file> <mdmc-out-file>")]
pub struct UsageError {
    program: String,
}

impl UsageError {
    /// Create a usage error for the given program name
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the program name shown in the usage line
    pub fn program(&self) -> &str {
        &self.program
    }
}
