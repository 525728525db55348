#![doc = r#"
Argument handling for the `midi2mdmc` binary.
"#]

use std::{ffi::OsString, path::PathBuf};

use crate::UsageError;

/// Name shown in the usage line when the OS gives no program name
pub const DEFAULT_PROGRAM: &str = "midi2mdmc";

/// The two files a run works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The MIDI file to read
    pub input: PathBuf,
    /// Where to write the MDMC buffer
    pub output: PathBuf,
}

impl Args {
    /// Reads `<program> <input> <output>`.
    ///
    /// Arguments after the output path are ignored. Empty paths count as
    /// missing.
    pub fn parse<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::<OsString>::into);
        let program = args
            .next()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());

        let mut path = || args.next().filter(|p| !p.is_empty()).map(PathBuf::from);
        match (path(), path()) {
            (Some(input), Some(output)) => Ok(Self { input, output }),
            _ => Err(UsageError::new(program)),
        }
    }
}

#[test]
fn reads_both_paths() {
    let args = Args::parse(["midi2mdmc", "song.mid", "song.mdmc"]).unwrap();
    assert_eq!(args.input, PathBuf::from("song.mid"));
    assert_eq!(args.output, PathBuf::from("song.mdmc"));
}

#[test]
fn missing_paths_are_a_usage_error() {
    let err = Args::parse(["midi2mdmc", "song.mid"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Usage: midi2mdmc <midi-in-file> <mdmc-out-file>"
    );
    assert!(Args::parse(["midi2mdmc"]).is_err());
    assert!(Args::parse(["midi2mdmc", "", "out.mdmc"]).is_err());
    assert_eq!(
        Args::parse(Vec::<String>::new()).unwrap_err().program(),
        DEFAULT_PROGRAM
    );
}
