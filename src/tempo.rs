#![doc = r#"
Tempo as carried by the set tempo meta event
"#]

use core::fmt;

/// Microseconds per quarter note.
///
/// MIDI files that never set a tempo play at 120 beats per minute,
/// which is [`Tempo::DEFAULT`].
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Tempo {
    /// 500 000 µs per quarter note.
    pub const DEFAULT: Self = Self(500_000);

    /// Creates a tempo from microseconds per quarter note
    #[inline]
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }

    /// Returns the microseconds per quarter note
    #[inline]
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Milliseconds a single tick lasts at this tempo, given the file's
    /// ticks per quarter note.
    ///
    /// `ppq` must not be zero.
    #[inline]
    pub fn millis_per_tick(&self, ppq: u16) -> f64 {
        self.0 as f64 / ppq as f64 / 1000.
    }

    /// Beats per minute, for display
    pub fn bpm(&self) -> f64 {
        60_000_000. / self.0 as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for Tempo {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}µs/qn", self.0)
    }
}

#[test]
fn default_tempo_is_120_bpm() {
    assert_eq!(Tempo::default().micros_per_quarter_note(), 500_000);
    assert_eq!(Tempo::default().bpm(), 120.);
}

#[test]
fn millis_per_tick_at_480_ppq() {
    let tempo = Tempo::new(480_000);
    assert_eq!(tempo.millis_per_tick(480), 1.);

    let ms = Tempo::DEFAULT.millis_per_tick(480) * 10.;
    assert!((ms - 10.416_666).abs() < 1e-4);
}
