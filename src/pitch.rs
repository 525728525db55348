//! Pitch range folding.

use crate::{ConvertError, note::NoteEvent};

/// Semitones in an octave
pub const OCTAVE: i32 = 12;

/// Pitch the piece's mean note is moved to
pub const CENTER_PITCH: i32 = 12;

/// Highest pitch the device can play. The lowest is 0.
pub const MAX_PITCH: i32 = 24;

#[doc = r#"
Transposes a piece into the device's pitch range.

The whole piece is shifted so its mean pitch lands on `center`, then every
note still outside `0..=max` is moved by whole octaves until it fits.

# Example
```rust
# use mdmc::pitch::PitchFolder;
let folder = PitchFolder::from_pitches([60, 64, 67], 12, 24).unwrap();
assert_eq!(folder.offset(), 12 - 64);
assert_eq!(folder.fold(60), 8);
assert_eq!(folder.fold(100), 24);
assert_eq!(folder.fold(0), 8);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchFolder {
    offset: i64,
    max: i64,
}

impl PitchFolder {
    /// Create a folder with an explicit offset
    pub const fn new(offset: i64, max: i32) -> Self {
        Self {
            offset,
            max: max as i64,
        }
    }

    /// Centers the mean of `pitches` on `center`.
    ///
    /// # Errors
    /// [`ConvertError::InsufficientNotes`] if there are no pitches.
    pub fn from_pitches<I>(pitches: I, center: i32, max: i32) -> Result<Self, ConvertError>
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = pitches
            .into_iter()
            .fold((0i64, 0i64), |(sum, count), pitch| {
                (sum + pitch as i64, count + 1)
            });
        if count == 0 {
            return Err(ConvertError::InsufficientNotes);
        }
        let mean = (sum as f64 / count as f64).round() as i64;
        Ok(Self::new(center as i64 - mean, max))
    }

    /// Centers the mean pitch of `notes` with the device defaults
    pub fn for_notes(notes: &[NoteEvent]) -> Result<Self, ConvertError> {
        Self::from_pitches(notes.iter().map(|n| n.pitch), CENTER_PITCH, MAX_PITCH)
    }

    /// The shift applied before folding
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Moves `pitch` into `0..=max`.
    ///
    /// Notes below 0 go up to the lowest octave at or above 0, notes above
    /// `max` go down to the highest octave at or below `max`. The result
    /// only depends on `pitch`, not on other notes.
    pub fn fold(&self, pitch: u8) -> u8 {
        let octave = OCTAVE as i64;
        let mut adjusted = (pitch as i64).saturating_add(self.offset);
        if adjusted < 0 {
            adjusted = adjusted.rem_euclid(octave);
        }
        if adjusted > self.max {
            adjusted = self.max - (self.max - adjusted).rem_euclid(octave);
        }
        // a max below 11 can push it under 0 again
        adjusted.clamp(0, self.max.clamp(0, u8::MAX as i64)) as u8
    }
}

#[test]
fn mean_lands_on_center() {
    let folder = PitchFolder::from_pitches([60, 72], CENTER_PITCH, MAX_PITCH).unwrap();
    assert_eq!(folder.offset(), -54);
    assert_eq!(folder.fold(66), 12);
    assert_eq!(folder.fold(60), 6);
    assert_eq!(folder.fold(72), 18);
}

#[test]
fn mean_is_rounded_half_up() {
    let folder = PitchFolder::from_pitches([60, 61], CENTER_PITCH, MAX_PITCH).unwrap();
    // 60.5 rounds to 61
    assert_eq!(folder.offset(), -49);
}

#[test]
fn folds_by_octaves() {
    let folder = PitchFolder::new(0, MAX_PITCH);
    assert_eq!(folder.fold(24), 24);
    assert_eq!(folder.fold(25), 13);
    assert_eq!(folder.fold(127), 19);
    assert_eq!(folder.fold(255), 15);

    let folder = PitchFolder::new(-100, MAX_PITCH);
    assert_eq!(folder.fold(0), 8);
    assert_eq!(folder.fold(99), 11);
}

#[test]
fn every_pitch_lands_in_range() {
    for offset in [-300, -64, -12, 0, 12, 200] {
        let folder = PitchFolder::new(offset, MAX_PITCH);
        for pitch in 0..=u8::MAX {
            assert!(folder.fold(pitch) <= 24, "{pitch} with offset {offset}");
        }
    }
}

#[test]
fn no_pitches_is_an_error() {
    assert!(PitchFolder::from_pitches([], CENTER_PITCH, MAX_PITCH).is_err());
}

#[test]
fn extreme_centers_stay_in_range() {
    for center in [i32::MIN, i32::MIN + 1, -1_000_000, 1_000_000, i32::MAX] {
        let folder = PitchFolder::from_pitches([60, 72], center, MAX_PITCH).unwrap();
        assert_eq!(folder.offset(), center as i64 - 66);
        for pitch in [0, 60, 66, 72, 127] {
            assert!(folder.fold(pitch) <= 24, "{pitch} centered on {center}");
        }
    }
    // the octave class survives the fold
    let folder = PitchFolder::from_pitches([66], i32::MAX, MAX_PITCH).unwrap();
    assert_eq!(folder.fold(66) as i64 % 12, (i32::MAX as i64) % 12);
    let folder = PitchFolder::from_pitches([66], i32::MIN, MAX_PITCH).unwrap();
    assert_eq!(folder.fold(66) as i64, (i32::MIN as i64).rem_euclid(12));
}
