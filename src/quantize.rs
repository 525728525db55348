#![doc = r#"
Stretches note deltas onto the device's tick grid.

The device plays one step every tick (50ms by default). Rather than
rounding each delta on its own, the mean interval between notes is rounded
*up* to a whole number of ticks and every delta is scaled by the same
factor, so the piece keeps its rhythm and never plays faster than written.
"#]

use crate::{ConvertError, note::NoteEvent};

/// Milliseconds per device tick
pub const TICK_MILLIS: u32 = 50;

/// The outcome of [`quantize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Quantized {
    /// Every input delta, multiplied by `speed_multiplier`
    pub deltas: Vec<f64>,
    /// Sum of the rescaled deltas, rounded up to a millisecond
    pub duration_millis: u32,
    /// Mean of the positive input deltas
    pub raw_mean: f64,
    /// `raw_mean` rounded up to a whole tick
    pub rounded_mean: f64,
    /// `rounded_mean / raw_mean`, never below 1
    pub speed_multiplier: f64,
}

/// Rounds `millis` up to the next multiple of `tick_millis`
pub fn round_up_to_tick(millis: f64, tick_millis: u32) -> f64 {
    let tick = tick_millis as f64;
    (millis / tick).ceil() * tick
}

/// Rescales the deltas of `notes` so their mean lands on a whole tick.
///
/// Zero deltas (chords) are left out of the mean but are still scaled.
///
/// # Errors
/// [`ConvertError::InsufficientNotes`] when no delta is positive: a single
/// note, only simultaneous notes, or no notes at all.
pub fn quantize(notes: &[NoteEvent], tick_millis: u32) -> Result<Quantized, ConvertError> {
    let (sum, count) = notes
        .iter()
        .map(|note| note.delta_millis)
        .filter(|delta| *delta > 0.)
        .fold((0., 0usize), |(sum, count), delta| (sum + delta, count + 1));

    if count == 0 {
        return Err(ConvertError::InsufficientNotes);
    }

    let raw_mean = sum / count as f64;
    let rounded_mean = round_up_to_tick(raw_mean, tick_millis);
    let speed_multiplier = rounded_mean / raw_mean;

    let deltas: Vec<f64> = notes
        .iter()
        .map(|note| note.delta_millis * speed_multiplier)
        .collect();
    let duration_millis = deltas.iter().sum::<f64>().ceil() as u32;

    tracing::debug!(
        "Mean delta {raw_mean:.3}ms rounded to {rounded_mean}ms over {count} interval(s)"
    );

    Ok(Quantized {
        deltas,
        duration_millis,
        raw_mean,
        rounded_mean,
        speed_multiplier,
    })
}

#[cfg(test)]
fn notes(deltas: &[f64]) -> Vec<NoteEvent> {
    deltas
        .iter()
        .map(|delta| NoteEvent::new(60, "piano", *delta))
        .collect()
}

#[test]
fn rounds_up_never_down() {
    assert_eq!(round_up_to_tick(10.4, 50), 50.);
    assert_eq!(round_up_to_tick(50., 50), 50.);
    assert_eq!(round_up_to_tick(50.1, 50), 100.);
    assert_eq!(round_up_to_tick(99., 50), 100.);
}

#[test]
fn mean_of_positive_deltas_only() {
    let q = quantize(&notes(&[0., 20., 0., 30.]), 50).unwrap();
    assert_eq!(q.raw_mean, 25.);
    assert_eq!(q.rounded_mean, 50.);
    assert_eq!(q.speed_multiplier, 2.);
    assert_eq!(q.deltas, vec![0., 40., 0., 60.]);
    assert_eq!(q.duration_millis, 100);
}

#[test]
fn multiplier_is_one_on_the_grid() {
    let q = quantize(&notes(&[100., 200., 300.]), 50).unwrap();
    assert_eq!(q.raw_mean, 200.);
    assert_eq!(q.speed_multiplier, 1.);
    assert_eq!(q.deltas, vec![100., 200., 300.]);
    assert_eq!(q.duration_millis, 600);
}

#[test]
fn duration_is_rounded_up() {
    let q = quantize(&notes(&[0., 37.5, 37.5, 25.]), 50).unwrap();
    // mean 100/3 rounds to 50
    assert!((q.speed_multiplier - 1.5).abs() < 1e-9);
    assert!(q.rounded_mean >= q.raw_mean);

    let sum: f64 = q.deltas.iter().sum();
    assert!(q.duration_millis as f64 >= sum);
    assert!((q.duration_millis as f64) < sum + 1.);
}

#[test]
fn no_positive_delta_is_an_error() {
    assert!(matches!(
        quantize(&notes(&[0.]), 50),
        Err(ConvertError::InsufficientNotes)
    ));
    assert!(matches!(
        quantize(&notes(&[0., 0., 0.]), 50),
        Err(ConvertError::InsufficientNotes)
    ));
    assert!(quantize(&[], 50).unwrap_err().is_insufficient_notes());
}
