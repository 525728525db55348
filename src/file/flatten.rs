#![doc = r#"
Merges every track of a file into one time ordered stream.

Each track keeps its own clock, instrument name and tempo. These are
threaded through the track as a [`TrackState`], one [`TrackState::step`]
per event, so every [`AnnotatedEvent`] carries the state that was active
when it occurred.

```text
track A: name "Piano" @0 ── note @0 ──────────── note @20
track B: tempo @0 ──────────────── note @10
merged:  name @0, note @0, tempo @0, note @10, note @20
```

Ties keep the order of the input: earlier tracks first, then stream order.
"#]

use std::sync::Arc;

use crate::{
    file::{META_SET_TEMPO, META_TRACK_NAME, RawEvent, RawEventKind},
    tempo::Tempo,
};

/// Instrument name used by tracks that never name themselves
pub const UNKNOWN_INSTRUMENT: &str = "unknown";

/// A [`RawEvent`] stamped with the track state at the moment it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedEvent {
    /// Ticks since the start of the track
    pub time: u64,
    /// The last track name seen in this track
    pub instrument: Arc<str>,
    /// The last tempo seen in this track
    pub tempo: Tempo,
    /// The event itself
    pub event: RawEvent,
}

/// Running state of a single track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackState {
    time: u64,
    instrument: Arc<str>,
    tempo: Tempo,
}

impl Default for TrackState {
    fn default() -> Self {
        Self {
            time: 0,
            instrument: Arc::from(UNKNOWN_INSTRUMENT),
            tempo: Tempo::DEFAULT,
        }
    }
}

impl TrackState {
    /// Ticks the next event will be stamped with
    pub const fn time(&self) -> u64 {
        self.time
    }

    /// Current instrument name
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Current tempo
    pub const fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Annotates `event` and returns the state the next event sees.
    ///
    /// Meta events update the instrument or tempo before being stamped,
    /// while the clock only advances after stamping, so an event's time is
    /// the sum of the deltas that came before it.
    pub fn step(self, event: RawEvent) -> (Self, AnnotatedEvent) {
        let Self {
            time,
            mut instrument,
            mut tempo,
        } = self;

        if let RawEventKind::Meta { meta_type, data } = &event.kind {
            match *meta_type {
                META_TRACK_NAME => instrument = Arc::from(data.as_text()),
                META_SET_TEMPO => match data.as_integer() {
                    Some(value) => tempo = Tempo::new(value),
                    None => {
                        tracing::warn!("Ignoring non-numeric tempo payload {data:?} at tick {time}")
                    }
                },
                _ => {}
            }
        }

        let next = Self {
            time: time + event.delta_ticks as u64,
            instrument: Arc::clone(&instrument),
            tempo,
        };
        let annotated = AnnotatedEvent {
            time,
            instrument,
            tempo,
            event,
        };
        (next, annotated)
    }
}

/// Annotates the events of one track, in order.
pub fn annotate_track<I>(events: I) -> Vec<AnnotatedEvent>
where
    I: IntoIterator<Item = RawEvent>,
{
    events
        .into_iter()
        .scan(TrackState::default(), |state, event| {
            let (next, annotated) = core::mem::take(state).step(event);
            *state = next;
            Some(annotated)
        })
        .collect()
}

/// Annotates every track and merges them into one stream sorted by time.
///
/// The sort is stable: events sharing a tick stay in track order, then in
/// stream order.
pub fn flatten<T, I>(tracks: T) -> Vec<AnnotatedEvent>
where
    T: IntoIterator<Item = I>,
    I: IntoIterator<Item = RawEvent>,
{
    let mut merged: Vec<AnnotatedEvent> = tracks.into_iter().flat_map(annotate_track).collect();
    merged.sort_by_key(|event| event.time);
    tracing::debug!("Flattened {} events", merged.len());
    merged
}

#[cfg(test)]
fn times(events: &[AnnotatedEvent]) -> Vec<u64> {
    events.iter().map(|e| e.time).collect()
}

#[test]
fn clock_advances_after_stamping() {
    let track = vec![
        RawEvent::note_on(5, 60, 100),
        RawEvent::note_on(10, 62, 100),
        RawEvent::note_on(0, 64, 100),
    ];
    let annotated = annotate_track(track);
    assert_eq!(times(&annotated), vec![0, 5, 15]);
}

#[test]
fn meta_events_apply_to_themselves_and_after() {
    let track = vec![
        RawEvent::note_on(0, 60, 100),
        RawEvent::track_name(0, "Flute"),
        RawEvent::tempo(0, 250_000),
        RawEvent::note_on(0, 62, 100),
    ];
    let annotated = annotate_track(track);

    assert_eq!(&*annotated[0].instrument, UNKNOWN_INSTRUMENT);
    assert_eq!(annotated[0].tempo, Tempo::DEFAULT);

    assert_eq!(&*annotated[1].instrument, "Flute");
    assert_eq!(annotated[1].tempo, Tempo::DEFAULT);

    assert_eq!(annotated[2].tempo, Tempo::new(250_000));
    assert_eq!(&*annotated[3].instrument, "Flute");
    assert_eq!(annotated[3].tempo, Tempo::new(250_000));
}

#[test]
fn state_does_not_leak_between_tracks() {
    let a = vec![RawEvent::track_name(0, "Bass"), RawEvent::tempo(0, 1_000)];
    let b = vec![RawEvent::note_on(0, 40, 1)];
    let merged = flatten([a, b]);
    let note = merged.last().unwrap();
    assert_eq!(&*note.instrument, UNKNOWN_INSTRUMENT);
    assert_eq!(note.tempo, Tempo::DEFAULT);
}

#[test]
fn merge_is_stable_by_time() {
    let a = vec![
        RawEvent::note_on(0, 1, 1),
        RawEvent::note_on(20, 2, 1),
        RawEvent::note_on(0, 3, 1),
    ];
    let b = vec![RawEvent::note_on(10, 4, 1), RawEvent::note_on(10, 5, 1)];
    let merged = flatten([a, b]);

    let pitches: Vec<u8> = merged
        .iter()
        .map(|e| e.event.note_data().unwrap().0)
        .collect();
    assert_eq!(times(&merged), vec![0, 0, 0, 10, 20]);
    assert_eq!(pitches, vec![1, 2, 4, 5, 3]);
}

#[test]
fn malformed_tempo_keeps_previous_value() {
    let track = vec![
        RawEvent::tempo(0, 400_000),
        RawEvent::meta(0, META_SET_TEMPO, crate::file::MetaData::Text("fast".into())),
        RawEvent::note_on(0, 60, 100),
    ];
    let annotated = annotate_track(track);
    assert_eq!(annotated[2].tempo, Tempo::new(400_000));
}

#[test]
fn step_returns_the_state_the_next_event_sees() {
    let state = TrackState::default();
    assert_eq!(state.time(), 0);
    assert_eq!(state.instrument(), UNKNOWN_INSTRUMENT);
    assert_eq!(state.tempo(), Tempo::DEFAULT);

    let (state, annotated) = state.step(RawEvent::track_name(30, "Organ"));
    assert_eq!(annotated.time, 0);
    assert_eq!(state.time(), 30);
    assert_eq!(state.instrument(), "Organ");

    let (state, annotated) = state.step(RawEvent::tempo(12, 600_000));
    assert_eq!(annotated.time, 30);
    assert_eq!(state.time(), 42);
    assert_eq!(state.instrument(), "Organ");
    assert_eq!(state.tempo(), Tempo::new(600_000));
}
