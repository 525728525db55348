use std::borrow::Cow;

/// Status nibble of a note-off event
pub const NOTE_OFF: u8 = 8;
/// Status nibble of a note-on event
pub const NOTE_ON: u8 = 9;
/// Status byte of a meta event
pub const META: u8 = 255;

/// Meta type of the sequence/track name event
pub const META_TRACK_NAME: u8 = 3;
/// Meta type of the set tempo event
pub const META_SET_TEMPO: u8 = 81;

#[doc = r#"
One event of a track, as handed over by the MIDI parser.

`delta_ticks` counts the ticks since the previous event of the same track.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Ticks since the previous event in the track
    pub delta_ticks: u32,
    /// What happened
    pub kind: RawEventKind,
}

/// The payload of a [`RawEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEventKind {
    /// A key was struck. A velocity of 0 is a note-off in disguise.
    NoteOn {
        /// Note number
        pitch: u8,
        /// Strike velocity
        velocity: u8,
    },
    /// A key was released
    NoteOff {
        /// Note number
        pitch: u8,
        /// Release velocity
        velocity: u8,
    },
    /// A meta event (status `0xFF`)
    Meta {
        /// The meta type byte, `3` for track names, `81` for tempo changes
        meta_type: u8,
        /// The decoded payload
        data: MetaData,
    },
    /// Anything else: controllers, program changes, sysex...
    Other {
        /// Status nibble for channel messages, status byte otherwise
        event_type: u8,
    },
}

impl RawEvent {
    /// Create a new raw event
    pub const fn new(delta_ticks: u32, kind: RawEventKind) -> Self {
        Self { delta_ticks, kind }
    }

    /// A note-on event
    pub const fn note_on(delta_ticks: u32, pitch: u8, velocity: u8) -> Self {
        Self::new(delta_ticks, RawEventKind::NoteOn { pitch, velocity })
    }

    /// A note-off event
    pub const fn note_off(delta_ticks: u32, pitch: u8) -> Self {
        Self::new(
            delta_ticks,
            RawEventKind::NoteOff {
                pitch,
                velocity: 0,
            },
        )
    }

    /// A meta event
    pub const fn meta(delta_ticks: u32, meta_type: u8, data: MetaData) -> Self {
        Self::new(delta_ticks, RawEventKind::Meta { meta_type, data })
    }

    /// A track name meta event
    pub fn track_name(delta_ticks: u32, name: impl Into<String>) -> Self {
        Self::meta(delta_ticks, META_TRACK_NAME, MetaData::Text(name.into()))
    }

    /// A set tempo meta event
    pub const fn tempo(delta_ticks: u32, micros_per_quarter_note: u32) -> Self {
        Self::meta(
            delta_ticks,
            META_SET_TEMPO,
            MetaData::Integer(micros_per_quarter_note),
        )
    }

    /// Returns the numeric event type: `9` for note-on, `8` for note-off,
    /// `255` for meta events.
    pub const fn event_type(&self) -> u8 {
        match &self.kind {
            RawEventKind::NoteOn { .. } => NOTE_ON,
            RawEventKind::NoteOff { .. } => NOTE_OFF,
            RawEventKind::Meta { .. } => META,
            RawEventKind::Other { event_type } => *event_type,
        }
    }

    /// Returns the meta type if this is a meta event
    pub const fn meta_type(&self) -> Option<u8> {
        match &self.kind {
            RawEventKind::Meta { meta_type, .. } => Some(*meta_type),
            _ => None,
        }
    }

    /// Returns `(pitch, velocity)` for note events
    pub const fn note_data(&self) -> Option<(u8, u8)> {
        match self.kind {
            RawEventKind::NoteOn { pitch, velocity } | RawEventKind::NoteOff { pitch, velocity } => {
                Some((pitch, velocity))
            }
            _ => None,
        }
    }

    pub(crate) fn from_midly(event: &midly::TrackEvent<'_>) -> Self {
        use midly::{MetaMessage, MidiMessage, TrackEventKind};

        let kind = match event.kind {
            TrackEventKind::Midi { message, .. } => match message {
                MidiMessage::NoteOn { key, vel } => RawEventKind::NoteOn {
                    pitch: key.as_int(),
                    velocity: vel.as_int(),
                },
                MidiMessage::NoteOff { key, vel } => RawEventKind::NoteOff {
                    pitch: key.as_int(),
                    velocity: vel.as_int(),
                },
                MidiMessage::Aftertouch { .. } => RawEventKind::Other { event_type: 0xA },
                MidiMessage::Controller { .. } => RawEventKind::Other { event_type: 0xB },
                MidiMessage::ProgramChange { .. } => RawEventKind::Other { event_type: 0xC },
                MidiMessage::ChannelAftertouch { .. } => RawEventKind::Other { event_type: 0xD },
                MidiMessage::PitchBend { .. } => RawEventKind::Other { event_type: 0xE },
            },
            TrackEventKind::SysEx(_) => RawEventKind::Other { event_type: 0xF0 },
            TrackEventKind::Escape(_) => RawEventKind::Other { event_type: 0xF7 },
            TrackEventKind::Meta(meta) => {
                let (meta_type, data) = match meta {
                    MetaMessage::TrackName(name) => (META_TRACK_NAME, MetaData::from_text(name)),
                    MetaMessage::Tempo(tempo) => (META_SET_TEMPO, MetaData::Integer(tempo.as_int())),
                    MetaMessage::TrackNumber(number) => (
                        0x00,
                        number.map_or(MetaData::Bytes(Vec::new()), |n| MetaData::Integer(n.into())),
                    ),
                    MetaMessage::Text(text) => (0x01, MetaData::from_text(text)),
                    MetaMessage::Copyright(text) => (0x02, MetaData::from_text(text)),
                    MetaMessage::InstrumentName(text) => (0x04, MetaData::from_text(text)),
                    MetaMessage::Lyric(text) => (0x05, MetaData::from_text(text)),
                    MetaMessage::Marker(text) => (0x06, MetaData::from_text(text)),
                    MetaMessage::CuePoint(text) => (0x07, MetaData::from_text(text)),
                    MetaMessage::ProgramName(text) => (0x08, MetaData::from_text(text)),
                    MetaMessage::DeviceName(text) => (0x09, MetaData::from_text(text)),
                    MetaMessage::MidiChannel(_) => (0x20, MetaData::Bytes(Vec::new())),
                    MetaMessage::MidiPort(_) => (0x21, MetaData::Bytes(Vec::new())),
                    MetaMessage::EndOfTrack => (0x2F, MetaData::Bytes(Vec::new())),
                    MetaMessage::SmpteOffset(_) => (0x54, MetaData::Bytes(Vec::new())),
                    MetaMessage::TimeSignature(n, d, c, b) => {
                        (0x58, MetaData::Bytes(vec![n, d, c, b]))
                    }
                    MetaMessage::KeySignature(k, minor) => {
                        (0x59, MetaData::Bytes(vec![k as u8, minor as u8]))
                    }
                    MetaMessage::SequencerSpecific(data) => (0x7F, MetaData::Bytes(data.to_vec())),
                    MetaMessage::Unknown(meta_type, data) => {
                        (meta_type, MetaData::Bytes(data.to_vec()))
                    }
                };
                RawEventKind::Meta { meta_type, data }
            }
        };

        Self::new(event.delta.as_int(), kind)
    }
}

#[doc = r#"
Decoded payload of a meta event.

Payloads are not validated. A track name stored as raw bytes or a tempo
with the wrong length flows through as [`MetaData::Bytes`] and is read
leniently by [`MetaData::as_text`] and [`MetaData::as_integer`].
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaData {
    /// Text events such as the track name
    Text(String),
    /// Integer payloads such as the tempo
    Integer(u32),
    /// Anything else, undecoded
    Bytes(Vec<u8>),
}

impl MetaData {
    fn from_text(bytes: &[u8]) -> Self {
        Self::Text(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Reads the payload as text.
    ///
    /// Integers are printed in decimal and bytes decoded as lossy UTF-8.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Integer(value) => Cow::Owned(value.to_string()),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    /// Reads the payload as an integer.
    ///
    /// Bytes are read big-endian, keeping the low 32 bits. Text is parsed
    /// as a decimal number and is `None` when that fails.
    pub fn as_integer(&self) -> Option<u32> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Bytes(bytes) => Some(
                bytes
                    .iter()
                    .fold(0u32, |acc, byte| (acc << 8) | *byte as u32),
            ),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[test]
fn event_types_follow_status_nibbles() {
    assert_eq!(RawEvent::note_on(0, 60, 100).event_type(), 9);
    assert_eq!(RawEvent::note_off(0, 60).event_type(), 8);
    let tempo = RawEvent::tempo(0, 500_000);
    assert_eq!(tempo.event_type(), 255);
    assert_eq!(tempo.meta_type(), Some(81));
    assert_eq!(RawEvent::track_name(0, "Flute").meta_type(), Some(3));
    assert_eq!(RawEvent::note_on(0, 60, 100).note_data(), Some((60, 100)));
    assert_eq!(tempo.note_data(), None);
}

#[test]
fn lenient_meta_views() {
    assert_eq!(MetaData::Bytes(vec![0x07, 0xA1, 0x20]).as_integer(), Some(500_000));
    assert_eq!(MetaData::Bytes(vec![]).as_integer(), Some(0));
    assert_eq!(MetaData::Text("Choir".into()).as_integer(), None);
    assert_eq!(MetaData::Bytes(b"Bass".to_vec()).as_text(), "Bass");
    assert_eq!(MetaData::Integer(42).as_text(), "42");
}
