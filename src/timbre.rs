#![doc = r#"
The closed set of sounds the device can play, and the heuristics that pick
one from a free text instrument name.
"#]

use core::{fmt, str::FromStr};

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
A device timbre.

The discriminant is the byte written into MDMC records, so the order of
the variants is part of the format.

# Example
```rust
# use mdmc::prelude::*;
assert_eq!(u8::from(Timbre::Harp), 2);
assert_eq!(Timbre::try_from(16u8).unwrap(), Timbre::Pling);
assert!(Timbre::try_from(17u8).is_err());
```
"#]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum Timbre {
    /// Silence, also used by the terminator record
    Stop = 0,
    /// A note that makes no sound
    Nothing,
    /// The default sound
    Harp,
    /// Bass drum
    Basedrum,
    /// Snare drum
    Snare,
    /// Hi-hat
    Hat,
    /// Double bass
    Bass,
    /// Flute
    Flute,
    /// Bell
    Bell,
    /// Guitar
    Guitar,
    /// Chime
    Chime,
    /// Xylophone
    Xylophone,
    /// Iron xylophone
    IronXylophone,
    /// Cow bell
    CowBell,
    /// Didgeridoo
    Didgeridoo,
    /// Banjo
    Banjo,
    /// Electric piano
    Pling,
}

impl Timbre {
    /// Every timbre, in encoding order
    pub const ALL: [Timbre; 17] = [
        Timbre::Stop,
        Timbre::Nothing,
        Timbre::Harp,
        Timbre::Basedrum,
        Timbre::Snare,
        Timbre::Hat,
        Timbre::Bass,
        Timbre::Flute,
        Timbre::Bell,
        Timbre::Guitar,
        Timbre::Chime,
        Timbre::Xylophone,
        Timbre::IronXylophone,
        Timbre::CowBell,
        Timbre::Didgeridoo,
        Timbre::Banjo,
        Timbre::Pling,
    ];

    /// The byte this timbre is encoded as
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The device's name for this timbre
    pub const fn name(self) -> &'static str {
        match self {
            Timbre::Stop => "stop",
            Timbre::Nothing => "nothing",
            Timbre::Harp => "harp",
            Timbre::Basedrum => "basedrum",
            Timbre::Snare => "snare",
            Timbre::Hat => "hat",
            Timbre::Bass => "bass",
            Timbre::Flute => "flute",
            Timbre::Bell => "bell",
            Timbre::Guitar => "guitar",
            Timbre::Chime => "chime",
            Timbre::Xylophone => "xylophone",
            Timbre::IronXylophone => "iron_xylophone",
            Timbre::CowBell => "cow_bell",
            Timbre::Didgeridoo => "didgeridoo",
            Timbre::Banjo => "banjo",
            Timbre::Pling => "pling",
        }
    }
}

impl fmt::Display for Timbre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Timbre {
    type Err = UnknownTimbre;

    /// Parses a device name such as `iron_xylophone`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timbre::ALL
            .into_iter()
            .find(|timbre| timbre.name() == s)
            .ok_or_else(|| UnknownTimbre(s.to_string()))
    }
}

/// The string is not the name of a timbre
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown timbre \"{0}\"")]
pub struct UnknownTimbre(pub String);

/// Substring rules, checked in order. The first rule with a matching
/// needle wins.
///
/// `iron xylophone` and `cow bell` can never match: `xylophone` and `bell`
/// come first. Reordering them changes which byte existing names produce.
const RULES: &[(&[&str], Timbre)] = &[
    (&["harp", "piano"], Timbre::Harp),
    (&["basedrum"], Timbre::Basedrum),
    (&["snare", "drum"], Timbre::Snare),
    (&["hat"], Timbre::Hat),
    (&["bass"], Timbre::Bass),
    (&["flute", "wind", "whistle"], Timbre::Flute),
    (&["bell"], Timbre::Bell),
    (&["guitar", "banjo"], Timbre::Guitar),
    (&["chime"], Timbre::Chime),
    (&["xylophone"], Timbre::Xylophone),
    (&["iron xylophone"], Timbre::IronXylophone),
    (&["cow bell"], Timbre::CowBell),
    (&["didgeridoo"], Timbre::Didgeridoo),
    (&["pling", "synth", "choir"], Timbre::Pling),
];

/// Picks the timbre for an instrument name. Names matching no rule are
/// played on the [`Timbre::Harp`].
///
/// ```rust
/// # use mdmc::prelude::*;
/// assert_eq!(classify("Acoustic Grand Piano"), Timbre::Harp);
/// assert_eq!(classify("Slap Bass 1"), Timbre::Bass);
/// assert_eq!(classify(""), Timbre::Harp);
/// ```
pub fn classify(name: &str) -> Timbre {
    let name = name.to_lowercase();
    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| name.contains(needle)))
        .map(|(_, timbre)| *timbre)
        .unwrap_or(Timbre::Harp)
}

#[test]
fn indices_follow_device_order() {
    for (i, timbre) in Timbre::ALL.into_iter().enumerate() {
        assert_eq!(timbre.index() as usize, i);
        assert_eq!(Timbre::try_from(i as u8).unwrap(), timbre);
        assert_eq!(timbre.name().parse::<Timbre>().unwrap(), timbre);
    }
    assert_eq!(Timbre::Xylophone.index(), 10);
    assert_eq!(Timbre::IronXylophone.index(), 11);
}

#[test]
fn classify_rules() {
    let cases = [
        ("Piano", Timbre::Harp),
        ("Orchestral Harp", Timbre::Harp),
        ("BaseDrum", Timbre::Basedrum),
        ("Drums", Timbre::Snare),
        ("Snare", Timbre::Snare),
        ("Closed Hi-Hat", Timbre::Hat),
        ("Fretless Bass", Timbre::Bass),
        ("Pan Flute", Timbre::Flute),
        ("Woodwinds", Timbre::Flute),
        ("Whistle", Timbre::Flute),
        ("Tubular Bells", Timbre::Bell),
        ("Nylon Guitar", Timbre::Guitar),
        ("Banjo", Timbre::Guitar),
        ("Wind Chimes", Timbre::Flute),
        ("Chimes", Timbre::Chime),
        ("Xylophone", Timbre::Xylophone),
        ("Didgeridoo", Timbre::Didgeridoo),
        ("Synth Lead", Timbre::Pling),
        ("Choir Aahs", Timbre::Pling),
        ("Violin", Timbre::Harp),
        ("unknown", Timbre::Harp),
        ("", Timbre::Harp),
    ];
    for (name, expected) in cases {
        assert_eq!(classify(name), expected, "{name}");
    }
}

#[test]
fn earlier_rules_win() {
    // piano before synth, drum before bass
    assert_eq!(classify("Synth Piano"), Timbre::Harp);
    assert_eq!(classify("Bass Drum"), Timbre::Snare);
    assert_eq!(classify("Bell Guitar"), Timbre::Bell);
}

#[test]
fn shadowed_rules_never_match() {
    assert_eq!(classify("Iron Xylophone"), Timbre::Xylophone);
    assert_eq!(u8::from(classify("Iron Xylophone")), 10);
    assert_eq!(classify("Cow Bell"), Timbre::Bell);
}

#[test]
fn banjo_name_is_not_a_rule_output() {
    assert_ne!(classify("banjo"), Timbre::Banjo);
    assert_eq!("banjo".parse::<Timbre>().unwrap(), Timbre::Banjo);
}
