//! Static, process-wide music-theory tables (§4.A). No mutation after
//! initialization; everything here is either a `const` or a
//! lazily-computed, read-only map.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub use tonality_config::MUSICAL;

/// Sharp-preferred pitch-class names, indexed by pitch class 0-11.
pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat-preferred pitch-class names, indexed by pitch class 0-11.
pub const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Natural (no accidental) pitch class of each letter name.
#[must_use]
pub const fn letter_natural_pitch_class(letter: char) -> i32 {
    match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => 0,
    }
}

/// Chord-quality → semitone offsets from the root for each chord tone
/// slot. Slot numbers follow conventional scale-degree naming (3, 5) or,
/// for suspensions, the substituted degree (2, 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Power,
}

impl ChordQuality {
    /// `(slot, semitone offset from root)` pairs for this quality's triad
    /// (or dyad, for `Power`).
    #[must_use]
    pub const fn tones(self) -> &'static [(u8, i32)] {
        match self {
            Self::Major => &[(1, 0), (3, 4), (5, 7)],
            Self::Minor => &[(1, 0), (3, 3), (5, 7)],
            Self::Diminished => &[(1, 0), (3, 3), (5, 6)],
            Self::Augmented => &[(1, 0), (3, 4), (5, 8)],
            Self::Sus2 => &[(1, 0), (2, 2), (5, 7)],
            Self::Sus4 => &[(1, 0), (4, 5), (5, 7)],
            Self::Power => &[(1, 0), (5, 7)],
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Major => "",
            Self::Minor => "m",
            Self::Diminished => "dim",
            Self::Augmented => "aug",
            Self::Sus2 => "sus2",
            Self::Sus4 => "sus4",
            Self::Power => "5",
        }
    }
}

/// Seventh-variant → additional semitone offset from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SeventhType {
    None,
    Minor7,
    Major7,
    Diminished7,
    HalfDiminished7,
}

impl SeventhType {
    #[must_use]
    pub const fn offset(self) -> Option<i32> {
        match self {
            Self::None => None,
            Self::Minor7 | Self::HalfDiminished7 => Some(10),
            Self::Major7 => Some(11),
            Self::Diminished7 => Some(9),
        }
    }
}

/// Natural (unaltered) semitone offset of an extension degree, used both
/// to stack an explicit extension and as the base an alteration adjusts.
#[must_use]
pub const fn natural_extension_offset(degree: u8) -> Option<i32> {
    match degree {
        5 => Some(7),
        9 => Some(14),
        11 => Some(17),
        13 => Some(21),
        _ => None,
    }
}

/// The seven church modes, as an ordered rotation of the major scale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum ModeName {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl ModeName {
    /// All seven modes in rotation order, Ionian first.
    pub const ALL: [Self; 7] = [
        Self::Ionian,
        Self::Dorian,
        Self::Phrygian,
        Self::Lydian,
        Self::Mixolydian,
        Self::Aeolian,
        Self::Locrian,
    ];

    /// 0-based rotation index of this mode's tonic within the parent
    /// major scale (Ionian's tonic is the parent tonic itself).
    #[must_use]
    pub const fn degree_index(self) -> usize {
        match self {
            Self::Ionian => 0,
            Self::Dorian => 1,
            Self::Phrygian => 2,
            Self::Lydian => 3,
            Self::Mixolydian => 4,
            Self::Aeolian => 5,
            Self::Locrian => 6,
        }
    }

    #[must_use]
    pub const fn from_degree_index(index: usize) -> Self {
        match index % 7 {
            0 => Self::Ionian,
            1 => Self::Dorian,
            2 => Self::Phrygian,
            3 => Self::Lydian,
            4 => Self::Mixolydian,
            5 => Self::Aeolian,
            _ => Self::Locrian,
        }
    }

    /// Ordered 7-tuple of semitone offsets from the local tonic (§4.A).
    #[must_use]
    pub const fn interval_pattern(self) -> [i32; 7] {
        rotate(MAJOR_SCALE_PATTERN, self.degree_index())
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ionian => "Ionian",
            Self::Dorian => "Dorian",
            Self::Phrygian => "Phrygian",
            Self::Lydian => "Lydian",
            Self::Mixolydian => "Mixolydian",
            Self::Aeolian => "Aeolian",
            Self::Locrian => "Locrian",
        }
    }
}

/// Semitone offsets of the major scale from its own tonic.
pub const MAJOR_SCALE_PATTERN: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

const fn rotate(pattern: [i32; 7], start: usize) -> [i32; 7] {
    let root = pattern[start];
    let mut out = [0i32; 7];
    let mut i = 0;
    while i < 7 {
        let idx = (start + i) % 7;
        let raw = pattern[idx] - root;
        out[i] = if raw < 0 { raw + 12 } else { raw };
        i += 1;
    }
    out
}

/// Characteristic scale degree(s) per mode — the degree(s) whose
/// alteration relative to major distinguishes the mode (§4.A).
#[must_use]
pub fn characteristic_degrees(mode: ModeName) -> &'static [&'static str] {
    match mode {
        ModeName::Dorian => &["natural 6"],
        ModeName::Phrygian => &["flat 2"],
        ModeName::Lydian => &["sharp 4"],
        ModeName::Mixolydian => &["flat 7"],
        ModeName::Aeolian => &["flat 6"],
        ModeName::Locrian => &["flat 2", "flat 5"],
        ModeName::Ionian => &[],
    }
}

/// Roman-numeral degree names for major and minor keys (uppercase for
/// major/dominant-quality degrees, lowercase otherwise — casing is
/// applied by `roman::RomanNumeral`, this table only names the degree).
pub static ROMAN_NUMERAL_BASE: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "I"),
        (2, "II"),
        (3, "III"),
        (4, "IV"),
        (5, "V"),
        (6, "VI"),
        (7, "VII"),
    ])
});

/// Default chord quality for each major-key scale degree.
pub static MAJOR_KEY_DEGREE_QUALITY: Lazy<HashMap<u8, ChordQuality>> = Lazy::new(|| {
    HashMap::from([
        (1, ChordQuality::Major),
        (2, ChordQuality::Minor),
        (3, ChordQuality::Minor),
        (4, ChordQuality::Major),
        (5, ChordQuality::Major),
        (6, ChordQuality::Minor),
        (7, ChordQuality::Diminished),
    ])
});

/// Default chord quality for each natural-minor-key scale degree.
pub static MINOR_KEY_DEGREE_QUALITY: Lazy<HashMap<u8, ChordQuality>> = Lazy::new(|| {
    HashMap::from([
        (1, ChordQuality::Minor),
        (2, ChordQuality::Diminished),
        (3, ChordQuality::Major),
        (4, ChordQuality::Minor),
        (5, ChordQuality::Minor),
        (6, ChordQuality::Major),
        (7, ChordQuality::Major),
    ])
});

/// Degree → harmonic function mapping (§4.C.3). Identical shape for
/// major and minor keys per spec ("minor-key mapping analogous").
pub static DEGREE_FUNCTION: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "tonic"),
        (2, "predominant"),
        (3, "tonic"),
        (4, "predominant"),
        (5, "dominant"),
        (6, "tonic"),
        (7, "dominant"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sharp_and_flat_tables_agree_at_naturals() {
        for i in [0, 2, 4, 5, 7, 9, 11] {
            assert_eq!(SHARP_NAMES[i], FLAT_NAMES[i]);
        }
    }

    #[test]
    fn major_quality_is_major_triad() {
        assert_eq!(ChordQuality::Major.tones(), &[(1, 0), (3, 4), (5, 7)]);
    }

    #[test]
    fn mode_interval_patterns_match_spec() {
        assert_eq!(ModeName::Ionian.interval_pattern(), [0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(ModeName::Dorian.interval_pattern(), [0, 2, 3, 5, 7, 9, 10]);
        assert_eq!(
            ModeName::Phrygian.interval_pattern(),
            [0, 1, 3, 5, 7, 8, 10]
        );
        assert_eq!(ModeName::Lydian.interval_pattern(), [0, 2, 4, 6, 7, 9, 11]);
        assert_eq!(
            ModeName::Mixolydian.interval_pattern(),
            [0, 2, 4, 5, 7, 9, 10]
        );
        assert_eq!(ModeName::Aeolian.interval_pattern(), [0, 2, 3, 5, 7, 8, 10]);
        assert_eq!(
            ModeName::Locrian.interval_pattern(),
            [0, 1, 3, 5, 6, 8, 10]
        );
    }

    #[test]
    fn characteristic_degrees_are_populated() {
        assert_eq!(characteristic_degrees(ModeName::Dorian), &["natural 6"]);
        assert_eq!(
            characteristic_degrees(ModeName::Locrian),
            &["flat 2", "flat 5"]
        );
        assert!(characteristic_degrees(ModeName::Ionian).is_empty());
    }

    #[test]
    fn degree_function_mapping_matches_spec() {
        assert_eq!(DEGREE_FUNCTION[&1], "tonic");
        assert_eq!(DEGREE_FUNCTION[&2], "predominant");
        assert_eq!(DEGREE_FUNCTION[&5], "dominant");
        assert_eq!(DEGREE_FUNCTION[&7], "dominant");
    }
}
