//! Pitch classes, notes and intervals — the atoms everything else in this
//! crate is built from.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{letter_natural_pitch_class, FLAT_NAMES, SHARP_NAMES};
use crate::error::{ChordTheoryError, ChordTheoryResult};

/// An integer 0-11 (C = 0), wrapping modulo the chromatic octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Construct a pitch class, reducing `value` modulo 12.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Preferred spelling, sharps.
    #[must_use]
    pub fn sharp_name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }

    /// Preferred spelling, flats.
    #[must_use]
    pub fn flat_name(self) -> &'static str {
        FLAT_NAMES[self.0 as usize]
    }
}

impl std::ops::Add<i32> for PitchClass {
    type Output = Self;
    fn add(self, rhs: i32) -> Self {
        Self::new(i32::from(self.0) + rhs)
    }
}

impl std::ops::Sub for PitchClass {
    type Output = Interval;
    fn sub(self, rhs: Self) -> Interval {
        Interval::new(i32::from(self.0) - i32::from(rhs.0))
    }
}

/// A signed semitone count, not reduced modulo the octave — used for
/// describing the distance and direction between two pitch classes or
/// notes (e.g. "a perfect fifth above").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval(i32);

impl Interval {
    #[must_use]
    pub const fn new(semitones: i32) -> Self {
        Self(semitones)
    }

    #[must_use]
    pub const fn semitones(self) -> i32 {
        self.0
    }

    /// This interval reduced to the 0-11 range (its pitch-class distance).
    #[must_use]
    pub const fn reduced(self) -> u8 {
        self.0.rem_euclid(12) as u8
    }
}

/// An accidental attached to a note letter. Only single sharps/flats are
/// produced by the chord-symbol grammar (`#4.B`); double accidentals are
/// not part of the input syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    #[must_use]
    pub const fn offset(self) -> i32 {
        match self {
            Self::Natural => 0,
            Self::Sharp => 1,
            Self::Flat => -1,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Natural => "",
            Self::Sharp => "#",
            Self::Flat => "b",
        }
    }
}

/// A note: a letter name plus accidental, preserving enharmonic spelling,
/// with its pitch class derived from the two. `C#` and `Db` have the same
/// `pitch_class` but are distinct `Note` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub letter: char,
    pub accidental: Accidental,
    pitch_class: PitchClass,
}

impl Note {
    /// Construct a note from a letter (`'A'..='G'`, case-insensitive) and
    /// an accidental.
    ///
    /// # Errors
    /// Returns [`ChordTheoryError::UnparsableNote`] if `letter` is not a
    /// note letter.
    pub fn new(letter: char, accidental: Accidental) -> ChordTheoryResult<Self> {
        let upper = letter.to_ascii_uppercase();
        if !('A'..='G').contains(&upper) {
            return Err(ChordTheoryError::UnparsableNote {
                token: letter.to_string(),
            });
        }
        let base = letter_natural_pitch_class(upper);
        Ok(Self {
            letter: upper,
            accidental,
            pitch_class: PitchClass::new(base + accidental.offset()),
        })
    }

    #[must_use]
    pub const fn pitch_class(self) -> PitchClass {
        self.pitch_class
    }

    /// Build a `Note` directly from a pitch class, preferring the given
    /// spelling bias (sharp or flat). Used when a note must be
    /// synthesized rather than parsed (e.g. a derived Roman-numeral
    /// target, or a suggestion-engine candidate key tonic).
    #[must_use]
    pub fn from_pitch_class(pc: PitchClass, prefer_sharp: bool) -> Self {
        let name = if prefer_sharp {
            pc.sharp_name()
        } else {
            pc.flat_name()
        };
        let mut chars = name.chars();
        let letter = chars.next().unwrap_or('C');
        let accidental = match chars.next() {
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            _ => Accidental::Natural,
        };
        Self {
            letter,
            accidental,
            pitch_class: pc,
        }
    }

    /// Textual form, e.g. `"C#"`, `"Bb"`, `"F"`.
    #[must_use]
    pub fn symbol(self) -> String {
        format!("{}{}", self.letter, self.accidental.symbol())
    }

    /// Normalized symbol per the cache-fingerprint rule (§4.I / §4.B):
    /// uppercase root letter, flat-preferred accidental spelling.
    #[must_use]
    pub fn normalized_symbol(self) -> String {
        if matches!(self.accidental, Accidental::Sharp) {
            self.pitch_class.flat_name().to_string()
        } else {
            self.symbol()
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enharmonic_notes_share_pitch_class() {
        let cs = Note::new('C', Accidental::Sharp).unwrap();
        let db = Note::new('D', Accidental::Flat).unwrap();
        assert_eq!(cs.pitch_class(), db.pitch_class());
        assert_ne!(cs, db);
    }

    #[test]
    fn pitch_class_wraps_modulo_twelve() {
        assert_eq!(PitchClass::new(12).value(), 0);
        assert_eq!(PitchClass::new(-1).value(), 11);
        assert_eq!(PitchClass::new(13).value(), 1);
    }

    #[test]
    fn interval_between_pitch_classes() {
        let c = PitchClass::new(0);
        let g = PitchClass::new(7);
        assert_eq!((g - c).reduced(), 7);
        assert_eq!((c - g).reduced(), 5);
    }

    #[test]
    fn invalid_letter_rejected() {
        assert!(Note::new('H', Accidental::Natural).is_err());
    }

    #[test]
    fn normalized_symbol_prefers_flats() {
        let fs = Note::new('F', Accidental::Sharp).unwrap();
        assert_eq!(fs.normalized_symbol(), "Gb");
        let bf = Note::new('B', Accidental::Flat).unwrap();
        assert_eq!(bf.normalized_symbol(), "Bb");
    }

    #[test]
    fn from_pitch_class_round_trips() {
        let pc = PitchClass::new(6);
        let sharp_spelling = Note::from_pitch_class(pc, true);
        let flat_spelling = Note::from_pitch_class(pc, false);
        assert_eq!(sharp_spelling.pitch_class(), flat_spelling.pitch_class());
    }
}
