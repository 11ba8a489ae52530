//! The `Chord` data structure (§3.1) and its derived pitch-class set.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{natural_extension_offset, ChordQuality, SeventhType};
use crate::error::{ChordTheoryError, ChordTheoryResult};
use crate::pitch::{Accidental, Note, PitchClass};

/// A chromatic alteration of an extension or the fifth: `(degree, accidental)`.
pub type Alteration = (u8, Accidental);

/// A parsed chord symbol (§3.1). Fully determined by `root`, `quality`,
/// `seventh`, `extensions` and `alterations`; `pitch_classes` is derived,
/// never stored independently, so the invariant "pitch classes are fully
/// determined by the other fields" cannot drift out of sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub root: Note,
    pub quality: ChordQuality,
    pub seventh: SeventhType,
    /// Extensions drawn from {9, 11, 13}, in ascending order.
    pub extensions: SmallVec<[u8; 3]>,
    /// Chromatic alterations, e.g. `(5, Accidental::Flat)` for a `b5`.
    pub alterations: SmallVec<[Alteration; 4]>,
    /// Bass note, present only when different from the root (slash chord).
    pub bass: Option<Note>,
    /// Original textual form, as given to the parser.
    pub symbol: String,
}

impl Chord {
    /// Construct a chord directly (bypassing the parser). `bass` equal to
    /// `root`'s pitch class is normalized away per the slash-chord
    /// tie-break rule (§4.B rule 5).
    #[must_use]
    pub fn new(
        root: Note,
        quality: ChordQuality,
        seventh: SeventhType,
        extensions: SmallVec<[u8; 3]>,
        alterations: SmallVec<[Alteration; 4]>,
        bass: Option<Note>,
        symbol: String,
    ) -> Self {
        let bass = bass.filter(|b| b.pitch_class() != root.pitch_class());
        Self {
            root,
            quality,
            seventh,
            extensions,
            alterations,
            bass,
            symbol,
        }
    }

    #[must_use]
    pub const fn is_slash_chord(&self) -> bool {
        self.bass.is_some()
    }

    /// Derived pitch-class set: root + quality offsets + seventh offset +
    /// extensions + alterations. The bass note is included only as the
    /// nominal lowest pitch class of a slash chord (§4.B "Output").
    #[must_use]
    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        let mut offsets: Vec<i32> = self.quality.tones().iter().map(|&(_, o)| o).collect();

        if let Some(offset) = self.seventh.offset() {
            offsets.push(offset);
        }

        for &degree in &self.extensions {
            if self.alterations.iter().any(|&(d, _)| d == degree) {
                continue; // the alteration supplies this degree's offset
            }
            if let Some(offset) = natural_extension_offset(degree) {
                offsets.push(offset);
            }
        }

        for &(degree, accidental) in &self.alterations {
            if degree == 5 {
                offsets.retain(|&o| o != 7);
            }
            if let Some(natural) = natural_extension_offset(degree) {
                offsets.push(natural + accidental.offset());
            }
        }

        let mut pitch_classes: Vec<PitchClass> = offsets
            .into_iter()
            .map(|o| self.root.pitch_class() + o)
            .collect();

        if let Some(bass) = self.bass {
            pitch_classes.push(bass.pitch_class());
        }

        pitch_classes.sort_unstable();
        pitch_classes.dedup();
        pitch_classes
    }

    /// Whether this chord's quality or seventh belongs to the diminished
    /// family (full or half-diminished) — used by the modal analyzer's
    /// Locrian check and the chromatic analyzer's `vii°/x` rule.
    #[must_use]
    pub const fn is_diminished_family(&self) -> bool {
        matches!(self.quality, ChordQuality::Diminished)
            || matches!(
                self.seventh,
                SeventhType::Diminished7 | SeventhType::HalfDiminished7
            )
    }

    /// Whether this chord's quality + seventh reads as dominant-functioning
    /// (major triad, with or without a minor seventh) — used by the
    /// secondary-dominant rule (§4.E).
    #[must_use]
    pub const fn is_dominant_functioning(&self) -> bool {
        matches!(self.quality, ChordQuality::Major)
            && matches!(self.seventh, SeventhType::None | SeventhType::Minor7)
    }

    /// # Errors
    /// Returns [`ChordTheoryError::EmptyInput`] if `symbol` is empty or
    /// all whitespace.
    pub fn reject_empty(symbol: &str) -> ChordTheoryResult<()> {
        if symbol.trim().is_empty() {
            return Err(ChordTheoryError::EmptyInput);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(letter: char, accidental: Accidental) -> Note {
        Note::new(letter, accidental).unwrap()
    }

    #[test]
    fn c_major_triad_pitch_classes() {
        let c = Chord::new(
            note('C', Accidental::Natural),
            ChordQuality::Major,
            SeventhType::None,
            SmallVec::new(),
            SmallVec::new(),
            None,
            "C".to_string(),
        );
        let pcs: Vec<u8> = c.pitch_classes().iter().map(|p| p.value()).collect();
        assert_eq!(pcs, vec![0, 4, 7]);
    }

    #[test]
    fn dominant_seventh_adds_minor_seventh() {
        let g7 = Chord::new(
            note('G', Accidental::Natural),
            ChordQuality::Major,
            SeventhType::Minor7,
            SmallVec::new(),
            SmallVec::new(),
            None,
            "G7".to_string(),
        );
        let pcs: Vec<u8> = g7.pitch_classes().iter().map(|p| p.value()).collect();
        assert_eq!(pcs, vec![5, 7, 11]);
    }

    #[test]
    fn flat_five_alteration_replaces_perfect_fifth() {
        let mut alterations = SmallVec::new();
        alterations.push((5u8, Accidental::Flat));
        let half_dim_ish = Chord::new(
            note('B', Accidental::Natural),
            ChordQuality::Minor,
            SeventhType::Minor7,
            SmallVec::new(),
            alterations,
            None,
            "Bm7b5".to_string(),
        );
        let pcs: Vec<u8> = half_dim_ish
            .pitch_classes()
            .iter()
            .map(|p| p.value())
            .collect();
        assert!(!pcs.contains(&6)); // perfect fifth (B+7=18 mod12=6) removed
        assert!(pcs.contains(&5)); // flat five (B+6=17 mod12=5)
    }

    #[test]
    fn slash_chord_normalizes_away_matching_bass() {
        let c_over_c = Chord::new(
            note('C', Accidental::Natural),
            ChordQuality::Major,
            SeventhType::None,
            SmallVec::new(),
            SmallVec::new(),
            Some(note('C', Accidental::Natural)),
            "C/C".to_string(),
        );
        assert!(!c_over_c.is_slash_chord());
    }

    #[test]
    fn slash_chord_keeps_distinct_bass() {
        let c_over_e = Chord::new(
            note('C', Accidental::Natural),
            ChordQuality::Major,
            SeventhType::None,
            SmallVec::new(),
            SmallVec::new(),
            Some(note('E', Accidental::Natural)),
            "C/E".to_string(),
        );
        assert!(c_over_e.is_slash_chord());
    }
}
