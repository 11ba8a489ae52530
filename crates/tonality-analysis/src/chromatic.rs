//! The chromatic analyzer (§4.E): secondary dominants, borrowed chords,
//! chromatic mediants.

use tonality_core::key::Key;
use tonality_core::roman::RomanNumeral;
use tonality_core::Chord;

use crate::error::{AnalysisError, AnalysisResult};

/// A secondary dominant, e.g. `A7` resolving to `Dm` as `V7/ii` (§3.1).
#[derive(Debug, Clone)]
pub struct SecondaryDominant {
    pub chord_index: usize,
    pub target_index: usize,
    pub roman: RomanNumeral,
}

/// A chord borrowed from the parallel mode (§4.E borrowed-chord rule).
#[derive(Debug, Clone)]
pub struct BorrowedChord {
    pub chord_index: usize,
    pub roman: RomanNumeral,
    pub borrowed_from: &'static str,
}

/// A chromatic mediant: a chord a third from the tonic sharing only one
/// common tone with the tonic triad (§4.E chromatic-mediant rule).
#[derive(Debug, Clone)]
pub struct ChromaticMediant {
    pub chord_index: usize,
    pub interval_from_tonic: &'static str,
}

/// Facts produced by the chromatic analyzer.
#[derive(Debug, Clone, Default)]
pub struct ChromaticResult {
    pub secondary_dominants: Vec<SecondaryDominant>,
    pub borrowed_chords: Vec<BorrowedChord>,
    pub chromatic_mediants: Vec<ChromaticMediant>,
}

impl ChromaticResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secondary_dominants.is_empty()
            && self.borrowed_chords.is_empty()
            && self.chromatic_mediants.is_empty()
    }
}

/// `analyze_chromatic` (§4.E contract).
///
/// # Errors
/// [`AnalysisError::EmptyProgression`] for an empty chord slice.
pub fn analyze_chromatic(chords: &[Chord], key: &Key) -> AnalysisResult<ChromaticResult> {
    if chords.is_empty() {
        return Err(AnalysisError::EmptyProgression);
    }

    let mut result = ChromaticResult::default();

    for i in 0..chords.len() {
        let chord = &chords[i];
        let is_diatonic = chord_is_diatonic(chord, key);

        if !is_diatonic {
            if let Some(dominant) = secondary_dominant_for(chords, i, key) {
                result.secondary_dominants.push(dominant);
                continue;
            }
            if let Some(borrowed) = borrowed_chord_for(chord, key, i) {
                result.borrowed_chords.push(borrowed);
                continue;
            }
        }

        if let Some(mediant) = chromatic_mediant_for(chord, key, i) {
            result.chromatic_mediants.push(mediant);
        }
    }

    Ok(result)
}

/// A chord is diatonic only when both its root *and* its quality match
/// the key's own scale-degree triad — a root that happens to sit on a
/// diatonic degree but with a borrowed quality (e.g. `Fm` in C major,
/// where IV is normally major) is not diatonic (§4.E borrowed-chord
/// rule depends on this distinction).
fn chord_is_diatonic(chord: &Chord, key: &Key) -> bool {
    key.degree_of(chord.root.pitch_class())
        .is_some_and(|degree| key.degree_quality(degree) == chord.quality)
}

/// A major or dominant-seventh chord (or a `vii°`) whose root sits a
/// perfect fifth above a diatonic target, itself non-diatonic, is a
/// secondary dominant targeting that degree (§4.E).
fn secondary_dominant_for(chords: &[Chord], index: usize, key: &Key) -> Option<SecondaryDominant> {
    let chord = &chords[index];
    if index + 1 >= chords.len() {
        return None;
    }
    let target = &chords[index + 1];
    if !chord_is_diatonic(target, key) {
        return None;
    }
    let target_degree = key.degree_of(target.root.pitch_class())?;

    let expected_dominant_root = target.root.pitch_class() + 7;
    let is_applied_dominant = chord.root.pitch_class() == expected_dominant_root && chord.is_dominant_functioning();

    let expected_leading_tone_root = target.root.pitch_class() + (-1);
    let is_applied_leading_tone =
        chord.root.pitch_class() == expected_leading_tone_root && chord.is_diminished_family();

    if !is_applied_dominant && !is_applied_leading_tone {
        return None;
    }

    let roman = RomanNumeral::build(
        5,
        chord.quality,
        chord.seventh,
        None,
        Some(target_degree),
        None,
    );

    Some(SecondaryDominant {
        chord_index: index,
        target_index: index + 1,
        roman,
    })
}

/// A chord diatonic to the parallel mode but not the current key is
/// borrowed from that parallel mode (§4.E).
fn borrowed_chord_for(chord: &Chord, key: &Key, index: usize) -> Option<BorrowedChord> {
    let parallel = key.parallel();
    if parallel.mode == key.mode {
        return None;
    }
    if !parallel.contains_pitch_class(chord.root.pitch_class()) {
        return None;
    }
    let degree = parallel.degree_of(chord.root.pitch_class())?;
    let roman = RomanNumeral::build(degree, chord.quality, chord.seventh, None, None, None);
    let borrowed_from = if matches!(key.mode, tonality_core::key::KeyMode::Major) {
        "parallel minor"
    } else {
        "parallel major"
    };
    Some(BorrowedChord {
        chord_index: index,
        roman,
        borrowed_from,
    })
}

/// A chord a major or minor third from the tonic, sharing exactly one
/// common tone with the tonic triad, is a chromatic mediant (§4.E).
fn chromatic_mediant_for(chord: &Chord, key: &Key, index: usize) -> Option<ChromaticMediant> {
    let interval = (chord.root.pitch_class() - key.tonic.pitch_class()).reduced();
    let label = match interval {
        3 => "minor third above",
        4 => "major third above",
        8 => "minor third below",
        9 => "major third below",
        _ => return None,
    };

    let tonic_triad = tonic_triad_pitch_classes(key);
    let chord_tones = chord.pitch_classes();
    let common_tones = chord_tones
        .iter()
        .filter(|pc| tonic_triad.contains(pc))
        .count();

    if common_tones == 1 {
        Some(ChromaticMediant {
            chord_index: index,
            interval_from_tonic: label,
        })
    } else {
        None
    }
}

fn tonic_triad_pitch_classes(key: &Key) -> Vec<tonality_core::pitch::PitchClass> {
    let quality = key.degree_quality(1);
    quality
        .tones()
        .iter()
        .map(|&(_, offset)| key.tonic.pitch_class() + offset)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonality_core::key::Key;
    use tonality_core::parser::parse;
    use tonality_core::pitch::{Accidental, Note};

    fn chords(symbols: &[&str]) -> Vec<Chord> {
        symbols.iter().map(|s| parse(s).unwrap()).collect()
    }

    fn c_major() -> Key {
        Key::major(Note::new('C', Accidental::Natural).unwrap())
    }

    #[test]
    fn a7_resolving_to_dm_is_secondary_dominant_of_ii() {
        let progression = chords(&["C", "A7", "Dm", "G7", "C"]);
        let result = analyze_chromatic(&progression, &c_major()).unwrap();
        assert_eq!(result.secondary_dominants.len(), 1);
        let dominant = &result.secondary_dominants[0];
        assert_eq!(dominant.chord_index, 1);
        assert_eq!(dominant.target_index, 2);
        assert_eq!(dominant.roman.text, "V7/ii");
    }

    #[test]
    fn empty_progression_is_an_error() {
        assert!(matches!(
            analyze_chromatic(&[], &c_major()),
            Err(AnalysisError::EmptyProgression)
        ));
    }

    #[test]
    fn fully_diatonic_progression_has_no_chromatic_facts() {
        let progression = chords(&["C", "F", "G", "C"]);
        let result = analyze_chromatic(&progression, &c_major()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn borrowed_minor_iv_from_parallel_minor() {
        // Fm in C major is borrowed from C (parallel) minor's iv.
        let progression = chords(&["C", "Fm", "C"]);
        let result = analyze_chromatic(&progression, &c_major()).unwrap();
        assert!(result
            .borrowed_chords
            .iter()
            .any(|b| b.borrowed_from == "parallel minor"));
    }

    #[test]
    fn e_major_is_a_chromatic_mediant_of_c_major() {
        // E major (E G# B) shares only the pitch class E with the C-major
        // tonic triad (C E G), and its root is already diatonic to C major
        // (the mediant scale degree), so this is a mediant, not a borrowed
        // chord or secondary dominant.
        let progression = chords(&["C", "E", "C"]);
        let result = analyze_chromatic(&progression, &c_major()).unwrap();
        assert!(!result.chromatic_mediants.is_empty());
    }
}
