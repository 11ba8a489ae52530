//! The modal analyzer (§4.D): tonic hypothesis, parent-key derivation,
//! mode identification, characteristic-degree detection.

use tonality_core::constants::ModeName;
use tonality_core::key::Key;
use tonality_core::pitch::{Note, PitchClass};
use tonality_core::Chord;

use crate::cadence::CadenceType;
use crate::common::{Classification, ParentKeyRelationship};
use crate::error::{AnalysisError, AnalysisResult};

/// Facts produced by the modal analyzer.
#[derive(Debug, Clone)]
pub struct ModalResult {
    pub local_tonic: Note,
    pub mode: ModeName,
    pub key: Key,
    pub parent_key_relationship: ParentKeyRelationship,
    pub classification: Classification,
    /// Number of chords built on the mode's characteristic degree, with
    /// the quality that degree takes in this mode (§4.G.2: "one piece
    /// per characteristic chord matched").
    pub characteristic_chord_count: usize,
    /// The modal cadence found, if any: ♭VII-I (`Modal`) or ♭II-I
    /// (`Phrygian`), each carrying its own intrinsic strength.
    pub modal_cadence: Option<CadenceType>,
    /// Whether the local tonic both opens and closes the progression
    /// (§4.G.2's structural-evidence gate: "first ∧ last").
    pub tonic_frames: bool,
    pub raw_confidence: f64,
}

/// `analyze_modally` (§4.D contract).
///
/// # Errors
/// [`AnalysisError::EmptyProgression`] for an empty chord slice.
pub fn analyze_modally(chords: &[Chord], supplied_parent: Option<Key>) -> AnalysisResult<ModalResult> {
    if chords.is_empty() {
        return Err(AnalysisError::EmptyProgression);
    }

    let local_tonic = infer_local_tonic(chords);
    let (mode, key) = best_mode_for_tonic(chords, local_tonic);
    let tonic_frames = chords[0].root.pitch_class() == local_tonic.pitch_class()
        && chords[chords.len() - 1].root.pitch_class() == local_tonic.pitch_class();

    let parent_key_relationship = supplied_parent.map_or(ParentKeyRelationship::None, |parent| {
        if parent.parent_key_tonic().pitch_class() == key.parent_key_tonic().pitch_class() {
            ParentKeyRelationship::Matches
        } else {
            ParentKeyRelationship::Conflicts
        }
    });

    let characteristic_chord_count = count_characteristic_chords(chords, &key, mode);
    let modal_cadence = find_modal_cadence(chords, &key);
    let has_characteristic_motion = characteristic_chord_count > 0 || modal_cadence.is_some();

    let classification = if matches!(parent_key_relationship, ParentKeyRelationship::Matches) {
        // A progression diatonic to its own stated parent key, with no
        // characteristic modal motion, is just diatonic — agreeing with
        // the parent key isn't itself evidence of modality (§4.D.5).
        if has_characteristic_motion {
            Classification::ModalBorrowing
        } else {
            Classification::Diatonic
        }
    } else if has_characteristic_motion {
        Classification::ModalCandidate
    } else {
        Classification::Diatonic
    };

    let diatonic_count = chords
        .iter()
        .filter(|c| key.contains_pitch_class(c.root.pitch_class()))
        .count();
    let diatonic_fraction = diatonic_count as f64 / chords.len() as f64;
    let mut raw_confidence = diatonic_fraction;
    if characteristic_chord_count > 0 {
        raw_confidence += 0.15;
    }
    if modal_cadence.is_some() {
        raw_confidence += 0.1;
    }
    let raw_confidence = raw_confidence.clamp(0.0, 1.0);

    Ok(ModalResult {
        local_tonic,
        mode,
        key,
        parent_key_relationship,
        classification,
        characteristic_chord_count,
        modal_cadence,
        tonic_frames,
        raw_confidence,
    })
}

/// First and last chord roots are the strongest tonic hypotheses
/// (§4.D.1); ties favor the final chord, since a modal piece typically
/// closes on its tonic.
fn infer_local_tonic(chords: &[Chord]) -> Note {
    let first = &chords[0];
    let last = chords[chords.len() - 1];
    if first.root.pitch_class() == last.root.pitch_class() {
        first.root
    } else {
        last.root
    }
}

/// For a fixed local tonic, find the church mode whose diatonic
/// collection covers the most chord roots in the progression.
fn best_mode_for_tonic(chords: &[Chord], tonic: Note) -> (ModeName, Key) {
    let mut best: Option<(ModeName, Key, usize)> = None;
    for mode in ModeName::ALL {
        let key = Key::church(tonic, mode);
        let covered = chords
            .iter()
            .filter(|c| key.contains_pitch_class(c.root.pitch_class()))
            .count();
        if best.as_ref().is_none_or(|&(_, _, b)| covered > b) {
            best = Some((mode, key, covered));
        }
    }
    best.map_or_else(
        || (ModeName::Ionian, Key::church(tonic, ModeName::Ionian)),
        |(mode, key, _)| (mode, key),
    )
}

/// A chord built on the mode's characteristic degree, with the quality
/// that degree takes in this mode, counts as direct modal evidence
/// (§4.D.3) — e.g. a major IV in Lydian (raised 4th), a minor v in
/// Dorian/Phrygian/Aeolian (as opposed to the major V of the parallel
/// major key).
fn count_characteristic_chords(chords: &[Chord], key: &Key, mode: ModeName) -> usize {
    let degree = match mode {
        ModeName::Dorian | ModeName::Aeolian => 6,
        ModeName::Phrygian | ModeName::Locrian => 2,
        ModeName::Lydian => 4,
        ModeName::Mixolydian => 7,
        ModeName::Ionian => return 0,
    };
    let expected_pc = key.degree_pitch_class(degree);
    let expected_quality = key.degree_quality(degree);
    chords
        .iter()
        .filter(|c| c.root.pitch_class() == expected_pc && c.quality == expected_quality)
        .count()
}

/// A ♭VII-I (`Modal`) or ♭II-I (`Phrygian`) cadential motion not
/// explainable by the parallel major/minor key, per §4.D.4's modal
/// cadence check. Both read the candidate's degree against the mode's
/// *own* diatonic collection, so "♭VII" and "♭II" here mean the mode's
/// regular second/seventh degree, not an additional accidental.
fn find_modal_cadence(chords: &[Chord], key: &Key) -> Option<CadenceType> {
    for pair in chords.windows(2) {
        let (a, b): (&Chord, &Chord) = (&pair[0], &pair[1]);
        if b.root.pitch_class() != key.tonic.pitch_class() {
            continue;
        }
        let a_degree = key.degree_of(a.root.pitch_class());
        if matches!(a_degree, Some(7)) && is_whole_step_below(a.root.pitch_class(), key.tonic.pitch_class()) {
            return Some(CadenceType::Modal);
        }
        if matches!(a_degree, Some(2)) && is_half_step_above(a.root.pitch_class(), key.tonic.pitch_class()) {
            return Some(CadenceType::Phrygian);
        }
    }
    None
}

fn is_whole_step_below(candidate: PitchClass, tonic: PitchClass) -> bool {
    (tonic - candidate).reduced() == 2
}

fn is_half_step_above(candidate: PitchClass, tonic: PitchClass) -> bool {
    (candidate - tonic).reduced() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonality_core::parser::parse;

    fn chords(symbols: &[&str]) -> Vec<Chord> {
        symbols.iter().map(|s| parse(s).unwrap()).collect()
    }

    #[test]
    fn g_mixolydian_progression_is_detected() {
        let progression = chords(&["G", "F", "C", "G"]);
        let result = analyze_modally(&progression, None).unwrap();
        assert_eq!(result.local_tonic.pitch_class().value(), 7);
        assert!(matches!(result.mode, ModeName::Mixolydian));
    }

    #[test]
    fn dorian_progression_has_characteristic_minor_sixth_chord() {
        // D Dorian: D Em F G Am Bdim C, with a B minor chord (vi) signaling
        // the natural sixth that distinguishes Dorian from D Aeolian/minor.
        let progression = chords(&["Dm", "Bm", "C", "Dm"]);
        let result = analyze_modally(&progression, None).unwrap();
        assert_eq!(result.local_tonic.pitch_class().value(), 2);
    }

    #[test]
    fn empty_progression_is_an_error() {
        assert!(matches!(
            analyze_modally(&[], None),
            Err(AnalysisError::EmptyProgression)
        ));
    }

    #[test]
    fn supplied_parent_matching_is_reported() {
        let progression = chords(&["G", "F", "C", "G"]);
        let c_major = Key::major(Note::new('C', tonality_core::pitch::Accidental::Natural).unwrap());
        let result = analyze_modally(&progression, Some(c_major)).unwrap();
        assert!(matches!(
            result.parent_key_relationship,
            ParentKeyRelationship::Matches
        ));
        assert!(matches!(result.classification, Classification::ModalBorrowing));
    }
}
