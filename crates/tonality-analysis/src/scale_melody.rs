//! The scale and melody analyzer (§4.F): parent-scale identification for
//! a note set, and tonic inference for an ordered melodic sequence.

use std::collections::{HashMap, HashSet};

use tonality_core::constants::ModeName;
use tonality_core::key::Key;
use tonality_core::pitch::{Note, PitchClass};

use crate::common::Classification;
use crate::error::{AnalysisError, AnalysisResult};

/// Facts produced by analyzing a bare note set (§4.F scale input).
#[derive(Debug, Clone)]
pub struct ScaleAnalysisResult {
    /// Every major-key diatonic collection whose scale is a superset of
    /// the input note set.
    pub parent_keys: Vec<Key>,
    /// Naming each scale degree of the representative parent key
    /// (the lowest-pitch-class match, when several qualify) as a modal
    /// tonic — e.g. parent C major's 5th degree names "G" -> Mixolydian.
    pub modal_labels: HashMap<Note, ModeName>,
    pub classification: Classification,
}

/// Facts produced by analyzing an ordered melodic sequence (§4.F melody
/// input): the scale analysis over its note set, plus an inferred tonic.
#[derive(Debug, Clone)]
pub struct MelodyAnalysisResult {
    pub scale: ScaleAnalysisResult,
    pub suggested_tonic: Option<Note>,
    pub tonic_confidence: f64,
}

/// `analyze_scale` (§4.F contract, scale input).
///
/// # Errors
/// [`AnalysisError::EmptyProgression`] for an empty note slice.
pub fn analyze_scale(notes: &[Note]) -> AnalysisResult<ScaleAnalysisResult> {
    if notes.is_empty() {
        return Err(AnalysisError::EmptyProgression);
    }

    let input_pcs: HashSet<PitchClass> = notes.iter().map(|n| n.pitch_class()).collect();

    let mut parent_keys: Vec<Key> = Vec::new();
    for pc in 0..12 {
        let tonic = Note::from_pitch_class(PitchClass::new(pc), true);
        let key = Key::major(tonic);
        let scale: HashSet<PitchClass> = key.scale_pitch_classes().into_iter().collect();
        if input_pcs.is_subset(&scale) {
            parent_keys.push(key);
        }
    }
    parent_keys.sort_by_key(|k| k.tonic.pitch_class().value());

    let classification = if parent_keys.len() == 1 {
        Classification::Diatonic
    } else if parent_keys.is_empty() {
        Classification::ModalCandidate
    } else if input_pcs.len() < 7 {
        Classification::ModalBorrowing
    } else {
        Classification::Diatonic
    };

    let modal_labels = parent_keys
        .first()
        .map(modal_labels_for_parent)
        .unwrap_or_default();

    Ok(ScaleAnalysisResult {
        parent_keys,
        modal_labels,
        classification,
    })
}

/// Name each of a parent key's seven scale degrees as a modal tonic
/// (§4.F: "enumerate the seven modes by naming each scale degree as a
/// tonic").
fn modal_labels_for_parent(parent: &Key) -> HashMap<Note, ModeName> {
    let prefer_sharp = !matches!(parent.tonic.accidental, tonality_core::pitch::Accidental::Flat);
    parent
        .scale_pitch_classes()
        .into_iter()
        .enumerate()
        .map(|(idx, pc)| {
            let tonic = Note::from_pitch_class(pc, prefer_sharp);
            (tonic, ModeName::from_degree_index(idx))
        })
        .collect()
}

/// `analyze_melody` (§4.F contract, melody input).
///
/// # Errors
/// [`AnalysisError::EmptyProgression`] for an empty note slice.
pub fn analyze_melody(notes: &[Note]) -> AnalysisResult<MelodyAnalysisResult> {
    let scale = analyze_scale(notes)?;
    let (suggested_tonic, tonic_confidence) = suggest_tonic(notes);
    Ok(MelodyAnalysisResult {
        scale,
        suggested_tonic,
        tonic_confidence,
    })
}

/// The tonic-scoring formula (§4.F): +3 last, +2 first, +1 per
/// occurrence, +2 if a pitch class is both a peak and a valley of the
/// melodic contour. Confidence is the clamped, normalized margin between
/// the winner and the runner-up, floored at 0.3 when they tie.
///
/// This formula is a reconstruction from the spec's prose (§9 open
/// question); see `DESIGN.md` for the recorded decision.
fn suggest_tonic(notes: &[Note]) -> (Option<Note>, f64) {
    if notes.is_empty() {
        return (None, 0.0);
    }

    let mut scores: HashMap<PitchClass, f64> = HashMap::new();
    for note in notes {
        *scores.entry(note.pitch_class()).or_insert(0.0) += 1.0;
    }
    if let Some(last) = notes.last() {
        *scores.entry(last.pitch_class()).or_insert(0.0) += 3.0;
    }
    if let Some(first) = notes.first() {
        *scores.entry(first.pitch_class()).or_insert(0.0) += 2.0;
    }

    let (peaks, valleys) = arc_extrema(notes);
    for pc in peaks.intersection(&valleys) {
        *scores.entry(*pc).or_insert(0.0) += 2.0;
    }

    let mut ranked: Vec<(PitchClass, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let Some(&(winner_pc, winner_score)) = ranked.first() else {
        return (None, 0.0);
    };
    let second_score = ranked.get(1).map_or(0.0, |&(_, s)| s);

    let confidence = if winner_score <= 0.0 {
        0.0
    } else if (winner_score - second_score).abs() < f64::EPSILON {
        0.3
    } else {
        ((winner_score - second_score) / winner_score).clamp(0.0, 1.0)
    };

    let winner_note = notes
        .iter()
        .find(|n| n.pitch_class() == winner_pc)
        .copied();

    (winner_note, confidence)
}

/// Pitch classes that occur as a local maximum (peak) or local minimum
/// (valley) at some position in the sequence, comparing raw pitch-class
/// values (0-11) between adjacent notes — melodies carry no octave
/// information in this model (§1 non-goals: audio/MIDI timing), so
/// contour is read directly off consecutive pitch-class values.
fn arc_extrema(notes: &[Note]) -> (HashSet<PitchClass>, HashSet<PitchClass>) {
    let mut peaks = HashSet::new();
    let mut valleys = HashSet::new();
    let n = notes.len();
    if n < 2 {
        return (peaks, valleys);
    }

    for i in 0..n {
        let value = i32::from(notes[i].pitch_class().value());
        let prev = if i == 0 {
            None
        } else {
            Some(i32::from(notes[i - 1].pitch_class().value()))
        };
        let next = if i == n - 1 {
            None
        } else {
            Some(i32::from(notes[i + 1].pitch_class().value()))
        };

        let is_peak = match (prev, next) {
            (Some(p), Some(nx)) => value > p && value > nx,
            (Some(p), None) => value > p,
            (None, Some(nx)) => value > nx,
            (None, None) => false,
        };
        let is_valley = match (prev, next) {
            (Some(p), Some(nx)) => value < p && value < nx,
            (Some(p), None) => value < p,
            (None, Some(nx)) => value < nx,
            (None, None) => false,
        };

        if is_peak {
            peaks.insert(notes[i].pitch_class());
        }
        if is_valley {
            valleys.insert(notes[i].pitch_class());
        }
    }

    (peaks, valleys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonality_core::parser::parse_note;

    fn notes(symbols: &[&str]) -> Vec<Note> {
        symbols.iter().map(|s| parse_note(s).unwrap()).collect()
    }

    #[test]
    fn c_major_scale_has_exactly_one_parent_and_is_diatonic() {
        let result = analyze_scale(&notes(&["C", "D", "E", "F", "G", "A", "B"])).unwrap();
        assert_eq!(result.parent_keys.len(), 1);
        assert!(matches!(result.classification, Classification::Diatonic));
    }

    #[test]
    fn pentatonic_subset_matches_multiple_parents() {
        // C D E G A fits both C major and others containing these notes.
        let result = analyze_scale(&notes(&["C", "D", "E", "G", "A"])).unwrap();
        assert!(result.parent_keys.len() > 1);
        assert!(matches!(result.classification, Classification::ModalBorrowing));
    }

    #[test]
    fn chromatic_set_matches_no_parent() {
        let result = analyze_scale(&notes(&["C", "C#", "D", "D#", "E", "F"])).unwrap();
        assert!(result.parent_keys.is_empty());
        assert!(matches!(result.classification, Classification::ModalCandidate));
    }

    #[test]
    fn empty_note_set_is_an_error() {
        assert!(matches!(
            analyze_scale(&[]),
            Err(AnalysisError::EmptyProgression)
        ));
    }

    #[test]
    fn melody_suggests_last_note_as_tonic_when_it_dominates() {
        let result = analyze_melody(&notes(&["E", "F", "G", "C"])).unwrap();
        assert_eq!(result.suggested_tonic.unwrap().pitch_class().value(), 0);
        assert!(result.tonic_confidence > 0.0);
    }

    #[test]
    fn empty_melody_has_no_suggested_tonic() {
        let (tonic, confidence) = suggest_tonic(&[]);
        assert!(tonic.is_none());
        assert_eq!(confidence, 0.0);
    }
}
