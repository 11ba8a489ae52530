//! The functional analyzer (§4.C): key inference, Roman-numeral
//! assignment, chord-function tagging, cadence detection.

use tonality_config::CadenceStrengths;
use tonality_core::constants::DEGREE_FUNCTION;
use tonality_core::key::{Key, KeyMode};
use tonality_core::pitch::{Note, PitchClass};
use tonality_core::roman::RomanNumeral;
use tonality_core::{Chord, SeventhType};

use crate::cadence::{Cadence, CadenceType};
use crate::error::{AnalysisError, AnalysisResult};

/// Facts produced by the functional analyzer. Evidence collection from
/// these facts happens in the interpretation service (§4.G.2), not here.
#[derive(Debug, Clone)]
pub struct FunctionalResult {
    pub key: Key,
    pub romans: Vec<RomanNumeral>,
    /// Harmonic function per chord: "tonic" | "predominant" | "dominant".
    pub functions: Vec<&'static str>,
    pub cadences: Vec<Cadence>,
    pub diatonic_fraction: f64,
    /// The analyzer's own raw confidence (§4.C.5): diatonic fraction
    /// times the strongest cadence found (1.0 multiplier when none).
    pub raw_confidence: f64,
}

/// Known strong functional Roman-numeral patterns (§4.G.2 pattern-
/// structural evidence), major-key spellings; minor-key duals are
/// recognized by the caller via the lowercase/lowered variants.
pub const STRONG_PATTERNS_MAJOR: &[&[&str]] = &[
    &["I", "vi", "IV", "V"],
    &["I", "V", "vi", "IV"],
    &["ii", "V", "I"],
    &["I", "vi", "ii", "V"],
    &["vi", "IV", "I", "V"],
];

/// `analyze_functionally` (§4.C contract).
///
/// # Errors
/// [`AnalysisError::EmptyProgression`] for an empty chord slice.
pub fn analyze_functionally(
    chords: &[Chord],
    parent_key: Option<Key>,
    cadence_strengths: &CadenceStrengths,
) -> AnalysisResult<FunctionalResult> {
    if chords.is_empty() {
        return Err(AnalysisError::EmptyProgression);
    }

    let key = parent_key.unwrap_or_else(|| infer_key(chords));

    let romans: Vec<RomanNumeral> = chords.iter().map(|c| assign_roman(c, &key)).collect();
    let functions: Vec<&'static str> = romans
        .iter()
        .map(|r| {
            DEGREE_FUNCTION
                .get(&r.scale_degree)
                .copied()
                .unwrap_or("tonic")
        })
        .collect();
    let cadences = detect_cadences(&romans, cadence_strengths);

    let diatonic_count = chords
        .iter()
        .filter(|c| key.contains_pitch_class(c.root.pitch_class()))
        .count();
    let diatonic_fraction = diatonic_count as f64 / chords.len() as f64;

    let cadence_bonus = cadences
        .iter()
        .map(|c| c.strength)
        .fold(None, |acc: Option<f64>, s| {
            Some(acc.map_or(s, |a: f64| a.max(s)))
        })
        .unwrap_or(1.0);

    let raw_confidence = (diatonic_fraction * cadence_bonus).clamp(0.0, 1.0);

    Ok(FunctionalResult {
        key,
        romans,
        functions,
        cadences,
        diatonic_fraction,
        raw_confidence,
    })
}

/// Score every major/minor key candidate by counting chords whose root
/// fits the key's diatonic set, weighting first/last chords double
/// (§4.C.1), tie-breaking toward major and toward a tonic final chord.
pub(crate) fn infer_key(chords: &[Chord]) -> Key {
    let mut best: Option<(Key, f64)> = None;
    for pc in 0..12 {
        for mode in [KeyMode::Major, KeyMode::Minor] {
            let tonic = Note::from_pitch_class(PitchClass::new(pc), true);
            let key = match mode {
                KeyMode::Minor => Key::minor(tonic),
                _ => Key::major(tonic),
            };
            let mut score = 0.0;
            for (i, chord) in chords.iter().enumerate() {
                let weight = if i == 0 || i == chords.len() - 1 {
                    2.0
                } else {
                    1.0
                };
                if key.contains_pitch_class(chord.root.pitch_class()) {
                    score += weight;
                }
            }
            let last_is_tonic = chords
                .last()
                .is_some_and(|c| c.root.pitch_class() == key.tonic.pitch_class());
            // Tie-break rule: prefer major over minor; prefer a tonic final chord.
            let tie_break = score
                + if last_is_tonic { 0.02 } else { 0.0 }
                + if matches!(mode, KeyMode::Major) { 0.01 } else { 0.0 };
            if best.as_ref().is_none_or(|&(_, b)| tie_break > b) {
                best = Some((key, tie_break));
            }
        }
    }
    best.map_or_else(|| Key::major(chords[0].root), |(key, _)| key)
}

/// Find the scale degree whose interval from the tonic most closely
/// matches the chord root, plus a chromatic prefix (`#`/`b`) when the
/// match isn't exact — a chromatic root one semitone off a diatonic
/// degree (e.g. a secondary dominant's root).
fn degree_and_prefix(root: PitchClass, key: &Key) -> (u8, Option<&'static str>) {
    let pattern = key.mode.interval_pattern();
    let root_offset = (root - key.tonic.pitch_class()).reduced() as i32;
    let (mut best_degree, mut best_diff) = (1u8, i32::MAX);
    for (i, &offset) in pattern.iter().enumerate() {
        let raw = root_offset - offset;
        let circular = ((raw + 6).rem_euclid(12)) - 6;
        if circular.abs() < best_diff.abs() {
            best_diff = circular;
            best_degree = (i + 1) as u8;
        }
    }
    let prefix = match best_diff {
        0 => None,
        1 => Some("#"),
        -1 => Some("b"),
        _ => None,
    };
    (best_degree, prefix)
}

fn inversion_figure(chord: &Chord) -> Option<String> {
    let bass = chord.bass?;
    let interval = (bass.pitch_class() - chord.root.pitch_class()).reduced();
    let has_seventh = !matches!(chord.seventh, SeventhType::None);
    match interval {
        3 | 4 => Some(if has_seventh { "65" } else { "6" }.to_string()),
        6 | 7 => Some(if has_seventh { "43" } else { "64" }.to_string()),
        10 | 11 => Some("42".to_string()),
        _ => None,
    }
}

fn assign_roman(chord: &Chord, key: &Key) -> RomanNumeral {
    let (degree, prefix) = degree_and_prefix(chord.root.pitch_class(), key);
    RomanNumeral::build(
        degree,
        chord.quality,
        chord.seventh,
        prefix,
        None,
        inversion_figure(chord),
    )
}

/// Scan adjacent Roman-numeral pairs for the six cadence shapes (§4.C.4).
fn detect_cadences(romans: &[RomanNumeral], table: &CadenceStrengths) -> Vec<Cadence> {
    let mut cadences = Vec::new();
    for i in 0..romans.len().saturating_sub(1) {
        let a = &romans[i];
        let b = &romans[i + 1];
        let is_flat = |r: &RomanNumeral| r.text.starts_with('b');

        if a.scale_degree == 5 && b.scale_degree == 1 {
            cadences.push(Cadence {
                cadence_type: CadenceType::Authentic,
                start_index: i,
                end_index: i + 1,
                strength: CadenceType::Authentic.intrinsic_strength(table),
            });
        } else if a.scale_degree == 4 && b.scale_degree == 1 {
            cadences.push(Cadence {
                cadence_type: CadenceType::Plagal,
                start_index: i,
                end_index: i + 1,
                strength: CadenceType::Plagal.intrinsic_strength(table),
            });
        } else if a.scale_degree == 5 && b.scale_degree == 6 {
            cadences.push(Cadence {
                cadence_type: CadenceType::Deceptive,
                start_index: i,
                end_index: i + 1,
                strength: CadenceType::Deceptive.intrinsic_strength(table),
            });
        } else if is_flat(a) && a.scale_degree == 2 && b.scale_degree == 1 {
            cadences.push(Cadence {
                cadence_type: CadenceType::Phrygian,
                start_index: i,
                end_index: i + 1,
                strength: CadenceType::Phrygian.intrinsic_strength(table),
            });
        } else if is_flat(a) && a.scale_degree == 7 && b.scale_degree == 1 {
            cadences.push(Cadence {
                cadence_type: CadenceType::Modal,
                start_index: i,
                end_index: i + 1,
                strength: CadenceType::Modal.intrinsic_strength(table),
            });
        }
    }

    if romans.len() >= 2 {
        if let Some(last) = romans.last() {
            if last.scale_degree == 5 {
                let i = romans.len() - 2;
                cadences.push(Cadence {
                    cadence_type: CadenceType::Half,
                    start_index: i,
                    end_index: i + 1,
                    strength: CadenceType::Half.intrinsic_strength(table),
                });
            }
        }
    }

    cadences
}

/// Does `romans` (mapped to their plain degree text, ignoring figures)
/// match one of the known strong functional patterns (§4.G.2)?
#[must_use]
pub fn matches_strong_pattern(romans: &[RomanNumeral]) -> bool {
    let degree_shapes: Vec<String> = romans
        .iter()
        .map(|r| {
            let lower = matches!(
                r.quality,
                tonality_core::ChordQuality::Minor | tonality_core::ChordQuality::Diminished
            );
            let base = tonality_core::constants::ROMAN_NUMERAL_BASE
                .get(&r.scale_degree)
                .copied()
                .unwrap_or("?");
            if lower {
                base.to_lowercase()
            } else {
                base.to_string()
            }
        })
        .collect();

    STRONG_PATTERNS_MAJOR
        .iter()
        .any(|pattern| pattern.iter().map(|s| s.to_lowercase()).eq(degree_shapes.iter().map(|s| s.to_lowercase())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonality_config::CADENCE_STRENGTHS;
    use tonality_core::parser::parse;

    fn chords(symbols: &[&str]) -> Vec<Chord> {
        symbols.iter().map(|s| parse(s).unwrap()).collect()
    }

    #[test]
    fn c_f_g_c_infers_c_major_with_authentic_cadence() {
        let progression = chords(&["C", "F", "G", "C"]);
        let result = analyze_functionally(&progression, None, &CADENCE_STRENGTHS).unwrap();
        assert_eq!(result.key.tonic.pitch_class().value(), 0);
        assert!(matches!(result.key.mode, KeyMode::Major));
        assert!(result
            .cadences
            .iter()
            .any(|c| matches!(c.cadence_type, CadenceType::Authentic)));
    }

    #[test]
    fn dm_g_c_is_ii_v_i_with_authentic_cadence() {
        let progression = chords(&["Dm", "G", "C"]);
        let result = analyze_functionally(&progression, None, &CADENCE_STRENGTHS).unwrap();
        let texts: Vec<&str> = result.romans.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["ii", "V", "I"]);
        assert!(matches_strong_pattern(&result.romans));
    }

    #[test]
    fn c_f_c_is_plagal() {
        let progression = chords(&["C", "F", "C"]);
        let result = analyze_functionally(&progression, None, &CADENCE_STRENGTHS).unwrap();
        assert!(result
            .cadences
            .iter()
            .any(|c| matches!(c.cadence_type, CadenceType::Plagal)));
    }

    #[test]
    fn empty_progression_is_an_error() {
        assert!(matches!(
            analyze_functionally(&[], None, &CADENCE_STRENGTHS),
            Err(AnalysisError::EmptyProgression)
        ));
    }

    #[test]
    fn all_identical_chords_have_no_cadence() {
        let progression = chords(&["C", "C", "C", "C"]);
        let result = analyze_functionally(&progression, None, &CADENCE_STRENGTHS).unwrap();
        assert!(result.cadences.is_empty());
    }
}
