//! Functional, modal and chromatic analysis of chord progressions, scale
//! and melody tonic inference, and a key-suggestion engine built on top
//! of an interpretation service with an LRU+TTL result cache.

pub mod cache;
pub mod cadence;
pub mod chromatic;
pub mod common;
pub mod error;
pub mod evidence;
pub mod functional;
pub mod interpretation;
pub mod modal;
pub mod scale_melody;
pub mod service;
pub mod suggestions;

pub use cadence::{Cadence, CadenceType};
pub use cache::Cache;
pub use chromatic::{analyze_chromatic, BorrowedChord, ChromaticMediant, ChromaticResult, SecondaryDominant};
pub use common::{Classification, InterpretationType, ParentKeyRelationship};
pub use error::{AnalysisError, AnalysisResult};
pub use evidence::{calibrate_confidence, Evidence, EvidenceType};
pub use functional::{analyze_functionally, FunctionalResult};
pub use interpretation::{
    AlternativeInterpretation, AnalysisInput, AnalysisMetadata, ConfidenceBreakdown,
    Interpretation, MultipleInterpretationResult,
};
pub use modal::{analyze_modally, ModalResult};
pub use scale_melody::{analyze_melody, analyze_scale, MelodyAnalysisResult, ScaleAnalysisResult};
pub use service::{AnalysisOptions, InterpretationService};
pub use suggestions::{Suggestion, Suggestions};

use tonality_core::pitch::Note;

/// `ComprehensiveResult` (§6): "equivalent to the first" — same shape as
/// [`MultipleInterpretationResult`], produced from a single
/// whitespace-delimited progression string instead of a chord list.
pub type ComprehensiveResult = MultipleInterpretationResult;

/// `analyze_chord_progression` (§6): a thin wrapper constructing a
/// default [`InterpretationService`] (backed by a fresh [`Cache`]) and
/// delegating. A collaborator that wants to reuse one cache/service
/// across many calls should construct [`InterpretationService`]
/// directly instead.
///
/// # Errors
/// See [`InterpretationService::analyze`].
pub async fn analyze_chord_progression(
    chords: &[String],
    options: AnalysisOptions,
) -> AnalysisResult<MultipleInterpretationResult> {
    InterpretationService::new().analyze(chords, options).await
}

/// `analyze_scale` (§6): parses each note token via §4.B's note grammar,
/// then runs the scale analyzer (§4.F).
///
/// # Errors
/// [`AnalysisError::EmptyProgression`] for an empty `notes` slice, or the
/// wrapped [`tonality_core::error::ChordTheoryError`] for an unparsable
/// note token.
pub fn analyze_scale(notes: &[String]) -> AnalysisResult<ScaleAnalysisResult> {
    let parsed = parse_notes(notes)?;
    Ok(scale_melody::analyze_scale(&parsed)?)
}

/// `analyze_melody` (§6): parses each note token, then runs the melody
/// analyzer (§4.F).
///
/// # Errors
/// Same as [`analyze_scale`].
pub fn analyze_melody(notes: &[String]) -> AnalysisResult<MelodyAnalysisResult> {
    let parsed = parse_notes(notes)?;
    Ok(scale_melody::analyze_melody(&parsed)?)
}

fn parse_notes(notes: &[String]) -> AnalysisResult<Vec<Note>> {
    notes
        .iter()
        .map(|n| Ok(tonality_core::parser::parse_note(n)?))
        .collect()
}

/// `analyze_comprehensively` (§6): splits `progression_input` on
/// whitespace and delegates to [`analyze_chord_progression`].
///
/// # Errors
/// See [`analyze_chord_progression`].
pub async fn analyze_comprehensively(
    progression_input: &str,
    parent_key: Option<String>,
) -> AnalysisResult<ComprehensiveResult> {
    let chords: Vec<String> = progression_input
        .split_whitespace()
        .map(str::to_string)
        .collect();
    analyze_chord_progression(
        &chords,
        AnalysisOptions {
            parent_key,
            ..AnalysisOptions::default()
        },
    )
    .await
}

/// `suggest_keys` (§6): a thin wrapper constructing a default
/// [`InterpretationService`] and delegating to the suggestion engine.
///
/// # Errors
/// See [`suggestions::suggest`].
pub async fn suggest_keys(chords: &[String], current_key: Option<String>) -> AnalysisResult<Suggestions> {
    let service = InterpretationService::new();
    suggestions::suggest(&service, chords, current_key.as_deref()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn analyze_chord_progression_wraps_the_service() {
        let chords = vec!["C".to_string(), "F".to_string(), "G".to_string(), "C".to_string()];
        let result = analyze_chord_progression(&chords, AnalysisOptions::default())
            .await
            .unwrap();
        assert!(matches!(
            result.primary.interpretation_type,
            InterpretationType::Functional
        ));
    }

    #[test]
    fn analyze_scale_parses_note_strings() {
        let notes = vec!["C".to_string(), "D".to_string(), "E".to_string()];
        let result = analyze_scale(&notes).unwrap();
        assert!(!result.parent_keys.is_empty());
    }

    #[tokio::test]
    async fn analyze_comprehensively_splits_on_whitespace() {
        let result = analyze_comprehensively("C F G C", None).await.unwrap();
        assert_eq!(result.input.chords.len(), 4);
    }

    #[tokio::test]
    async fn suggest_keys_wraps_the_suggestion_engine() {
        let chords = vec!["Dm7".to_string(), "G7".to_string(), "Cmaj7".to_string()];
        let suggestions = suggest_keys(&chords, None).await.unwrap();
        assert!(suggestions.suggestions.iter().all(|s| s.confidence() >= 0.55));
    }
}
