//! The interpretation service (§4.G): orchestrates the three analyzers,
//! collects evidence from their facts, calibrates confidence, ranks and
//! filters the candidate interpretations. Grounded on `composer-ai`'s
//! `AiEngine` — a plain value holding its sub-components, constructed
//! once and called many times, timing every request with `Instant::now`.

use std::sync::Arc;
use std::time::Instant;

use tonality_config::{
    PedagogicalLevel, CACHE_DEFAULTS, CONFIDENCE_THRESHOLDS, DEFAULT_MAX_ALTERNATIVES,
    EVIDENCE_WEIGHTS, RANKING_TIE_EPSILON,
};
use tonality_core::key::Key;
use tonality_core::Chord;

use crate::cache::Cache;
use crate::chromatic::{self, ChromaticResult};
use crate::common::{Classification, InterpretationType, ParentKeyRelationship};
use crate::error::{AnalysisError, AnalysisResult};
use crate::evidence::{calibrate_confidence, Evidence, EvidenceType};
use crate::functional::{self, matches_strong_pattern, FunctionalResult};
use crate::interpretation::{
    AlternativeInterpretation, AnalysisInput, AnalysisMetadata, BorrowedChordDisplay,
    ChromaticMediantDisplay, ConfidenceBreakdown, Interpretation, MultipleInterpretationResult,
    SecondaryDominantDisplay,
};
use crate::modal::{self, ModalResult};
use crate::suggestions;

/// Request options for [`InterpretationService::analyze`] (§4.G contract,
/// §6 Options struct).
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub parent_key: Option<String>,
    pub pedagogical_level: PedagogicalLevel,
    pub confidence_threshold: Option<f64>,
    pub max_alternatives: Option<usize>,
}

/// The interpretation service (§4.G). A plain value holding `Arc`-shared
/// state; construct once, call `analyze` many times. Never a module-level
/// singleton (§9 design note).
#[derive(Clone)]
pub struct InterpretationService {
    cache: Arc<Cache>,
}

impl InterpretationService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Arc::new(Cache::new(&CACHE_DEFAULTS)),
        }
    }

    #[must_use]
    pub fn with_cache(cache: Arc<Cache>) -> Self {
        Self { cache }
    }

    /// `analyze` (§4.G.1 orchestration).
    ///
    /// # Errors
    /// [`AnalysisError::EmptyProgression`] for an empty `chords` slice;
    /// [`AnalysisError::UnparsableChord`] naming the offending symbol and
    /// its 0-based position; [`AnalysisError::ChordTheory`] if
    /// `options.parent_key` doesn't parse.
    pub async fn analyze(
        &self,
        chords: &[String],
        options: AnalysisOptions,
    ) -> AnalysisResult<MultipleInterpretationResult> {
        if chords.is_empty() {
            return Err(AnalysisError::EmptyProgression);
        }

        let confidence_threshold = options
            .confidence_threshold
            .unwrap_or_else(|| CONFIDENCE_THRESHOLDS.for_level(options.pedagogical_level));
        let max_alternatives = options.max_alternatives.unwrap_or(DEFAULT_MAX_ALTERNATIVES);

        if let Some(cached) = self.cache.get(
            chords,
            options.parent_key.as_deref(),
            options.pedagogical_level,
            confidence_threshold,
            max_alternatives,
        ) {
            return Ok(cached);
        }

        let parent_key_for_suggestions = options.parent_key.clone();
        let mut result = self
            .analyze_core(chords, options, confidence_threshold, max_alternatives)
            .await?;

        // Step 6 (§4.G.1): run the suggestion engine. Its counterfactual
        // re-analyses call `analyze_core` directly (never the public
        // `analyze`), so this never recurses.
        result.suggestions = suggestions::suggest(self, chords, parent_key_for_suggestions.as_deref())
            .await
            .ok();

        self.cache.insert(
            chords,
            result.input.parent_key.as_deref(),
            result.input.pedagogical_level,
            confidence_threshold,
            max_alternatives,
            result.clone(),
        );

        Ok(result)
    }

    /// `analyze_core` with the same option-defaulting `analyze` does,
    /// for callers (the suggestion engine) that need a reading without
    /// risking another round of suggestion-generation.
    pub(crate) async fn analyze_without_suggestions(
        &self,
        chords: &[String],
        options: AnalysisOptions,
    ) -> AnalysisResult<MultipleInterpretationResult> {
        if chords.is_empty() {
            return Err(AnalysisError::EmptyProgression);
        }
        let confidence_threshold = options
            .confidence_threshold
            .unwrap_or_else(|| CONFIDENCE_THRESHOLDS.for_level(options.pedagogical_level));
        let max_alternatives = options.max_alternatives.unwrap_or(DEFAULT_MAX_ALTERNATIVES);
        self.analyze_core(chords, options, confidence_threshold, max_alternatives)
            .await
    }

    /// The orchestration steps that produce a reading (§4.G.1 steps 2-5):
    /// parse, dispatch the three analyzers, collect evidence, calibrate,
    /// rank and filter. Deliberately stops short of step 6 (the
    /// suggestion engine) and never touches the cache — this is what the
    /// suggestion engine's own counterfactual re-analyses call (§4.H), so
    /// that re-analyzing under a candidate key never triggers another
    /// round of suggestion-generation.
    pub(crate) async fn analyze_core(
        &self,
        chords: &[String],
        options: AnalysisOptions,
        confidence_threshold: f64,
        max_alternatives: usize,
    ) -> AnalysisResult<MultipleInterpretationResult> {
        let start = Instant::now();

        let parsed: Vec<Chord> = chords
            .iter()
            .enumerate()
            .map(|(position, symbol)| {
                tonality_core::parser::parse(symbol).map_err(|_| AnalysisError::UnparsableChord {
                    symbol: symbol.clone(),
                    position,
                })
            })
            .collect::<AnalysisResult<_>>()?;

        let supplied_parent = options
            .parent_key
            .as_deref()
            .map(Key::parse)
            .transpose()?;

        let working_key = supplied_parent.unwrap_or_else(|| functional::infer_key(&parsed));

        let chords_for_functional = parsed.clone();
        let chords_for_modal = parsed.clone();
        let chords_for_chromatic = parsed.clone();
        let functional_key = Some(working_key);
        let chromatic_key = working_key;

        let functional_task = tokio::task::spawn_blocking(move || {
            functional::analyze_functionally(
                &chords_for_functional,
                functional_key,
                &tonality_config::CADENCE_STRENGTHS,
            )
        });
        let modal_task = tokio::task::spawn_blocking(move || {
            modal::analyze_modally(&chords_for_modal, supplied_parent)
        });
        let chromatic_task = tokio::task::spawn_blocking(move || {
            chromatic::analyze_chromatic(&chords_for_chromatic, &chromatic_key)
        });

        let (functional_joined, modal_joined, chromatic_joined) =
            tokio::join!(functional_task, modal_task, chromatic_task);

        let functional_result = join_analyzer_result(functional_joined, "functional")?;
        let modal_result = join_analyzer_result(modal_joined, "modal")?;
        let chromatic_result = join_analyzer_result(chromatic_joined, "chromatic")?;

        let functional_evidence = build_functional_evidence(&functional_result);
        let modal_evidence = build_modal_evidence(&modal_result);
        let chromatic_evidence = build_chromatic_evidence(&chromatic_result);

        let ceiling = degenerate_input_ceiling(&parsed, functional_result.diatonic_fraction);
        let functional_confidence =
            calibrate_confidence(&functional_evidence, &EVIDENCE_WEIGHTS).min(ceiling);
        let modal_confidence = calibrate_confidence(&modal_evidence, &EVIDENCE_WEIGHTS).min(ceiling);
        let chromatic_confidence =
            calibrate_confidence(&chromatic_evidence, &EVIDENCE_WEIGHTS).min(ceiling);

        let breakdown = ConfidenceBreakdown {
            functional: functional_confidence,
            modal: modal_confidence,
            chromatic: chromatic_confidence,
        };

        let secondary_dominants: Vec<SecondaryDominantDisplay> = chromatic_result
            .secondary_dominants
            .iter()
            .map(|f| SecondaryDominantDisplay::from_facts(f, &parsed))
            .collect();
        let borrowed_chords: Vec<BorrowedChordDisplay> = chromatic_result
            .borrowed_chords
            .iter()
            .map(|f| BorrowedChordDisplay::from_facts(f, &parsed))
            .collect();
        let chromatic_mediants: Vec<ChromaticMediantDisplay> = chromatic_result
            .chromatic_mediants
            .iter()
            .map(|f| ChromaticMediantDisplay::from_facts(f, &parsed))
            .collect();

        let functional_interp = build_functional_interpretation(
            &functional_result,
            functional_confidence,
            functional_evidence,
            &modal_result,
            breakdown,
            &secondary_dominants,
            &borrowed_chords,
            &chromatic_mediants,
        );
        let modal_interp = build_modal_interpretation(
            &modal_result,
            modal_confidence,
            modal_evidence,
            breakdown,
            &secondary_dominants,
            &borrowed_chords,
            &chromatic_mediants,
        );
        let chromatic_interp = build_chromatic_interpretation(
            &chromatic_result,
            chromatic_key,
            chromatic_confidence,
            chromatic_evidence,
            &modal_result,
            breakdown,
            &secondary_dominants,
            &borrowed_chords,
            &chromatic_mediants,
        );

        let mut candidates = vec![functional_interp, modal_interp, chromatic_interp];
        let primary_index = rank_primary(&candidates, options.parent_key.is_some());
        let primary = candidates.remove(primary_index);

        let alternatives: Vec<AlternativeInterpretation> = candidates
            .into_iter()
            .filter(|i| i.confidence >= confidence_threshold)
            .take(max_alternatives)
            .map(|interpretation| {
                let relationship_to_primary = relationship_to_primary(&primary, &interpretation);
                AlternativeInterpretation {
                    interpretation,
                    relationship_to_primary,
                }
            })
            .collect();

        let result = MultipleInterpretationResult {
            input: AnalysisInput {
                chords: chords.to_vec(),
                parent_key: options.parent_key.clone(),
                pedagogical_level: options.pedagogical_level,
                confidence_threshold,
                max_alternatives,
            },
            primary,
            alternatives,
            // Step 6 (§4.G.1) is the caller's job: `analyze` attaches
            // suggestions after this returns; `analyze_without_suggestions`
            // callers (the suggestion engine itself) want none.
            suggestions: None,
            metadata: AnalysisMetadata {
                duration_ms: start.elapsed().as_secs_f64() * 1000.0,
                interpretations_considered: 3,
                confidence_threshold_used: confidence_threshold,
                pedagogical_level: options.pedagogical_level,
            },
        };

        Ok(result)
    }
}

impl Default for InterpretationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Edge-case confidence ceilings (§4.G.3/§8.2): a single chord, a static
/// repetition of one chord, or a progression whose chords barely agree
/// on any key all read as spuriously confident under the ordinary
/// evidence formula (a lone tonic chord satisfies both the "last chord
/// is tonic" structural piece and a 1.0 diatonic fraction). Applied to
/// every analyzer's calibrated confidence before ranking, not just the
/// one that ends up primary.
fn degenerate_input_ceiling(chords: &[Chord], functional_diatonic_fraction: f64) -> f64 {
    if chords.len() == 1 {
        return 0.40;
    }
    let first_pitch_classes = chords[0].pitch_classes();
    if chords.iter().all(|c| c.pitch_classes() == first_pitch_classes) {
        return 0.30;
    }
    if chords.len() >= 3 && functional_diatonic_fraction <= 0.5 {
        return 0.50;
    }
    1.0
}

/// Unwrap a `spawn_blocking` join result (§4.G.6): a join failure or an
/// analyzer error both degrade to an empty-evidence interpretation
/// rather than failing the whole request, by synthesizing a result with
/// zero raw confidence and no facts for the caller to build evidence
/// from. A join failure is logged at `warn`; it should only happen if
/// the blocking task panicked.
fn join_analyzer_result<T: Default>(
    joined: Result<AnalysisResult<T>, tokio::task::JoinError>,
    label: &str,
) -> AnalysisResult<T> {
    match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            log::warn!("{label} analyzer returned an error, degrading to empty evidence: {err}");
            Ok(T::default())
        }
        Err(join_err) => {
            log::warn!("{label} analyzer task panicked: {join_err}");
            Ok(T::default())
        }
    }
}

impl Default for FunctionalResult {
    fn default() -> Self {
        Self {
            key: Key::major(tonality_core::pitch::Note::new('C', tonality_core::pitch::Accidental::Natural).unwrap_or_else(|_| unreachable!())),
            romans: Vec::new(),
            functions: Vec::new(),
            cadences: Vec::new(),
            diatonic_fraction: 0.0,
            raw_confidence: 0.0,
        }
    }
}

impl Default for ModalResult {
    fn default() -> Self {
        let tonic = tonality_core::pitch::Note::new('C', tonality_core::pitch::Accidental::Natural)
            .unwrap_or_else(|_| unreachable!());
        Self {
            local_tonic: tonic,
            mode: tonality_core::constants::ModeName::Ionian,
            key: Key::major(tonic),
            parent_key_relationship: ParentKeyRelationship::None,
            classification: Classification::Diatonic,
            characteristic_chord_count: 0,
            modal_cadence: None,
            tonic_frames: false,
            raw_confidence: 0.0,
        }
    }
}

/// Functional evidence (§4.G.2).
fn build_functional_evidence(result: &FunctionalResult) -> Vec<Evidence> {
    let mut evidence = Vec::new();

    for cadence in &result.cadences {
        evidence.push(Evidence::new(
            EvidenceType::Cadential,
            cadence.strength,
            [InterpretationType::Functional],
            format!("{:?} cadence", cadence.cadence_type),
            "cadential motion between adjacent Roman numerals",
        ));
    }

    if result.romans.last().is_some_and(|r| r.scale_degree == 1) {
        evidence.push(Evidence::new(
            EvidenceType::Structural,
            0.6,
            [InterpretationType::Functional],
            "last chord is the tonic",
            "progression resolves to I/i",
        ));
    }

    let harmonic_strength = (result.diatonic_fraction * 0.65).min(0.60);
    evidence.push(Evidence::new(
        EvidenceType::Harmonic,
        harmonic_strength,
        [InterpretationType::Functional],
        "fraction of chords diatonic to the inferred key",
        "diatonic_fraction * 0.65, capped at 0.60",
    ));

    if matches_strong_pattern(&result.romans) {
        evidence.push(Evidence::new(
            EvidenceType::Structural,
            0.95,
            [InterpretationType::Functional],
            "Roman-numeral sequence matches a known strong functional pattern",
            "e.g. I-vi-IV-V, ii-V-I",
        ));
    }

    evidence
}

/// Modal evidence (§4.G.2).
fn build_modal_evidence(result: &ModalResult) -> Vec<Evidence> {
    let mut evidence = Vec::new();

    for _ in 0..result.characteristic_chord_count {
        evidence.push(Evidence::new(
            EvidenceType::Intervallic,
            0.7,
            [InterpretationType::Modal],
            format!("chord on the {} characteristic degree", result.mode.name()),
            "characteristic-degree chord matched",
        ));
    }

    if let Some(cadence_type) = result.modal_cadence {
        evidence.push(Evidence::new(
            EvidenceType::Cadential,
            cadence_type.intrinsic_strength(&tonality_config::CADENCE_STRENGTHS),
            [InterpretationType::Modal],
            "modal cadence resolving to the local tonic",
            "\u{266d}VII-I or \u{266d}II-I motion",
        ));
    }

    if result.tonic_frames {
        evidence.push(Evidence::new(
            EvidenceType::Structural,
            0.6,
            [InterpretationType::Modal],
            "local tonic opens and closes the progression",
            "first and last chord roots match",
        ));
    }

    evidence
}

/// Chromatic evidence (§4.G.2). The spec doesn't assign an explicit
/// evidence-type category to these three; secondary dominants and
/// borrowed chords are read as harmonic-function phenomena, while a
/// chromatic mediant (no functional pull, just a shared tone) is read as
/// contextual.
fn build_chromatic_evidence(result: &ChromaticResult) -> Vec<Evidence> {
    let mut evidence = Vec::new();

    for dominant in &result.secondary_dominants {
        evidence.push(Evidence::new(
            EvidenceType::Harmonic,
            0.7,
            [InterpretationType::Chromatic],
            format!("secondary dominant {}", dominant.roman.text),
            "applied dominant resolving a perfect fifth down",
        ));
    }
    for borrowed in &result.borrowed_chords {
        evidence.push(Evidence::new(
            EvidenceType::Harmonic,
            0.6,
            [InterpretationType::Chromatic],
            format!("chord borrowed from the {}", borrowed.borrowed_from),
            "diatonic to the parallel mode, not the current key",
        ));
    }
    for mediant in &result.chromatic_mediants {
        evidence.push(Evidence::new(
            EvidenceType::Contextual,
            0.5,
            [InterpretationType::Chromatic],
            format!("chromatic mediant, {}", mediant.interval_from_tonic),
            "shares exactly one common tone with the tonic triad",
        ));
    }

    evidence
}

#[allow(clippy::too_many_arguments)]
fn build_functional_interpretation(
    result: &FunctionalResult,
    confidence: f64,
    evidence: Vec<Evidence>,
    modal_result: &ModalResult,
    breakdown: ConfidenceBreakdown,
    secondary_dominants: &[SecondaryDominantDisplay],
    borrowed_chords: &[BorrowedChordDisplay],
    chromatic_mediants: &[ChromaticMediantDisplay],
) -> Interpretation {
    Interpretation {
        interpretation_type: InterpretationType::Functional,
        confidence,
        summary: format!("functional analysis in {}", result.key.display_name()),
        roman_numerals: result.romans.clone(),
        key: result.key,
        mode: None,
        cadences: result.cadences.clone(),
        evidence,
        chord_functions: result.functions.iter().map(|f| (*f).to_string()).collect(),
        modal_characteristics: Vec::new(),
        secondary_dominants: secondary_dominants.to_vec(),
        borrowed_chords: borrowed_chords.to_vec(),
        chromatic_mediants: chromatic_mediants.to_vec(),
        contextual_classification: modal_result.classification,
        parent_key_relationship: modal_result.parent_key_relationship,
        breakdown,
    }
}

#[allow(clippy::too_many_arguments)]
fn build_modal_interpretation(
    result: &ModalResult,
    confidence: f64,
    evidence: Vec<Evidence>,
    breakdown: ConfidenceBreakdown,
    secondary_dominants: &[SecondaryDominantDisplay],
    borrowed_chords: &[BorrowedChordDisplay],
    chromatic_mediants: &[ChromaticMediantDisplay],
) -> Interpretation {
    let modal_characteristics = tonality_core::constants::characteristic_degrees(result.mode)
        .iter()
        .map(|d| format!("{d} ({})", result.mode.name()))
        .collect();

    Interpretation {
        interpretation_type: InterpretationType::Modal,
        confidence,
        summary: format!(
            "modal analysis: {} {}",
            result.local_tonic.symbol(),
            result.mode.name()
        ),
        roman_numerals: Vec::new(),
        key: result.key,
        mode: Some(result.mode),
        cadences: Vec::new(),
        evidence,
        chord_functions: Vec::new(),
        modal_characteristics,
        secondary_dominants: secondary_dominants.to_vec(),
        borrowed_chords: borrowed_chords.to_vec(),
        chromatic_mediants: chromatic_mediants.to_vec(),
        contextual_classification: result.classification,
        parent_key_relationship: result.parent_key_relationship,
        breakdown,
    }
}

#[allow(clippy::too_many_arguments)]
fn build_chromatic_interpretation(
    result: &ChromaticResult,
    key: Key,
    confidence: f64,
    evidence: Vec<Evidence>,
    modal_result: &ModalResult,
    breakdown: ConfidenceBreakdown,
    secondary_dominants: &[SecondaryDominantDisplay],
    borrowed_chords: &[BorrowedChordDisplay],
    chromatic_mediants: &[ChromaticMediantDisplay],
) -> Interpretation {
    let fact_count =
        result.secondary_dominants.len() + result.borrowed_chords.len() + result.chromatic_mediants.len();
    Interpretation {
        interpretation_type: InterpretationType::Chromatic,
        confidence,
        summary: format!(
            "chromatic analysis in {} ({fact_count} chromatic event(s))",
            key.display_name()
        ),
        roman_numerals: Vec::new(),
        key,
        mode: None,
        cadences: Vec::new(),
        evidence,
        chord_functions: Vec::new(),
        modal_characteristics: Vec::new(),
        secondary_dominants: secondary_dominants.to_vec(),
        borrowed_chords: borrowed_chords.to_vec(),
        chromatic_mediants: chromatic_mediants.to_vec(),
        contextual_classification: modal_result.classification,
        parent_key_relationship: modal_result.parent_key_relationship,
        breakdown,
    }
}

/// Ranking (§4.G.4 steps 1-4): highest confidence wins; when functional
/// and modal are within [`RANKING_TIE_EPSILON`], prefer whichever is
/// consistent with a supplied parent key, else prefer functional.
fn rank_primary(candidates: &[Interpretation], parent_key_supplied: bool) -> usize {
    let functional_index = candidates
        .iter()
        .position(|i| matches!(i.interpretation_type, InterpretationType::Functional))
        .unwrap_or(0);
    let modal_index = candidates
        .iter()
        .position(|i| matches!(i.interpretation_type, InterpretationType::Modal))
        .unwrap_or(0);

    let (best_index, _) = candidates
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            a.confidence
                .partial_cmp(&b.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or((0, &candidates[0]));

    let functional_confidence = candidates[functional_index].confidence;
    let modal_confidence = candidates[modal_index].confidence;
    if (functional_confidence - modal_confidence).abs() < RANKING_TIE_EPSILON
        && (best_index == functional_index || best_index == modal_index)
    {
        if parent_key_supplied {
            let consistent = candidates
                .iter()
                .position(|i| matches!(i.parent_key_relationship, ParentKeyRelationship::Matches));
            if let Some(idx) = consistent {
                return idx;
            }
        }
        return functional_index;
    }

    best_index
}

/// `relationship_to_primary` (§4.G.4 step 6).
fn relationship_to_primary(primary: &Interpretation, alternative: &Interpretation) -> String {
    let same_key = primary.key.parent_key_tonic().pitch_class()
        == alternative.key.parent_key_tonic().pitch_class();

    match (primary.interpretation_type, alternative.interpretation_type) {
        (InterpretationType::Functional, InterpretationType::Modal) => "modal reading".to_string(),
        (InterpretationType::Modal, InterpretationType::Functional) => {
            "functional reading".to_string()
        }
        _ if same_key => "alternative lens".to_string(),
        _ => "reinterpretation".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ii_v_i_in_c_major_is_primarily_functional() {
        let service = InterpretationService::new();
        let chords = vec!["Dm7".to_string(), "G7".to_string(), "Cmaj7".to_string()];
        let result = service.analyze(&chords, AnalysisOptions::default()).await.unwrap();
        assert!(matches!(
            result.primary.interpretation_type,
            InterpretationType::Functional
        ));
        assert!(result.primary.confidence > 0.5);
    }

    #[tokio::test]
    async fn empty_progression_is_an_error() {
        let service = InterpretationService::new();
        let result = service.analyze(&[], AnalysisOptions::default()).await;
        assert!(matches!(result, Err(AnalysisError::EmptyProgression)));
    }

    #[tokio::test]
    async fn unparsable_chord_names_symbol_and_position() {
        let service = InterpretationService::new();
        let chords = vec!["C".to_string(), "???".to_string()];
        let result = service.analyze(&chords, AnalysisOptions::default()).await;
        assert!(matches!(
            result,
            Err(AnalysisError::UnparsableChord { position: 1, .. })
        ));
    }

    #[tokio::test]
    async fn repeated_request_is_served_from_cache() {
        let service = InterpretationService::new();
        let chords = vec!["C".to_string(), "F".to_string(), "G".to_string(), "C".to_string()];
        let first = service.analyze(&chords, AnalysisOptions::default()).await.unwrap();
        let second = service.analyze(&chords, AnalysisOptions::default()).await.unwrap();
        assert_eq!(first.primary.confidence, second.primary.confidence);
    }

    #[tokio::test]
    async fn g_mixolydian_progression_surfaces_a_modal_alternative_or_primary() {
        let service = InterpretationService::new();
        let chords = vec!["G".to_string(), "F".to_string(), "C".to_string(), "G".to_string()];
        let result = service
            .analyze(
                &chords,
                AnalysisOptions {
                    confidence_threshold: Some(0.0),
                    ..AnalysisOptions::default()
                },
            )
            .await
            .unwrap();
        let has_modal = matches!(result.primary.interpretation_type, InterpretationType::Modal)
            || result
                .alternatives
                .iter()
                .any(|a| matches!(a.interpretation.interpretation_type, InterpretationType::Modal));
        assert!(has_modal);
    }
}
