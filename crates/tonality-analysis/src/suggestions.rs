//! The suggestion engine (§4.H): counterfactual re-analysis under the
//! supplied key, no key, and related candidate keys, reduced to a single
//! add/remove/change-key decision (§9's "one function, not three
//! independent passes").

use serde::{Deserialize, Serialize};
use tonality_config::{
    ADD_KEY_SCORE_THRESHOLD, CHANGE_KEY_SCORE_MARGIN, MAX_RELATED_KEY_CANDIDATES,
    NO_EVIDENCE_CONFIDENCE,
};
use tonality_core::key::Key;

use crate::common::InterpretationType;
use crate::error::AnalysisResult;
use crate::functional::matches_strong_pattern;
use crate::interpretation::MultipleInterpretationResult;
use crate::service::{AnalysisOptions, InterpretationService};

/// A single suggestion emitted by the engine (§4.H). At most one
/// variant kind appears in a given [`Suggestions`] value: either one or
/// more [`Suggestion::AddKey`] entries, or a lone `RemoveKey`, or a lone
/// `ChangeKey` — never a mix, per the decision table's mutual exclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Suggestion {
    AddKey {
        key: Key,
        reason: String,
        confidence: f64,
        expected_improvement: String,
    },
    RemoveKey {
        reason: String,
        confidence: f64,
        expected_improvement: String,
    },
    ChangeKey {
        key: Key,
        reason: String,
        confidence: f64,
        expected_improvement: String,
    },
}

impl Suggestion {
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        match self {
            Self::AddKey { confidence, .. }
            | Self::RemoveKey { confidence, .. }
            | Self::ChangeKey { confidence, .. } => *confidence,
        }
    }
}

/// The suggestion engine's output (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Suggestions {
    pub suggestions: Vec<Suggestion>,
}

/// `suggest` (§4.H contract): run the counterfactual analyses and reduce
/// them to the decision table's single outcome.
///
/// # Errors
/// Propagates any [`crate::error::AnalysisError`] from the underlying
/// `analyze` calls (e.g. an unparsable chord).
pub async fn suggest(
    service: &InterpretationService,
    chords: &[String],
    provided_key: Option<&str>,
) -> AnalysisResult<Suggestions> {
    let baseline_options = AnalysisOptions {
        parent_key: None,
        ..AnalysisOptions::default()
    };
    let baseline = service
        .analyze_without_suggestions(chords, baseline_options)
        .await?;

    match provided_key {
        None => suggest_without_key(service, chords, &baseline).await,
        Some(key_text) => suggest_with_key(service, chords, key_text, &baseline).await,
    }
}

async fn suggest_without_key(
    service: &InterpretationService,
    chords: &[String],
    baseline: &MultipleInterpretationResult,
) -> AnalysisResult<Suggestions> {
    let anchor = baseline.primary.key;

    // The no-key baseline already infers `anchor` internally (the
    // functional analyzer always picks a best-fit key even when none was
    // supplied), so scoring the anchor against that same self-inferred
    // reading nets zero improvement on every term and `add_key` could
    // never fire for the very key the progression implies. Score the
    // anchor against a zero-information reference instead — "no romans,
    // no confidence, no pattern match" — representing a caller who has
    // committed to nothing at all, which is what supplying a key
    // actually replaces.
    let anchor_result = analyze_with_key(service, chords, anchor).await?;
    let anchor_score = relevance_score_against_null(&anchor_result);

    let candidates = related_keys(anchor);
    let mut scored: Vec<(Key, f64)> = Vec::with_capacity(candidates.len() + 1);
    scored.push((anchor, anchor_score));
    for candidate in candidates {
        let result = analyze_with_key(service, chords, candidate).await?;
        scored.push((candidate, relevance_score(&result, baseline)));
    }

    let mut suggestions = Vec::new();
    for (key, score) in scored {
        if score > ADD_KEY_SCORE_THRESHOLD {
            suggestions.push(Suggestion::AddKey {
                key,
                reason: format!(
                    "Supplying {} as the parent key clarifies the Roman-numeral reading",
                    key.display_name()
                ),
                confidence: suggestion_confidence(score),
                expected_improvement: format!("relevance score {score:.2} above baseline"),
            });
        }
    }
    suggestions.sort_by(|a, b| b.confidence().partial_cmp(&a.confidence()).unwrap_or(std::cmp::Ordering::Equal));

    Ok(Suggestions { suggestions })
}

async fn suggest_with_key(
    service: &InterpretationService,
    chords: &[String],
    key_text: &str,
    baseline: &MultipleInterpretationResult,
) -> AnalysisResult<Suggestions> {
    let provided_options = AnalysisOptions {
        parent_key: Some(key_text.to_string()),
        ..AnalysisOptions::default()
    };
    let with_provided_key = service
        .analyze_without_suggestions(chords, provided_options)
        .await?;
    let score_a = relevance_score(&with_provided_key, baseline);

    if score_a < 0.0 {
        return Ok(Suggestions {
            suggestions: vec![Suggestion::RemoveKey {
                reason: "The supplied parent key does not improve the analysis over no key"
                    .to_string(),
                confidence: suggestion_confidence(-score_a),
                expected_improvement: format!("relevance score without key exceeds supplied key by {:.2}", -score_a),
            }],
        });
    }

    let anchor = with_provided_key.primary.key;
    let candidates = related_keys(anchor);
    let mut best: Option<(Key, f64)> = None;
    for candidate in candidates {
        let result = analyze_with_key(service, chords, candidate).await?;
        let score = relevance_score(&result, baseline);
        if best.as_ref().is_none_or(|&(_, b)| score > b) {
            best = Some((candidate, score));
        }
    }

    if let Some((key, score)) = best {
        if score > score_a + CHANGE_KEY_SCORE_MARGIN {
            return Ok(Suggestions {
                suggestions: vec![Suggestion::ChangeKey {
                    key,
                    reason: format!(
                        "{} yields a clearer analysis than the supplied key",
                        key.display_name()
                    ),
                    confidence: suggestion_confidence(score - score_a),
                    expected_improvement: format!("relevance score margin {:.2}", score - score_a),
                }],
            });
        }
    }

    Ok(Suggestions::default())
}

async fn analyze_with_key(
    service: &InterpretationService,
    chords: &[String],
    key: Key,
) -> AnalysisResult<MultipleInterpretationResult> {
    let options = AnalysisOptions {
        parent_key: Some(key.display_name()),
        ..AnalysisOptions::default()
    };
    service.analyze_without_suggestions(chords, options).await
}

/// The key-relevance score (§4.H): how much `candidate` improves on a
/// reference reading, as a weighted combination of four signed
/// `_improvement` terms, each bounded to `[-1.0, 1.0]`. A positive score
/// means `candidate` reads better than the reference; a negative score
/// (only reachable when scoring the *supplied* key against the no-key
/// baseline) is what triggers `remove_key`.
fn relevance_score_core(
    candidate: &MultipleInterpretationResult,
    reference_has_romans: bool,
    reference_confidence: f64,
    reference_type_rank: f64,
    reference_matches_pattern: bool,
) -> f64 {
    let rn_improvement = signed_binary(!candidate.primary.roman_numerals.is_empty(), reference_has_romans);
    let confidence_improvement = (candidate.primary.confidence - reference_confidence).clamp(-1.0, 1.0);
    let type_improvement =
        (type_rank(candidate.primary.interpretation_type) - reference_type_rank).clamp(-1.0, 1.0);
    let pattern_improvement = signed_binary(
        matches_strong_pattern(&candidate.primary.roman_numerals),
        reference_matches_pattern,
    );

    0.3 * rn_improvement + 0.2 * confidence_improvement + 0.2 * type_improvement + 0.3 * pattern_improvement
}

/// How much `candidate` improves on `baseline` (the no-key analysis).
fn relevance_score(candidate: &MultipleInterpretationResult, baseline: &MultipleInterpretationResult) -> f64 {
    relevance_score_core(
        candidate,
        !baseline.primary.roman_numerals.is_empty(),
        baseline.primary.confidence,
        type_rank(baseline.primary.interpretation_type),
        matches_strong_pattern(&baseline.primary.roman_numerals),
    )
}

/// How much `candidate` improves on a zero-information reference — no
/// romans, the evidence-less confidence floor, the lowest type rank, no
/// pattern match — standing in for a caller who has committed to no key
/// at all (§4.H: scoring the no-key baseline's own implied key against
/// itself would always net zero, so this is scored against "nothing"
/// instead of against the self-inferred baseline).
fn relevance_score_against_null(candidate: &MultipleInterpretationResult) -> f64 {
    relevance_score_core(candidate, false, NO_EVIDENCE_CONFIDENCE, 0.0, false)
}

fn signed_binary(candidate_has_it: bool, baseline_has_it: bool) -> f64 {
    f64::from(candidate_has_it) - f64::from(baseline_has_it)
}

/// Functional is preferred over an empty modal reading (§4.H example);
/// chromatic sits between the two since it always carries romans too.
fn type_rank(interpretation_type: InterpretationType) -> f64 {
    match interpretation_type {
        InterpretationType::Functional => 1.0,
        InterpretationType::Chromatic => 0.5,
        InterpretationType::Modal => 0.0,
    }
}

/// Re-normalize a qualifying raw score into `[0.55, 1.0]` (§4.H). The
/// explicit `< 0.55` filter the spec also names is a belt-and-suspenders
/// check: this mapping already guarantees the floor for any
/// non-negative input.
fn suggestion_confidence(raw_score: f64) -> f64 {
    let clamped = raw_score.clamp(0.0, 1.0);
    0.55 + clamped * 0.45
}

/// The "≤6 closest related candidate keys" (§4.H, §9 ambient note):
/// fifth-up, fifth-down, relative, parallel, deduplicated and capped —
/// values that coincide with the anchor or each other are dropped
/// rather than padded out to a fixed count.
fn related_keys(anchor: Key) -> Vec<Key> {
    let raw = [
        anchor.fifth_up(),
        anchor.fifth_down(),
        anchor.relative(),
        anchor.parallel(),
    ];
    let mut out: Vec<Key> = Vec::new();
    for key in raw {
        if key != anchor && !out.contains(&key) {
            out.push(key);
        }
    }
    out.truncate(MAX_RELATED_KEY_CANDIDATES);
    out
}
