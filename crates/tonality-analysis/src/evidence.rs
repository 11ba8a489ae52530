//! Evidence and confidence calibration (§3.1, §4.G.2-3). All evidence
//! collection lives in this crate's service layer, driven by the facts
//! the analyzers return — per §9's design note, analyzers never build
//! `Evidence` values themselves.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;
use tonality_config::{EvidenceWeights, DIVERSITY_BONUS, NO_EVIDENCE_CONFIDENCE};

use crate::common::InterpretationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceType {
    Cadential,
    Structural,
    Intervallic,
    Harmonic,
    Contextual,
}

/// A single theory-grounded fact with a weight (§3.1). `strength` is
/// clamped to `[0.0, 1.0]` at construction so the invariant can never be
/// violated by a caller forgetting to clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub evidence_type: EvidenceType,
    pub strength: f64,
    pub supports: SmallVec<[InterpretationType; 3]>,
    pub description: String,
    pub theory_basis: String,
}

impl Evidence {
    #[must_use]
    pub fn new(
        evidence_type: EvidenceType,
        strength: f64,
        supports: impl IntoIterator<Item = InterpretationType>,
        description: impl Into<String>,
        theory_basis: impl Into<String>,
    ) -> Self {
        Self {
            evidence_type,
            strength: strength.clamp(0.0, 1.0),
            supports: supports.into_iter().collect(),
            description: description.into(),
            theory_basis: theory_basis.into(),
        }
    }
}

fn weight_for(evidence_type: EvidenceType, weights: &EvidenceWeights) -> f64 {
    match evidence_type {
        EvidenceType::Cadential => weights.cadential,
        EvidenceType::Structural => weights.structural,
        EvidenceType::Intervallic => weights.intervallic,
        EvidenceType::Harmonic => weights.harmonic,
        EvidenceType::Contextual => weights.contextual,
    }
}

/// The confidence-calibration formula (§4.G.3): a weighted mean of
/// evidence strengths, plus a diversity bonus when more than one
/// distinct evidence type contributed, clamped to `[0.0, 1.0]`. An
/// interpretation with no evidence at all floors at
/// [`NO_EVIDENCE_CONFIDENCE`].
#[must_use]
pub fn calibrate_confidence(evidence: &[Evidence], weights: &EvidenceWeights) -> f64 {
    if evidence.is_empty() {
        return NO_EVIDENCE_CONFIDENCE;
    }

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for e in evidence {
        let w = weight_for(e.evidence_type, weights);
        weighted_sum += e.strength * w;
        weight_sum += w;
    }
    let base = if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        NO_EVIDENCE_CONFIDENCE
    };

    let distinct_types: HashSet<EvidenceType> = evidence.iter().map(|e| e.evidence_type).collect();
    let diversity_bonus = if distinct_types.len() > 1 {
        DIVERSITY_BONUS
    } else {
        0.0
    };

    (base + diversity_bonus).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonality_config::EVIDENCE_WEIGHTS;

    #[test]
    fn no_evidence_floors_at_no_evidence_confidence() {
        assert_eq!(calibrate_confidence(&[], &EVIDENCE_WEIGHTS), NO_EVIDENCE_CONFIDENCE);
    }

    #[test]
    fn single_strong_cadential_evidence_near_its_strength() {
        let evidence = vec![Evidence::new(
            EvidenceType::Cadential,
            0.9,
            [InterpretationType::Functional],
            "authentic cadence",
            "V-I resolution",
        )];
        let confidence = calibrate_confidence(&evidence, &EVIDENCE_WEIGHTS);
        // single evidence type: no diversity bonus, base == strength (one item weighted mean == strength)
        assert!((confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn diversity_bonus_applies_with_two_distinct_types() {
        let evidence = vec![
            Evidence::new(
                EvidenceType::Cadential,
                0.9,
                [InterpretationType::Functional],
                "authentic cadence",
                "V-I resolution",
            ),
            Evidence::new(
                EvidenceType::Structural,
                0.6,
                [InterpretationType::Functional],
                "tonic frames progression",
                "first/last chord is tonic",
            ),
        ];
        let with_bonus = calibrate_confidence(&evidence, &EVIDENCE_WEIGHTS);
        let single_type = calibrate_confidence(&evidence[..1], &EVIDENCE_WEIGHTS);
        assert!(with_bonus > single_type - 0.9); // sanity: bonus is additive, not multiplicative collapse
        assert!(with_bonus <= 1.0);
    }

    #[test]
    fn confidence_always_in_unit_range() {
        let evidence = vec![Evidence::new(
            EvidenceType::Harmonic,
            1.0,
            [InterpretationType::Functional],
            "all diatonic",
            "fraction of diatonic chords",
        )];
        let confidence = calibrate_confidence(&evidence, &EVIDENCE_WEIGHTS);
        assert!((0.0..=1.0).contains(&confidence));
    }
}
