//! Configuration constants and tunable thresholds for the tonality engine.
//!
//! Every numeric constant named by the analysis design (cadence strengths,
//! evidence weights, confidence thresholds, cache sizing, suggestion
//! weights) lives here as a single `pub const` table, so a calibration
//! change is a one-line edit rather than a hunt through analyzer code.

use serde::{Deserialize, Serialize};

/// Core musical constants (scale size, chromatic space, chord vocabulary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicalConstants {
    pub scale_degrees: u8,
    pub chromatic_notes: u8,
    pub chord_types: &'static [u8],
    pub max_extensions: u8,
}

/// Default musical constants.
pub const MUSICAL: MusicalConstants = MusicalConstants {
    scale_degrees: 7,
    chromatic_notes: 12,
    chord_types: &[5, 7, 9, 11, 13],
    max_extensions: 3,
};

/// Intrinsic strength of each cadence type, used both as the functional
/// analyzer's raw-confidence "cadence bonus" and as cadential evidence
/// strength in the interpretation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceStrengths {
    pub authentic: f64,
    pub plagal: f64,
    pub deceptive: f64,
    pub half: f64,
    pub phrygian: f64,
    pub modal: f64,
}

/// Default cadence strengths, centralizing the values the design doc
/// otherwise leaves scattered through prose ("plagal 0.65", etc).
pub const CADENCE_STRENGTHS: CadenceStrengths = CadenceStrengths {
    authentic: 0.9,
    plagal: 0.65,
    deceptive: 0.7,
    half: 0.5,
    phrygian: 0.8,
    modal: 0.75,
};

/// Weights used by the confidence-calibration weighted mean. These are
/// intentionally allowed to sum to more than 1.0 — the calibration
/// formula divides by their sum, so the weights express *relative*
/// importance, not a probability partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceWeights {
    pub cadential: f64,
    pub structural: f64,
    pub intervallic: f64,
    pub harmonic: f64,
    pub contextual: f64,
}

pub const EVIDENCE_WEIGHTS: EvidenceWeights = EvidenceWeights {
    cadential: 0.4,
    structural: 0.25,
    intervallic: 0.2,
    harmonic: 0.15,
    contextual: 0.15,
};

/// Bonus added to the weighted-mean confidence when an interpretation is
/// supported by more than one distinct evidence type.
pub const DIVERSITY_BONUS: f64 = 0.1;

/// Confidence floor assigned to an interpretation with no evidence at all.
pub const NO_EVIDENCE_CONFIDENCE: f64 = 0.2;

/// Per-pedagogical-level default confidence thresholds used to decide
/// which alternative interpretations are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PedagogicalLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for PedagogicalLevel {
    fn default() -> Self {
        Self::Intermediate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub beginner: f64,
    pub intermediate: f64,
    pub advanced: f64,
}

pub const CONFIDENCE_THRESHOLDS: ConfidenceThresholds = ConfidenceThresholds {
    beginner: 0.70,
    intermediate: 0.50,
    advanced: 0.40,
};

impl ConfidenceThresholds {
    /// Default threshold for a given pedagogical level.
    #[must_use]
    pub const fn for_level(&self, level: PedagogicalLevel) -> f64 {
        match level {
            PedagogicalLevel::Beginner => self.beginner,
            PedagogicalLevel::Intermediate => self.intermediate,
            PedagogicalLevel::Advanced => self.advanced,
        }
    }
}

/// Default number of alternative interpretations kept after filtering.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 2;

/// Threshold below which functional and modal confidences are treated as
/// tied, for the tie-break rule in interpretation ranking.
pub const RANKING_TIE_EPSILON: f64 = 0.05;

/// Cache sizing and expiry defaults (§4.I).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDefaults {
    pub capacity: usize,
    pub ttl_seconds: u64,
}

pub const CACHE_DEFAULTS: CacheDefaults = CacheDefaults {
    capacity: 500,
    ttl_seconds: 600,
};

/// Weights for the suggestion engine's key-relevance score (§4.H).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionWeights {
    pub roman_numeral_improvement: f64,
    pub confidence_improvement: f64,
    pub analysis_type_improvement: f64,
    pub pattern_clarity_improvement: f64,
}

pub const SUGGESTION_WEIGHTS: SuggestionWeights = SuggestionWeights {
    roman_numeral_improvement: 0.3,
    confidence_improvement: 0.2,
    analysis_type_improvement: 0.2,
    pattern_clarity_improvement: 0.3,
};

/// Minimum key-relevance score for an `add_key` suggestion to be emitted
/// when no parent key was supplied.
pub const ADD_KEY_SCORE_THRESHOLD: f64 = 0.55;

/// Minimum score margin by which a related candidate key must beat the
/// provided key's score before a `change_key` suggestion is emitted.
pub const CHANGE_KEY_SCORE_MARGIN: f64 = 0.15;

/// Suggestions below this (renormalized) confidence are filtered out.
pub const SUGGESTION_CONFIDENCE_FLOOR: f64 = 0.55;

/// Maximum number of related candidate keys considered by the suggestion
/// engine (fifth-up, fifth-down, relative minor/major, parallel
/// minor/major — at most 6, fewer if some candidates coincide).
pub const MAX_RELATED_KEY_CANDIDATES: usize = 6;

/// Error type for configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration value: {field} = {value}")]
    InvalidValue { field: String, value: String },

    #[error("configuration value out of range: {field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },
}

/// Validation trait implemented by every configuration table.
pub trait Validate {
    /// Validate the configuration values.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a value is out of its documented range.
    fn validate(&self) -> Result<(), ConfigError>;
}

impl Validate for MusicalConstants {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.scale_degrees == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scale_degrees".to_string(),
                value: "0".to_string(),
            });
        }
        if self.chromatic_notes != 12 {
            return Err(ConfigError::InvalidValue {
                field: "chromatic_notes".to_string(),
                value: self.chromatic_notes.to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for CadenceStrengths {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("authentic", self.authentic),
            ("plagal", self.plagal),
            ("deceptive", self.deceptive),
            ("half", self.half),
            ("phrygian", self.phrygian),
            ("modal", self.modal),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field: name.to_string(),
                    min: "0.0".to_string(),
                    max: "1.0".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Validate for ConfidenceThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.advanced <= self.intermediate && self.intermediate <= self.beginner) {
            return Err(ConfigError::OutOfRange {
                field: "confidence_thresholds".to_string(),
                min: "advanced".to_string(),
                max: "beginner".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for CacheDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capacity".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn musical_constants_are_valid() {
        assert_eq!(MUSICAL.scale_degrees, 7);
        assert_eq!(MUSICAL.chromatic_notes, 12);
        assert!(MUSICAL.validate().is_ok());
    }

    #[test]
    fn cadence_strengths_match_spec_table() {
        assert_eq!(CADENCE_STRENGTHS.authentic, 0.9);
        assert_eq!(CADENCE_STRENGTHS.plagal, 0.65);
        assert_eq!(CADENCE_STRENGTHS.deceptive, 0.7);
        assert_eq!(CADENCE_STRENGTHS.half, 0.5);
        assert_eq!(CADENCE_STRENGTHS.phrygian, 0.8);
        assert_eq!(CADENCE_STRENGTHS.modal, 0.75);
        assert!(CADENCE_STRENGTHS.validate().is_ok());
    }

    #[test]
    fn evidence_weights_match_spec_table() {
        assert_eq!(EVIDENCE_WEIGHTS.cadential, 0.4);
        assert_eq!(EVIDENCE_WEIGHTS.structural, 0.25);
        assert_eq!(EVIDENCE_WEIGHTS.intervallic, 0.2);
        assert_eq!(EVIDENCE_WEIGHTS.harmonic, 0.15);
        assert_eq!(EVIDENCE_WEIGHTS.contextual, 0.15);
    }

    #[test]
    fn confidence_thresholds_ordered_by_level() {
        assert!(CONFIDENCE_THRESHOLDS.validate().is_ok());
        assert_eq!(
            CONFIDENCE_THRESHOLDS.for_level(PedagogicalLevel::Beginner),
            0.70
        );
        assert_eq!(
            CONFIDENCE_THRESHOLDS.for_level(PedagogicalLevel::Advanced),
            0.40
        );
    }

    #[test]
    fn invalid_musical_constants_rejected() {
        let invalid = MusicalConstants {
            scale_degrees: 0,
            ..MUSICAL
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn invalid_cache_defaults_rejected() {
        let invalid = CacheDefaults {
            capacity: 0,
            ..CACHE_DEFAULTS
        };
        assert!(invalid.validate().is_err());
    }
}
