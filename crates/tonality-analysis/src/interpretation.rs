//! Interpretation and result types (§3.1): the shapes the interpretation
//! service (§4.G) produces and the suggestion engine (§4.H) extends.

use serde::{Deserialize, Serialize};
use tonality_config::PedagogicalLevel;
use tonality_core::constants::ModeName;
use tonality_core::key::Key;
use tonality_core::roman::RomanNumeral;

use crate::cadence::Cadence;
use crate::chromatic::{BorrowedChord, ChromaticMediant};
use crate::common::{Classification, InterpretationType, ParentKeyRelationship};
use crate::evidence::Evidence;
use crate::suggestions::Suggestions;

/// A secondary dominant as surfaced on an [`Interpretation`] (§3.1:
/// "sequence of `{chord, target, roman}`"), rendered to display text
/// rather than raw indices so a collaborator can show it without
/// re-resolving chord positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryDominantDisplay {
    pub chord: String,
    pub target: String,
    pub roman: String,
}

/// A borrowed chord as surfaced on an [`Interpretation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowedChordDisplay {
    pub chord: String,
    pub roman: String,
    pub borrowed_from: String,
}

/// A chromatic mediant as surfaced on an [`Interpretation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromaticMediantDisplay {
    pub chord: String,
    pub interval_from_tonic: String,
}

impl SecondaryDominantDisplay {
    #[must_use]
    pub fn from_facts(
        facts: &crate::chromatic::SecondaryDominant,
        chords: &[tonality_core::Chord],
    ) -> Self {
        Self {
            chord: chords[facts.chord_index].symbol.clone(),
            target: chords[facts.target_index].symbol.clone(),
            roman: facts.roman.text.clone(),
        }
    }
}

impl BorrowedChordDisplay {
    #[must_use]
    pub fn from_facts(facts: &BorrowedChord, chords: &[tonality_core::Chord]) -> Self {
        Self {
            chord: chords[facts.chord_index].symbol.clone(),
            roman: facts.roman.text.clone(),
            borrowed_from: facts.borrowed_from.to_string(),
        }
    }
}

impl ChromaticMediantDisplay {
    #[must_use]
    pub fn from_facts(facts: &ChromaticMediant, chords: &[tonality_core::Chord]) -> Self {
        Self {
            chord: chords[facts.chord_index].symbol.clone(),
            interval_from_tonic: facts.interval_from_tonic.to_string(),
        }
    }
}

/// The per-interpretation-type confidence breakdown (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub functional: f64,
    pub modal: f64,
    pub chromatic: f64,
}

/// A single analytical reading of a progression (§3.1 Interpretation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub interpretation_type: InterpretationType,
    pub confidence: f64,
    pub summary: String,
    pub roman_numerals: Vec<RomanNumeral>,
    pub key: Key,
    pub mode: Option<ModeName>,
    pub cadences: Vec<Cadence>,
    pub evidence: Vec<Evidence>,
    pub chord_functions: Vec<String>,
    pub modal_characteristics: Vec<String>,
    pub secondary_dominants: Vec<SecondaryDominantDisplay>,
    pub borrowed_chords: Vec<BorrowedChordDisplay>,
    pub chromatic_mediants: Vec<ChromaticMediantDisplay>,
    pub contextual_classification: Classification,
    pub parent_key_relationship: ParentKeyRelationship,
    pub breakdown: ConfidenceBreakdown,
}

/// An alternative interpretation paired with its relationship to the
/// primary reading (§4.G.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeInterpretation {
    pub interpretation: Interpretation,
    pub relationship_to_primary: String,
}

/// The request that produced a [`MultipleInterpretationResult`] (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub chords: Vec<String>,
    pub parent_key: Option<String>,
    pub pedagogical_level: PedagogicalLevel,
    pub confidence_threshold: f64,
    pub max_alternatives: usize,
}

/// Metadata describing how a [`MultipleInterpretationResult`] was
/// produced (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub duration_ms: f64,
    pub interpretations_considered: usize,
    pub confidence_threshold_used: f64,
    pub pedagogical_level: PedagogicalLevel,
}

/// The interpretation service's top-level result (§3.1 contract,
/// §4.G.1 step 5/6). Invariant: `primary.confidence` is greater than or
/// equal to every alternative's confidence, and every alternative
/// satisfies the effective threshold (§8.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleInterpretationResult {
    pub input: AnalysisInput,
    pub primary: Interpretation,
    pub alternatives: Vec<AlternativeInterpretation>,
    pub suggestions: Option<Suggestions>,
    pub metadata: AnalysisMetadata,
}
