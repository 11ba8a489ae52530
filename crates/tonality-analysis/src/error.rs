//! Error taxonomy for the analysis engine (§7).

use thiserror::Error;
use tonality_core::error::ChordTheoryError;

/// Errors surfaced across the crate's public entry points. `InputError`
/// variants (`EmptyProgression`, `UnparsableChord`) and the wrapped
/// [`ChordTheoryError`] short-circuit at the service boundary before any
/// analyzer runs (§7 propagation policy); `InternalInconsistency` is
/// reserved for invariant violations (§3) that should only fire in the
/// presence of a bug. `AnalysisDegraded` is deliberately not a variant
/// here — per spec it "is not an error per se" and is represented by an
/// analyzer returning an empty evidence vector instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Empty input was given to any of the `analyze_*` entry points.
    #[error("progression is empty")]
    EmptyProgression,

    /// A chord symbol in the input could not be parsed; the error names
    /// both the offending text and its 0-based position, per §7's
    /// "names the chord and its position" requirement.
    #[error("unparsable chord {symbol:?} at position {position}")]
    UnparsableChord { symbol: String, position: usize },

    /// A failure from the lower-level chord/note/key parser.
    #[error(transparent)]
    ChordTheory(#[from] ChordTheoryError),

    /// An invariant from §3 was violated mid-pipeline. Fatal; should only
    /// occur in the presence of a bug.
    #[error("internal inconsistency: {detail}")]
    InternalInconsistency { detail: String },
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    /// Whether this error reflects malformed caller input (recoverable)
    /// as opposed to an internal consistency problem (not).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InternalInconsistency { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_inconsistency_is_not_recoverable() {
        let err = AnalysisError::InternalInconsistency {
            detail: "primary confidence below an alternative".to_string(),
        };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn input_errors_are_recoverable() {
        assert!(AnalysisError::EmptyProgression.is_recoverable());
        assert!(AnalysisError::UnparsableChord {
            symbol: "Hx".to_string(),
            position: 2
        }
        .is_recoverable());
    }
}
