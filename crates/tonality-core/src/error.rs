//! Error types for pitch, chord and key construction and parsing.

use thiserror::Error;

/// Errors raised while constructing or parsing core data-model values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChordTheoryError {
    /// The chord symbol could not be recognized by the grammar in
    /// `parser::parse`.
    #[error("invalid chord symbol: {symbol:?}")]
    InvalidChord { symbol: String },

    /// The input was empty (or all whitespace) after trimming.
    #[error("empty input")]
    EmptyInput,

    /// A bare note token (letter plus optional accidental) could not be
    /// parsed.
    #[error("unparsable note: {token:?}")]
    UnparsableNote { token: String },

    /// A human-readable key name (e.g. "C major") could not be parsed.
    #[error("invalid key: {text:?}")]
    InvalidKey { text: String },

    /// Two or more alterations on a chord are mutually incompatible
    /// (e.g. `b5` and `#5` together).
    #[error("incompatible chord alterations: {alterations:?}")]
    IncompatibleAlterations { alterations: Vec<String> },
}

/// Result type for chord theory operations.
pub type ChordTheoryResult<T> = Result<T, ChordTheoryError>;

impl ChordTheoryError {
    /// Whether this error reflects malformed caller input (recoverable by
    /// asking the caller to fix the input) as opposed to an internal
    /// consistency problem.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidChord { .. }
                | Self::EmptyInput
                | Self::UnparsableNote { .. }
                | Self::InvalidKey { .. }
                | Self::IncompatibleAlterations { .. }
        )
    }
}
