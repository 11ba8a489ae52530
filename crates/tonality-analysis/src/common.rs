//! Small shared types referenced by more than one analyzer or by the
//! interpretation service, kept in one place so they are not redefined
//! per module.

use serde::{Deserialize, Serialize};

/// Which analytical lens produced an [`crate::interpretation::Interpretation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpretationType {
    Functional,
    Modal,
    Chromatic,
}

impl InterpretationType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Functional => "functional",
            Self::Modal => "modal",
            Self::Chromatic => "chromatic",
        }
    }
}

/// Contextual classification shared by the modal analyzer (§4.D.5) and
/// the scale/melody analyzer (§4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Diatonic,
    ModalBorrowing,
    ModalCandidate,
}

/// Relationship between a supplied parent key and what the analyzer
/// actually found (§3.1 Interpretation, §8.1 parent-key honesty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentKeyRelationship {
    Matches,
    Conflicts,
    None,
}
