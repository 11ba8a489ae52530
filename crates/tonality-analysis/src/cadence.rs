//! Cadences (§3.1, §4.C.4) — the intrinsic-strength table lives in
//! `tonality_config::CADENCE_STRENGTHS`; this module only names the
//! variants and the detection routine shared by the functional and
//! modal analyzers.

use serde::{Deserialize, Serialize};
use tonality_config::CadenceStrengths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CadenceType {
    Authentic,
    Plagal,
    Deceptive,
    Half,
    Phrygian,
    Modal,
}

impl CadenceType {
    #[must_use]
    pub const fn intrinsic_strength(self, table: &CadenceStrengths) -> f64 {
        match self {
            Self::Authentic => table.authentic,
            Self::Plagal => table.plagal,
            Self::Deceptive => table.deceptive,
            Self::Half => table.half,
            Self::Phrygian => table.phrygian,
            Self::Modal => table.modal,
        }
    }
}

/// A detected cadence: its type, the chord-index span it covers, and its
/// intrinsic strength (§4.3/§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cadence {
    pub cadence_type: CadenceType,
    pub start_index: usize,
    pub end_index: usize,
    pub strength: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsic_strengths_match_spec_table() {
        let table = tonality_config::CADENCE_STRENGTHS;
        assert_eq!(CadenceType::Authentic.intrinsic_strength(&table), 0.9);
        assert_eq!(CadenceType::Plagal.intrinsic_strength(&table), 0.65);
        assert_eq!(CadenceType::Half.intrinsic_strength(&table), 0.5);
    }
}
