//! Roman-numeral notation (§3.1). A `RomanNumeral` is a label derived
//! from a scale degree and quality, not an independent data source — its
//! textual form is always rebuilt from the structured fields, never
//! hand-assembled by a caller.

use serde::{Deserialize, Serialize};

use crate::constants::{ChordQuality, SeventhType, ROMAN_NUMERAL_BASE};

/// A Roman-numeral label (§3.1): scale degree, quality, optional applied
/// (secondary-dominant) target, optional inversion figure, and the
/// rendered textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RomanNumeral {
    pub scale_degree: u8,
    pub quality: ChordQuality,
    /// Target scale degree this chord is applied to, e.g. `2` for `V/ii`.
    pub applied_to: Option<u8>,
    pub inversion_figure: Option<String>,
    pub text: String,
}

impl RomanNumeral {
    /// Build a Roman numeral and render its textual form following the
    /// casing convention (§3.1): uppercase for major/dominant-quality
    /// degrees, lowercase for minor/diminished; `°`/`ø` mark diminished
    /// qualities; `b`/`#` prefix marks a chromatic alteration of the
    /// degree itself (as opposed to an alteration of the chord built on
    /// it).
    #[must_use]
    pub fn build(
        scale_degree: u8,
        quality: ChordQuality,
        seventh: SeventhType,
        chromatic_prefix: Option<&str>,
        applied_to: Option<u8>,
        inversion_figure: Option<String>,
    ) -> Self {
        let base = ROMAN_NUMERAL_BASE
            .get(&scale_degree)
            .copied()
            .unwrap_or("?");
        let lowercase = matches!(quality, ChordQuality::Minor | ChordQuality::Diminished);
        let mut text = String::new();
        if let Some(prefix) = chromatic_prefix {
            text.push_str(prefix);
        }
        text.push_str(&if lowercase {
            base.to_lowercase()
        } else {
            base.to_string()
        });
        match quality {
            ChordQuality::Diminished => text.push('°'),
            ChordQuality::Augmented => text.push('+'),
            _ => {}
        }
        if matches!(seventh, SeventhType::HalfDiminished7) {
            text.push('ø');
        } else if matches!(seventh, SeventhType::None) {
            // no figure
        } else {
            text.push('7');
        }
        if let Some(target) = applied_to {
            let target_base = ROMAN_NUMERAL_BASE.get(&target).copied().unwrap_or("?");
            text.push('/');
            text.push_str(&target_base.to_lowercase());
        }
        if let Some(fig) = &inversion_figure {
            text.push_str(fig);
        }
        Self {
            scale_degree,
            quality,
            applied_to,
            inversion_figure,
            text,
        }
    }

    #[must_use]
    pub const fn is_secondary_dominant(&self) -> bool {
        self.applied_to.is_some()
    }
}

impl std::fmt::Display for RomanNumeral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_degree_is_uppercase() {
        let one = RomanNumeral::build(1, ChordQuality::Major, SeventhType::None, None, None, None);
        assert_eq!(one.text, "I");
    }

    #[test]
    fn minor_degree_is_lowercase() {
        let six = RomanNumeral::build(6, ChordQuality::Minor, SeventhType::None, None, None, None);
        assert_eq!(six.text, "vi");
    }

    #[test]
    fn diminished_degree_gets_circle() {
        let seven = RomanNumeral::build(
            7,
            ChordQuality::Diminished,
            SeventhType::None,
            None,
            None,
            None,
        );
        assert_eq!(seven.text, "vii°");
    }

    #[test]
    fn dominant_seventh_appends_figure() {
        let five_seven = RomanNumeral::build(
            5,
            ChordQuality::Major,
            SeventhType::Minor7,
            None,
            None,
            None,
        );
        assert_eq!(five_seven.text, "V7");
    }

    #[test]
    fn flat_prefix_marks_chromatic_degree() {
        let flat_seven = RomanNumeral::build(
            7,
            ChordQuality::Major,
            SeventhType::None,
            Some("b"),
            None,
            None,
        );
        assert_eq!(flat_seven.text, "bVII");
    }

    #[test]
    fn secondary_dominant_applied_notation() {
        let v_of_ii = RomanNumeral::build(
            5,
            ChordQuality::Major,
            SeventhType::Minor7,
            None,
            Some(2),
            None,
        );
        assert_eq!(v_of_ii.text, "V7/ii");
        assert!(v_of_ii.is_secondary_dominant());
    }
}
