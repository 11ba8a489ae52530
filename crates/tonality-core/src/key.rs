//! Keys and modes — the "parent key + local tonic" pair (§9's central
//! design constraint). A [`Key`] never collapses those two ideas: the
//! tonic is the note the key is named after, `parent_key_tonic` is the
//! tonic of the underlying diatonic collection (identical to `tonic` for
//! major/minor; different for a named church mode).

use serde::{Deserialize, Serialize};

use crate::constants::{ChordQuality, ModeName, MAJOR_KEY_DEGREE_QUALITY, MINOR_KEY_DEGREE_QUALITY};
use crate::pitch::{Note, PitchClass};

/// The three shapes a key's mode can take (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyMode {
    Major,
    Minor,
    Church(ModeName),
}

impl KeyMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Church(m) => m.name(),
        }
    }

    /// Offsets from the local tonic that this mode's seven scale degrees
    /// occupy (§4.A's modal interval patterns; major/minor reduce to
    /// Ionian/Aeolian).
    #[must_use]
    pub const fn interval_pattern(self) -> [i32; 7] {
        match self {
            Self::Major => ModeName::Ionian.interval_pattern(),
            Self::Minor => ModeName::Aeolian.interval_pattern(),
            Self::Church(m) => m.interval_pattern(),
        }
    }
}

/// A key: a tonic, a mode, and (for modes) the parent diatonic
/// collection's tonic. Invariant (§3.1): for a fixed `(mode, tonic)` the
/// parent-key tonic is uniquely determined — it is never stored
/// independently of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub tonic: Note,
    pub mode: KeyMode,
    parent_key_tonic: Note,
}

impl Key {
    #[must_use]
    pub fn major(tonic: Note) -> Self {
        Self {
            tonic,
            mode: KeyMode::Major,
            parent_key_tonic: tonic,
        }
    }

    #[must_use]
    pub fn minor(tonic: Note) -> Self {
        let parent_pc = tonic.pitch_class() + 3;
        Self {
            tonic,
            mode: KeyMode::Minor,
            parent_key_tonic: Note::from_pitch_class(parent_pc, prefers_sharp(tonic)),
        }
    }

    /// Construct a church-mode key: `tonic` is the local tonic, `mode`
    /// names which of the seven rotations it occupies. The parent-key
    /// tonic is derived, not supplied, per the uniqueness invariant.
    #[must_use]
    pub fn church(tonic: Note, mode: ModeName) -> Self {
        let degree_offset = crate::constants::MAJOR_SCALE_PATTERN[mode.degree_index()];
        let parent_pc = tonic.pitch_class() + (-(degree_offset));
        Self {
            tonic,
            mode: KeyMode::Church(mode),
            parent_key_tonic: Note::from_pitch_class(parent_pc, prefers_sharp(tonic)),
        }
    }

    #[must_use]
    pub const fn parent_key_tonic(&self) -> Note {
        self.parent_key_tonic
    }

    /// Human-readable form, e.g. `"C major"`, `"A minor"`, `"G Mixolydian"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.tonic.symbol(), self.mode.name())
    }

    /// Absolute pitch class of the given scale degree (1-7), relative to
    /// this key's own local tonic (not the parent tonic).
    #[must_use]
    pub fn degree_pitch_class(&self, degree: u8) -> PitchClass {
        let idx = (degree.saturating_sub(1) as usize) % 7;
        self.tonic.pitch_class() + self.mode.interval_pattern()[idx]
    }

    /// The seven pitch classes of this key's scale, in degree order.
    #[must_use]
    pub fn scale_pitch_classes(&self) -> Vec<PitchClass> {
        (1..=7).map(|d| self.degree_pitch_class(d)).collect()
    }

    #[must_use]
    pub fn contains_pitch_class(&self, pc: PitchClass) -> bool {
        self.scale_pitch_classes().contains(&pc)
    }

    /// Scale degree (1-7) that `pc` occupies in this key, if it is
    /// diatonic.
    #[must_use]
    pub fn degree_of(&self, pc: PitchClass) -> Option<u8> {
        self.scale_pitch_classes()
            .iter()
            .position(|&p| p == pc)
            .map(|idx| (idx + 1) as u8)
    }

    /// Default triad quality for a scale degree in this key. For
    /// major/minor this is the §4.A table; for a named mode it is
    /// derived by stacking thirds within the mode's own interval
    /// pattern, since the seven modes do not each get a bespoke table.
    #[must_use]
    pub fn degree_quality(&self, degree: u8) -> ChordQuality {
        match self.mode {
            KeyMode::Major => MAJOR_KEY_DEGREE_QUALITY
                .get(&degree)
                .copied()
                .unwrap_or(ChordQuality::Major),
            KeyMode::Minor => MINOR_KEY_DEGREE_QUALITY
                .get(&degree)
                .copied()
                .unwrap_or(ChordQuality::Minor),
            KeyMode::Church(_) => triad_quality_from_pattern(
                self.mode.interval_pattern(),
                (degree.saturating_sub(1) as usize) % 7,
            ),
        }
    }

    /// The parallel mode of this key (parallel minor for a major key,
    /// parallel major for a minor key) — used by the chromatic analyzer's
    /// borrowed-chord rule (§4.E). Returns `self` unchanged for a church
    /// mode, since "parallel" is only defined for major/minor here.
    #[must_use]
    pub fn parallel(&self) -> Self {
        match self.mode {
            KeyMode::Major => Self::minor(self.tonic),
            KeyMode::Minor => Self::major(self.tonic),
            KeyMode::Church(_) => *self,
        }
    }

    /// Relative key: relative minor of a major key, relative major of a
    /// minor key (shares the same parent/scale collection, different
    /// local tonic). Used by the suggestion engine's related-key set.
    #[must_use]
    pub fn relative(&self) -> Self {
        match self.mode {
            KeyMode::Major => Self::minor(Note::from_pitch_class(
                self.tonic.pitch_class() + (-3),
                prefers_sharp(self.tonic),
            )),
            KeyMode::Minor => Self::major(self.parent_key_tonic),
            KeyMode::Church(_) => *self,
        }
    }

    /// A key a perfect fifth above this one's tonic, same mode family
    /// (major stays major, minor stays minor).
    #[must_use]
    pub fn fifth_up(&self) -> Self {
        let new_tonic = Note::from_pitch_class(self.tonic.pitch_class() + 7, prefers_sharp(self.tonic));
        match self.mode {
            KeyMode::Minor => Self::minor(new_tonic),
            _ => Self::major(new_tonic),
        }
    }

    /// A key a perfect fifth below this one's tonic, same mode family.
    #[must_use]
    pub fn fifth_down(&self) -> Self {
        let new_tonic = Note::from_pitch_class(self.tonic.pitch_class() + (-7), prefers_sharp(self.tonic));
        match self.mode {
            KeyMode::Minor => Self::minor(new_tonic),
            _ => Self::major(new_tonic),
        }
    }

    /// Parse a human-readable key name (§6): a note letter (optional
    /// accidental, case-insensitive) followed by `major`, `minor`, or one
    /// of the seven church-mode names, e.g. `"C major"`, `"a minor"`,
    /// `"G Mixolydian"`.
    ///
    /// # Errors
    /// Returns [`crate::error::ChordTheoryError::InvalidKey`] if the text
    /// doesn't parse as `<note> <mode word>`.
    pub fn parse(text: &str) -> crate::error::ChordTheoryResult<Self> {
        let trimmed = text.trim();
        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let tonic_text = parts.next().unwrap_or_default();
        let mode_text = parts.next().unwrap_or_default().trim();

        let tonic = crate::parser::parse_note(tonic_text).map_err(|_| {
            crate::error::ChordTheoryError::InvalidKey {
                text: text.to_string(),
            }
        })?;

        match mode_text.to_ascii_lowercase().as_str() {
            "major" | "" => Ok(Self::major(tonic)),
            "minor" => Ok(Self::minor(tonic)),
            other => ModeName::ALL
                .into_iter()
                .find(|m| m.name().eq_ignore_ascii_case(other))
                .map(|mode| Self::church(tonic, mode))
                .ok_or_else(|| crate::error::ChordTheoryError::InvalidKey {
                    text: text.to_string(),
                }),
        }
    }
}

/// Spelling bias heuristic: a tonic already spelled with a sharp (or a
/// natural with no flat-key context) prefers sharp spellings for derived
/// notes; a tonic spelled with a flat prefers flats. This is a display
/// nicety only — pitch-class identity never depends on it.
#[must_use]
const fn prefers_sharp(tonic: Note) -> bool {
    !matches!(tonic.accidental, crate::pitch::Accidental::Flat)
}

fn triad_quality_from_pattern(pattern: [i32; 7], degree_idx: usize) -> ChordQuality {
    let root = pattern[degree_idx];
    let raw_third = pattern[(degree_idx + 2) % 7];
    let raw_fifth = pattern[(degree_idx + 4) % 7];
    let third = if (degree_idx + 2) >= 7 {
        raw_third + 12 - root
    } else {
        raw_third - root
    };
    let fifth = if (degree_idx + 4) >= 7 {
        raw_fifth + 12 - root
    } else {
        raw_fifth - root
    };
    match (third, fifth) {
        (4, 7) => ChordQuality::Major,
        (3, 7) => ChordQuality::Minor,
        (3, 6) => ChordQuality::Diminished,
        (4, 8) => ChordQuality::Augmented,
        _ => ChordQuality::Major,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Accidental;

    #[test]
    fn major_key_scale_matches_c_major() {
        let c = Key::major(Note::new('C', Accidental::Natural).unwrap());
        let pcs: Vec<u8> = c.scale_pitch_classes().iter().map(|p| p.value()).collect();
        assert_eq!(pcs, vec![0, 2, 4, 5, 7, 9, 11]);
    }

    #[test]
    fn minor_key_parent_is_relative_major() {
        let a_minor = Key::minor(Note::new('A', Accidental::Natural).unwrap());
        assert_eq!(a_minor.parent_key_tonic().pitch_class().value(), 0);
    }

    #[test]
    fn g_mixolydian_parent_is_c_major() {
        let g_mixo = Key::church(
            Note::new('G', Accidental::Natural).unwrap(),
            ModeName::Mixolydian,
        );
        assert_eq!(g_mixo.parent_key_tonic().pitch_class().value(), 0);
        assert_eq!(g_mixo.display_name(), "G Mixolydian");
    }

    #[test]
    fn degree_quality_matches_major_key_table() {
        let c = Key::major(Note::new('C', Accidental::Natural).unwrap());
        assert_eq!(c.degree_quality(5), ChordQuality::Major);
        assert_eq!(c.degree_quality(2), ChordQuality::Minor);
        assert_eq!(c.degree_quality(7), ChordQuality::Diminished);
    }

    #[test]
    fn church_mode_degree_quality_derived_from_pattern() {
        let d_dorian = Key::church(
            Note::new('D', Accidental::Natural).unwrap(),
            ModeName::Dorian,
        );
        // i, IV in Dorian are minor and major respectively.
        assert_eq!(d_dorian.degree_quality(1), ChordQuality::Minor);
        assert_eq!(d_dorian.degree_quality(4), ChordQuality::Major);
    }

    #[test]
    fn parallel_and_relative_keys() {
        let c_major = Key::major(Note::new('C', Accidental::Natural).unwrap());
        assert_eq!(c_major.parallel().mode, KeyMode::Minor);
        assert_eq!(c_major.relative().tonic.pitch_class().value(), 9); // A
    }

    #[test]
    fn fifths_up_and_down() {
        let c_major = Key::major(Note::new('C', Accidental::Natural).unwrap());
        assert_eq!(c_major.fifth_up().tonic.pitch_class().value(), 7); // G
        assert_eq!(c_major.fifth_down().tonic.pitch_class().value(), 5); // F
    }

    #[test]
    fn parse_human_readable_key_names() {
        let c_major = Key::parse("C major").unwrap();
        assert_eq!(c_major.mode, KeyMode::Major);
        let a_minor = Key::parse("a minor").unwrap();
        assert_eq!(a_minor.mode, KeyMode::Minor);
        let g_mixo = Key::parse("G Mixolydian").unwrap();
        assert_eq!(g_mixo.mode, KeyMode::Church(ModeName::Mixolydian));
    }

    #[test]
    fn parse_rejects_unrecognized_mode_word() {
        assert!(Key::parse("C bogus").is_err());
    }
}
