//! Chord-symbol and note-token parsing (§4.B).
//!
//! Grounded on the sharps-before-naturals greedy root match and
//! priority-ordered token scanning used by the pack's other chord
//! parsers (e.g. a regex that tries `"C#"` before `"C"` so the root
//! match never truncates a sharped letter).

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use crate::chord::{Alteration, Chord};
use crate::constants::{ChordQuality, SeventhType};
use crate::error::{ChordTheoryError, ChordTheoryResult};
use crate::pitch::{Accidental, Note};

/// Root-note token, longest match first so `"C#"` is never truncated to `"C"`.
static ROOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Ga-g](#|b)?").expect("static regex"));

/// Quality tokens, longest/most-specific first (tie-break rule 1): `maj7`
/// before `maj`, `sus4`/`sus2` before a bare extension digit, `m7b5`/`ø`
/// as a single half-diminished-seventh token, `°`/`dim7` before `dim`.
const QUALITY_TOKENS: &[(&str, ChordQuality, Option<SeventhType>)] = &[
    ("maj7", ChordQuality::Major, Some(SeventhType::Major7)),
    ("M7", ChordQuality::Major, Some(SeventhType::Major7)),
    ("m7b5", ChordQuality::Minor, Some(SeventhType::HalfDiminished7)),
    ("\u{f8}7", ChordQuality::Minor, Some(SeventhType::HalfDiminished7)), // "ø7"
    ("\u{f8}", ChordQuality::Minor, Some(SeventhType::HalfDiminished7)), // "ø"
    ("dim7", ChordQuality::Diminished, Some(SeventhType::Diminished7)),
    ("\u{b0}7", ChordQuality::Diminished, Some(SeventhType::Diminished7)), // "°7"
    ("dim", ChordQuality::Diminished, None),
    ("\u{b0}", ChordQuality::Diminished, None), // "°"
    ("sus4", ChordQuality::Sus4, None),
    ("sus2", ChordQuality::Sus2, None),
    ("aug", ChordQuality::Augmented, None),
    ("maj", ChordQuality::Major, None),
    ("M", ChordQuality::Major, None),
    ("min", ChordQuality::Minor, None),
    ("m", ChordQuality::Minor, None),
    ("-", ChordQuality::Minor, None),
    ("+", ChordQuality::Augmented, None),
    ("5", ChordQuality::Power, None),
];

/// Parse a chord symbol into a [`Chord`] (§4.B contract).
///
/// # Errors
/// [`ChordTheoryError::EmptyInput`] for an empty/whitespace symbol;
/// [`ChordTheoryError::InvalidChord`] if the grammar cannot recognize it.
pub fn parse(symbol: &str) -> ChordTheoryResult<Chord> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(ChordTheoryError::EmptyInput);
    }

    let (root, mut rest) = parse_root(trimmed)?;

    // Tie-break rule 3: a bare lowercase root with no quality token is
    // rejected — bare lowercase is not accepted chord-symbol syntax.
    let root_is_uppercase = trimmed.chars().next().is_some_and(|c| c.is_ascii_uppercase());

    let (quality, seventh_from_quality, consumed, matched_token) = match_quality(rest);
    rest = &rest[consumed..];

    if quality.is_none() && !root_is_uppercase {
        return Err(ChordTheoryError::InvalidChord {
            symbol: symbol.to_string(),
        });
    }
    let quality = quality.unwrap_or(ChordQuality::Major);
    let explicit_major_token = matches!(matched_token, Some("maj") | Some("M"));

    let mut seventh = seventh_from_quality.unwrap_or(SeventhType::None);
    let mut extensions: SmallVec<[u8; 3]> = SmallVec::new();
    let mut alterations: SmallVec<[Alteration; 4]> = SmallVec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with('/') {
            break;
        }
        if let Some(stripped) = rest.strip_prefix('7') {
            if matches!(seventh, SeventhType::None) {
                seventh = SeventhType::Minor7;
            }
            rest = stripped;
            continue;
        }
        if let Some((degree, tail)) = match_degree(rest) {
            extensions.push(degree);
            rest = tail;
            continue;
        }
        if let Some((alteration, tail)) = match_alteration(rest) {
            alterations.push(alteration);
            rest = tail;
            continue;
        }
        return Err(ChordTheoryError::InvalidChord {
            symbol: symbol.to_string(),
        });
    }

    // An extension with no explicit seventh token implies a dominant
    // (flat) seventh by standard lead-sheet convention, except when the
    // quality was spelled out as an explicit `maj`/`M` (then major
    // seventh) or the quality is diminished (then diminished seventh).
    // See DESIGN.md's resolution of this open grammar question.
    if matches!(seventh, SeventhType::None) && !extensions.is_empty() {
        seventh = if explicit_major_token {
            SeventhType::Major7
        } else if matches!(quality, ChordQuality::Diminished) {
            SeventhType::Diminished7
        } else {
            SeventhType::Minor7
        };
    }

    check_alteration_compatibility(&alterations, symbol)?;

    let bass = if let Some(bass_text) = rest.strip_prefix('/') {
        Some(parse_note(bass_text)?)
    } else {
        None
    };

    extensions.sort_unstable();
    extensions.dedup();

    Ok(Chord::new(
        root,
        quality,
        seventh,
        extensions,
        alterations,
        bass,
        symbol.to_string(),
    ))
}

fn parse_root(s: &str) -> ChordTheoryResult<(Note, &str)> {
    let m = ROOT_RE.find(s).ok_or_else(|| ChordTheoryError::InvalidChord {
        symbol: s.to_string(),
    })?;
    let matched = m.as_str();
    let mut chars = matched.chars();
    let letter = chars.next().ok_or_else(|| ChordTheoryError::InvalidChord {
        symbol: s.to_string(),
    })?;
    let accidental = match chars.next() {
        Some('#') => Accidental::Sharp,
        Some('b') => Accidental::Flat,
        _ => Accidental::Natural,
    };
    let note = Note::new(letter, accidental)?;
    Ok((note, &s[matched.len()..]))
}

/// Parse a standalone note token (§4.F, bass production). A trailing
/// octave digit is accepted and ignored (§6).
///
/// # Errors
/// [`ChordTheoryError::UnparsableNote`] if the token is not a valid note.
pub fn parse_note(token: &str) -> ChordTheoryResult<Note> {
    let trimmed = token.trim();
    let (note, rest) = parse_root(trimmed).map_err(|_| ChordTheoryError::UnparsableNote {
        token: token.to_string(),
    })?;
    let rest = rest.trim_end_matches(|c: char| c.is_ascii_digit());
    if !rest.is_empty() {
        return Err(ChordTheoryError::UnparsableNote {
            token: token.to_string(),
        });
    }
    Ok(note)
}

fn match_quality(
    s: &str,
) -> (
    Option<ChordQuality>,
    Option<SeventhType>,
    usize,
    Option<&'static str>,
) {
    // Rule 2: "m" followed by "aj" is "maj", not "m" + "aj" — guaranteed
    // because QUALITY_TOKENS lists "maj7"/"maj" before the bare "m" token.
    for &(token, quality, seventh) in QUALITY_TOKENS {
        if s.starts_with(token) {
            return (Some(quality), seventh, token.len(), Some(token));
        }
    }
    (None, None, 0, None)
}

fn match_degree(s: &str) -> Option<(u8, &str)> {
    for degree_str in ["13", "11", "9"] {
        if let Some(tail) = s.strip_prefix(degree_str) {
            return Some((degree_str.parse().expect("numeric literal"), tail));
        }
    }
    None
}

fn match_alteration(s: &str) -> Option<(Alteration, &str)> {
    let mut chars = s.chars();
    let accidental = match chars.next()? {
        '#' => Accidental::Sharp,
        'b' => Accidental::Flat,
        _ => return None,
    };
    let rest = &s[1..];
    for degree_str in ["13", "11", "9", "5"] {
        if let Some(tail) = rest.strip_prefix(degree_str) {
            let degree: u8 = degree_str.parse().expect("numeric literal");
            return Some(((degree, accidental), tail));
        }
    }
    None
}

fn check_alteration_compatibility(
    alterations: &[Alteration],
    symbol: &str,
) -> ChordTheoryResult<()> {
    for degree in [5u8, 9, 11, 13] {
        let variants: Vec<&str> = alterations
            .iter()
            .filter(|&&(d, _)| d == degree)
            .map(|&(_, a)| a.symbol())
            .collect();
        if variants.len() > 1 {
            return Err(ChordTheoryError::IncompatibleAlterations {
                alterations: alterations
                    .iter()
                    .filter(|&&(d, _)| d == degree)
                    .map(|&(d, a)| format!("{}{d}", a.symbol()))
                    .collect(),
            });
        }
    }
    let _ = symbol;
    Ok(())
}

/// Normalize a chord symbol per the cache-fingerprint rule (§4.I):
/// uppercase root letter, flat-preferred accidentals, trimmed whitespace.
/// Round-trips through `parse` to the same pitch-class set (§8.1).
#[must_use]
pub fn normalize_chord_symbol(symbol: &str) -> String {
    let trimmed = symbol.trim();
    match parse_root(trimmed) {
        Ok((note, rest)) => format!("{}{rest}", note.normalized_symbol()),
        Err(_) => trimmed.to_string(),
    }
}

/// Normalize a human-readable key name (e.g. `"c# Major"` -> `"C# major"`
/// tonic uppercased, mode lowercased, whitespace trimmed) per the same
/// cache-fingerprint rule.
#[must_use]
pub fn normalize_key_name(text: &str) -> String {
    let trimmed = text.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let tonic = parts.next().unwrap_or_default();
    let mode = parts.next().unwrap_or_default().trim();
    let mut tonic_chars = tonic.chars();
    let normalized_tonic = match tonic_chars.next() {
        Some(first) => {
            let mut s = first.to_ascii_uppercase().to_string();
            s.push_str(tonic_chars.as_str());
            s
        }
        None => String::new(),
    };
    format!("{} {}", normalized_tonic, mode.to_ascii_lowercase())
        .trim()
        .to_string()
}
