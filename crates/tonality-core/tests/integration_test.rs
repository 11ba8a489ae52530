//! Integration tests exercising the public API of `tonality-core`:
//! parsing a chord symbol through to its pitch-class set, key scale
//! derivation, and Roman-numeral rendering working together.

use tonality_core::key::Key;
use tonality_core::parser::{normalize_chord_symbol, parse, parse_note};
use tonality_core::pitch::{Accidental, Note};
use tonality_core::roman::RomanNumeral;

#[test]
fn parse_and_derive_pitch_classes_for_a_ii_v_i() {
    let dm7 = parse("Dm7").unwrap();
    let g7 = parse("G7").unwrap();
    let cmaj7 = parse("Cmaj7").unwrap();

    let dm7_pcs: Vec<u8> = dm7.pitch_classes().iter().map(|p| p.value()).collect();
    let g7_pcs: Vec<u8> = g7.pitch_classes().iter().map(|p| p.value()).collect();
    let cmaj7_pcs: Vec<u8> = cmaj7.pitch_classes().iter().map(|p| p.value()).collect();

    assert_eq!(dm7_pcs, vec![2, 5, 9, 0]); // D F A C
    assert_eq!(g7_pcs, vec![7, 11, 2, 5]); // G B D F
    assert_eq!(cmaj7_pcs, vec![0, 4, 7, 11]); // C E G B
}

#[test]
fn key_scale_matches_chord_roots_for_a_diatonic_progression() {
    let c_major = Key::major(Note::new('C', Accidental::Natural).unwrap());
    let scale: Vec<u8> = c_major
        .scale_pitch_classes()
        .iter()
        .map(|p| p.value())
        .collect();

    for symbol in ["C", "F", "G", "Am", "Dm"] {
        let chord = parse(symbol).unwrap();
        assert!(
            scale.contains(&chord.root.pitch_class().value()),
            "{symbol}'s root should be diatonic to C major"
        );
    }
}

#[test]
fn slash_chord_bass_is_parsed_as_a_note() {
    let chord = parse("F#m7b5/A").unwrap();
    assert!(chord.is_slash_chord());
    let bass = chord.bass.unwrap();
    assert_eq!(bass, parse_note("A").unwrap());
}

#[test]
fn roman_numeral_rendering_matches_a_functional_progression() {
    let one = RomanNumeral::build(
        1,
        tonality_core::ChordQuality::Major,
        tonality_core::SeventhType::None,
        None,
        None,
        None,
    );
    let five_seven = RomanNumeral::build(
        5,
        tonality_core::ChordQuality::Major,
        tonality_core::SeventhType::Minor7,
        None,
        None,
        None,
    );
    assert_eq!(one.text, "I");
    assert_eq!(five_seven.text, "V7");
}

#[test]
fn enharmonic_spellings_normalize_to_the_same_symbol() {
    assert_eq!(normalize_chord_symbol("C#"), "Db");
    assert_eq!(normalize_chord_symbol("Db"), "Db");
    let sharp_chord = parse("C#maj7").unwrap();
    let flat_chord = parse(&normalize_chord_symbol("C#maj7")).unwrap();
    assert_eq!(sharp_chord.pitch_classes(), flat_chord.pitch_classes());
}
