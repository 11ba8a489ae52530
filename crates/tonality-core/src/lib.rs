//! Core music-theory data model and chord-symbol parser for the
//! tonality analysis engine (§3, §4.A, §4.B).
//!
//! This crate is pure data + pure functions: pitch classes, notes, keys,
//! chords, Roman numerals, and the grammar that turns a chord symbol into
//! a [`Chord`]. It does no analysis of its own — that is
//! `tonality-analysis`'s job.

pub mod chord;
pub mod constants;
pub mod error;
pub mod key;
pub mod parser;
pub mod pitch;
pub mod roman;

pub use chord::*;
pub use constants::*;
pub use error::*;
pub use key::*;
pub use parser::*;
pub use pitch::*;
pub use roman::*;
