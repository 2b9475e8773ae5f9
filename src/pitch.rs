//! # Pitch Types
//!
//! A [`Pitch`] is a *spelled* pitch: letter name, accidental and octave.
//!
//! ## Two Kinds of Equality
//! - `==` compares the spelling: `C#4 != Db4`
//! - [`Pitch::sounding()`] gives the MIDI number, so `C#4` and `Db4` are
//!   enharmonic: `C#4.is_enharmonic(&Db4)`
//!
//! Range checks and ordering always go through `sounding()`.
//!
//! ## Octave System
//! Scientific pitch notation: octaves change at C, middle C is `C4` (MIDI 60).
//! `B#3` therefore sounds the same as `C4`, and `Cb4` the same as `B3`.
//!
//! ## Text Format
//! - Letter `A`-`G` (case-insensitive)
//! - Zero or more `#` (sharp), or zero or more `b` / `-` (flat)
//! - Octave number (`-` is always read as a flat, so `C-1` is C-flat 1)
//!
//! ```rust
//! use interval_trainer::Pitch;
//!
//! let pitch: Pitch = "Bb3".parse().unwrap();
//! assert_eq!(pitch.sounding(), 58);
//! assert_eq!(pitch.to_string(), "Bb3");
//! ```

use crate::error::TrainerError;
use std::fmt;
use std::str::FromStr;

/// Letter names C through B, in ascending order within an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    pub const ALL: [Step; 7] = [Step::C, Step::D, Step::E, Step::F, Step::G, Step::A, Step::B];

    /// Position within the octave (C = 0 .. B = 6)
    pub fn index(self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 1,
            Step::E => 2,
            Step::F => 3,
            Step::G => 4,
            Step::A => 5,
            Step::B => 6,
        }
    }

    /// Inverse of [`Step::index`]; wraps around the octave
    pub fn from_index(index: i32) -> Step {
        Step::ALL[index.rem_euclid(7) as usize]
    }

    /// Semitones above C for the natural note
    pub fn semitones(self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 2,
            Step::E => 4,
            Step::F => 5,
            Step::G => 7,
            Step::A => 9,
            Step::B => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::C => "C",
            Step::D => "D",
            Step::E => "E",
            Step::F => "F",
            Step::G => "G",
            Step::A => "A",
            Step::B => "B",
        }
    }

    fn from_char(c: char) -> Option<Step> {
        match c.to_ascii_uppercase() {
            'C' => Some(Step::C),
            'D' => Some(Step::D),
            'E' => Some(Step::E),
            'F' => Some(Step::F),
            'G' => Some(Step::G),
            'A' => Some(Step::A),
            'B' => Some(Step::B),
            _ => None,
        }
    }
}

/// A spelled pitch.
///
/// `alter` is the accidental in semitones: `0` natural, `1` sharp, `-2`
/// double flat. Values beyond ±2 are representable because transposition
/// can produce them; the selector rejects such spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub step: Step,
    pub alter: i8,
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: Step, alter: i8, octave: i8) -> Self {
        Self { step, alter, octave }
    }

    pub fn natural(step: Step, octave: i8) -> Self {
        Self::new(step, 0, octave)
    }

    /// Sounding pitch number (MIDI note number, C4 = 60)
    pub fn sounding(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.step.semitones() + self.alter as i32
    }

    /// Same sounding pitch, regardless of spelling
    pub fn is_enharmonic(&self, other: &Pitch) -> bool {
        self.sounding() == other.sounding()
    }

    /// Number of accidental symbols needed to write this pitch
    pub fn accidental_symbols(&self) -> u8 {
        self.alter.unsigned_abs()
    }

    /// Diatonic position counted in letter steps from C0
    pub(crate) fn diatonic_index(&self) -> i32 {
        self.octave as i32 * 7 + self.step.index()
    }

    /// The same letter and octave with the accidental removed
    pub fn without_accidental(&self) -> Pitch {
        Pitch::natural(self.step, self.octave)
    }

    /// MIDI note number clamped to the valid 0-127 range
    pub fn midi_note(&self) -> u8 {
        self.sounding().clamp(0, 127) as u8
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = if self.alter > 0 { "#" } else { "b" };
        write!(
            f,
            "{}{}{}",
            self.step.as_str(),
            symbol.repeat(self.alter.unsigned_abs() as usize),
            self.octave
        )
    }
}

impl FromStr for Pitch {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars().peekable();

        let step = chars
            .next()
            .and_then(Step::from_char)
            .ok_or_else(|| TrainerError::InvalidPitch(format!("'{}' must start with a letter A-G", trimmed)))?;

        // Accidentals: either all sharps or all flats
        let mut alter: i8 = 0;
        while let Some(&c) = chars.peek() {
            let delta = match c {
                '#' => 1,
                'b' | '-' => -1,
                _ => break,
            };
            if alter != 0 && alter.signum() != delta {
                return Err(TrainerError::InvalidPitch(format!(
                    "'{}' mixes sharps and flats",
                    trimmed
                )));
            }
            alter = alter.checked_add(delta).ok_or_else(|| {
                TrainerError::InvalidPitch(format!("'{}' has too many accidentals", trimmed))
            })?;
            chars.next();
        }

        let octave_str: String = chars.collect();
        if octave_str.is_empty() {
            return Err(TrainerError::InvalidPitch(format!("'{}' is missing an octave number", trimmed)));
        }
        let octave: i8 = octave_str
            .parse()
            .map_err(|_| TrainerError::InvalidPitch(format!("'{}' has an invalid octave", trimmed)))?;

        Ok(Pitch { step, alter, octave })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Pitch {
        s.parse().unwrap()
    }

    #[test]
    fn test_sounding_numbers() {
        assert_eq!(p("C4").sounding(), 60);
        assert_eq!(p("A3").sounding(), 57);
        assert_eq!(p("G2").sounding(), 43);
        assert_eq!(p("E4").sounding(), 64);
        assert_eq!(p("B#3").sounding(), 60);
        assert_eq!(p("Cb4").sounding(), 59);
    }

    #[test]
    fn test_parse_accidentals() {
        assert_eq!(p("F#3"), Pitch::new(Step::F, 1, 3));
        assert_eq!(p("Ebb4"), Pitch::new(Step::E, -2, 4));
        assert_eq!(p("B-3"), Pitch::new(Step::B, -1, 3));
        assert_eq!(p("g##2"), Pitch::new(Step::G, 2, 2));
    }

    #[test]
    fn test_parse_errors() {
        assert!("H4".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("C#b4".parse::<Pitch>().is_err());
        assert!("C4x".parse::<Pitch>().is_err());
        assert!("".parse::<Pitch>().is_err());
    }

    #[test]
    fn test_display_uses_sharps_and_flats() {
        assert_eq!(p("B-3").to_string(), "Bb3");
        assert_eq!(p("F##2").to_string(), "F##2");
        assert_eq!(p("Dbb4").to_string(), "Dbb4");
        assert_eq!(p("A3").to_string(), "A3");
    }

    #[test]
    fn test_spelling_versus_enharmonic_equality() {
        let c_sharp = p("C#4");
        let d_flat = p("Db4");
        assert_ne!(c_sharp, d_flat);
        assert!(c_sharp.is_enharmonic(&d_flat));
        assert_eq!(c_sharp.accidental_symbols(), 1);
        assert_eq!(p("E##3").accidental_symbols(), 2);
    }

    #[test]
    fn test_without_accidental() {
        assert_eq!(p("Cb4").without_accidental(), p("C4"));
    }
}
