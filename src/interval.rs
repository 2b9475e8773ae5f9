//! # Diatonic Intervals
//!
//! An [`Interval`] pairs a [`Quality`] with a signed generic size (1-8).
//! Positive sizes ascend, negative sizes descend.
//!
//! ## Transposition
//! Transposing moves the letter name by the generic size and lets the
//! accidental absorb whatever chromatic distance is left, so spelling is
//! always diatonically correct:
//!
//! ```rust
//! use interval_trainer::{Interval, Pitch};
//!
//! let a3: Pitch = "A3".parse().unwrap();
//! let m3: Interval = "m3".parse().unwrap();
//! assert_eq!(m3.transpose(&a3).to_string(), "C4");
//!
//! let d_sharp: Pitch = "D#3".parse().unwrap();
//! let aug2: Interval = "A2".parse().unwrap();
//! assert_eq!(aug2.transpose(&d_sharp).to_string(), "E##3");
//! ```
//!
//! ## Catalog
//! [`CATALOG`] lists the intervals the drill draws from: minor second through
//! perfect octave, without the unison, the diminished second and the
//! augmented octave.

use crate::error::TrainerError;
use crate::pitch::{Pitch, Step};
use std::fmt;
use std::str::FromStr;

/// Interval quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Diminished,
    Minor,
    Major,
    Augmented,
    Perfect,
}

impl Quality {
    /// Augmented and diminished intervals are the "hard" ones the selector rations
    pub fn is_altered(self) -> bool {
        matches!(self, Quality::Augmented | Quality::Diminished)
    }

    pub fn abbreviation(self) -> char {
        match self {
            Quality::Diminished => 'd',
            Quality::Minor => 'm',
            Quality::Major => 'M',
            Quality::Augmented => 'A',
            Quality::Perfect => 'P',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Quality::Diminished => "Diminished",
            Quality::Minor => "Minor",
            Quality::Major => "Major",
            Quality::Augmented => "Augmented",
            Quality::Perfect => "Perfect",
        }
    }

    fn from_abbreviation(c: char) -> Option<Quality> {
        match c {
            'd' => Some(Quality::Diminished),
            'm' => Some(Quality::Minor),
            'M' => Some(Quality::Major),
            'A' => Some(Quality::Augmented),
            'P' => Some(Quality::Perfect),
            _ => None,
        }
    }
}

/// A directed diatonic interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    quality: Quality,
    generic: i8,
}

/// Sizes that take perfect/diminished/augmented (as opposed to major/minor)
fn is_perfect_size(size: u8) -> bool {
    matches!(size, 1 | 4 | 5 | 8)
}

/// Semitones of the major or perfect interval of each generic size
fn reference_semitones(size: u8) -> i32 {
    match size {
        1 => 0,
        2 => 2,
        3 => 4,
        4 => 5,
        5 => 7,
        6 => 9,
        7 => 11,
        _ => 12,
    }
}

impl Interval {
    /// Build an interval, rejecting impossible combinations like a perfect third
    pub fn new(quality: Quality, generic: i8) -> Result<Self, TrainerError> {
        let size = generic.unsigned_abs();
        if !(1..=8).contains(&size) {
            return Err(TrainerError::InvalidInterval(format!(
                "generic size {} is outside 1-8",
                generic
            )));
        }
        let valid = match quality {
            Quality::Perfect => is_perfect_size(size),
            Quality::Major | Quality::Minor => !is_perfect_size(size),
            Quality::Augmented | Quality::Diminished => true,
        };
        if !valid {
            return Err(TrainerError::InvalidInterval(format!(
                "{} {} is not a valid interval",
                quality.name(),
                size
            )));
        }
        Ok(Self { quality, generic })
    }

    /// Used for the compile-time catalog; sizes there are known valid.
    const fn ascending(quality: Quality, size: i8) -> Self {
        Self { quality, generic: size }
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Signed generic size
    pub fn generic(&self) -> i8 {
        self.generic
    }

    /// Unsigned generic size (1-8)
    pub fn size(&self) -> u8 {
        self.generic.unsigned_abs()
    }

    pub fn is_descending(&self) -> bool {
        self.generic < 0
    }

    /// The same interval in the opposite direction
    pub fn reversed(&self) -> Self {
        Self {
            quality: self.quality,
            generic: -self.generic,
        }
    }

    /// Signed chromatic size in semitones
    pub fn semitones(&self) -> i32 {
        let size = self.size();
        let base = reference_semitones(size);
        let adjustment = match (self.quality, is_perfect_size(size)) {
            (Quality::Perfect, _) | (Quality::Major, _) => 0,
            (Quality::Minor, _) => -1,
            (Quality::Augmented, _) => 1,
            (Quality::Diminished, true) => -1,
            (Quality::Diminished, false) => -2,
        };
        let magnitude = base + adjustment;
        if self.is_descending() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Apply this interval to a pitch
    pub fn transpose(&self, pitch: &Pitch) -> Pitch {
        let direction: i32 = if self.is_descending() { -1 } else { 1 };
        let diatonic = pitch.diatonic_index() + (self.size() as i32 - 1) * direction;
        let step = Step::from_index(diatonic);
        // Saturate; the range rule rejects anything this far out anyway
        let octave = diatonic.div_euclid(7).clamp(i8::MIN as i32, i8::MAX as i32) as i8;

        let natural = Pitch::natural(step, octave).sounding();
        let target = pitch.sounding() + self.semitones();
        let alter = (target - natural).clamp(i8::MIN as i32, i8::MAX as i32) as i8;

        Pitch::new(step, alter, octave)
    }

    /// Short name such as `M3` or `-P5`
    pub fn short_name(&self) -> String {
        let sign = if self.is_descending() { "-" } else { "" };
        format!("{}{}{}", sign, self.quality.abbreviation(), self.size())
    }

    /// Name with direction, e.g. `Ascending Major Third`
    pub fn directed_name(&self) -> String {
        let name = format!("{} {}", self.quality.name(), size_name(self.size()));
        if self.size() == 1 {
            name
        } else if self.is_descending() {
            format!("Descending {}", name)
        } else {
            format!("Ascending {}", name)
        }
    }
}

fn size_name(size: u8) -> &'static str {
    match size {
        1 => "Unison",
        2 => "Second",
        3 => "Third",
        4 => "Fourth",
        5 => "Fifth",
        6 => "Sixth",
        7 => "Seventh",
        _ => "Octave",
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.directed_name())
    }
}

impl FromStr for Interval {
    type Err = TrainerError;

    /// Parse short names: `m2`, `P5`, `-A4` (descending)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (descending, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut chars = rest.chars();
        let quality = chars
            .next()
            .and_then(Quality::from_abbreviation)
            .ok_or_else(|| TrainerError::InvalidInterval(format!("'{}' has no quality (d, m, M, A, P)", trimmed)))?;
        let digits = chars.as_str();
        let size: u8 = digits
            .parse()
            .ok()
            .filter(|size| digits.bytes().all(|b| b.is_ascii_digit()) && (1..=8).contains(size))
            .ok_or_else(|| TrainerError::InvalidInterval(format!("'{}' has an invalid size", trimmed)))?;

        let generic = size as i8;
        Interval::new(quality, if descending { -generic } else { generic })
    }
}

/// The intervals the drill draws from, all listed ascending
pub const CATALOG: [Interval; 23] = [
    Interval::ascending(Quality::Minor, 2),
    Interval::ascending(Quality::Major, 2),
    Interval::ascending(Quality::Augmented, 2),
    Interval::ascending(Quality::Diminished, 3),
    Interval::ascending(Quality::Minor, 3),
    Interval::ascending(Quality::Major, 3),
    Interval::ascending(Quality::Augmented, 3),
    Interval::ascending(Quality::Diminished, 4),
    Interval::ascending(Quality::Perfect, 4),
    Interval::ascending(Quality::Augmented, 4),
    Interval::ascending(Quality::Diminished, 5),
    Interval::ascending(Quality::Perfect, 5),
    Interval::ascending(Quality::Augmented, 5),
    Interval::ascending(Quality::Diminished, 6),
    Interval::ascending(Quality::Minor, 6),
    Interval::ascending(Quality::Major, 6),
    Interval::ascending(Quality::Augmented, 6),
    Interval::ascending(Quality::Diminished, 7),
    Interval::ascending(Quality::Minor, 7),
    Interval::ascending(Quality::Major, 7),
    Interval::ascending(Quality::Augmented, 7),
    Interval::ascending(Quality::Diminished, 8),
    Interval::ascending(Quality::Perfect, 8),
];

/// True if the interval (in either direction) is one the drill can produce
pub fn in_catalog(interval: &Interval) -> bool {
    let ascending = if interval.is_descending() { interval.reversed() } else { *interval };
    CATALOG.contains(&ascending)
}
