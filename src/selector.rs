//! # Interval Selector
//!
//! Picks the next target interval for the drill by rejection sampling.
//!
//! ## Algorithm
//! 1. Draw an interval uniformly from [`CATALOG`], flipping a coin for direction
//! 2. Transpose the current pitch by it
//! 3. Reject the draw ([`Rejection`]) if the result:
//!    - needs three or more accidentals
//!    - sounds outside `[low_bound, high_bound]`
//!    - is enharmonic with the current pitch
//!    - needs a double accidental while those are disabled
//!    - has the exact spelling of a recently accepted pitch
//!    - is augmented/diminished while those already exceed the ratio threshold
//! 4. Record the accepted pair in the history
//!
//! After `max_attempts` rejected draws the selector gives up with
//! [`TrainerError::NoValidInterval`] and leaves the history untouched.
//!
//! ## Example
//! ```rust
//! use interval_trainer::{IntervalSelector, Pitch, SelectorConfig};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let start: Pitch = "A3".parse().unwrap();
//! let mut selector = IntervalSelector::new(StdRng::seed_from_u64(7), start);
//! let selection = selector.select(&start, &SelectorConfig::default()).unwrap();
//! assert!(!selection.pitch.is_enharmonic(&start));
//! ```

use crate::error::TrainerError;
use crate::history::SelectionHistory;
use crate::interval::{Interval, CATALOG};
use crate::pitch::{Pitch, Step};
use rand::Rng;
use std::fmt;

/// Attempt ceiling before the selector reports exhaustion
pub const DEFAULT_MAX_ATTEMPTS: usize = 9999;

/// Highest tolerated share of augmented/diminished intervals in the history
pub const DEFAULT_ALTERED_RATIO_THRESHOLD: f64 = 0.25;

/// Parameters read at selection time
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    pub allow_double_accidentals: bool,
    pub low_bound: Pitch,
    pub high_bound: Pitch,
    pub altered_ratio_threshold: f64,
    pub max_attempts: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            allow_double_accidentals: true,
            low_bound: Pitch::natural(Step::G, 2),
            high_bound: Pitch::natural(Step::E, 4),
            altered_ratio_threshold: DEFAULT_ALTERED_RATIO_THRESHOLD,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// An accepted target: the interval to sing and the pitch it leads to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub interval: Interval,
    pub pitch: Pitch,
}

/// Why a candidate was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    DegenerateSpelling,
    OutOfRange,
    Unison,
    DoubleAccidental,
    RecentlyUsed,
    TooManyAltered,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::DegenerateSpelling => "needs more than two accidentals",
            Rejection::OutOfRange => "outside the allowed range",
            Rejection::Unison => "enharmonic with the current pitch",
            Rejection::DoubleAccidental => "double accidentals are disabled",
            Rejection::RecentlyUsed => "pitch was used recently",
            Rejection::TooManyAltered => "too many augmented/diminished intervals recently",
        };
        f.write_str(reason)
    }
}

/// Draw a catalog interval with a random direction
pub fn draw_interval<R: Rng + ?Sized>(rng: &mut R) -> Interval {
    let interval = CATALOG[rng.random_range(0..CATALOG.len())];
    if interval.size() != 1 && rng.random_bool(0.5) {
        interval.reversed()
    } else {
        interval
    }
}

/// Transpose `current` by `interval` and check the result against every rule.
/// Does not touch the history.
pub fn evaluate_candidate(
    current: &Pitch,
    interval: &Interval,
    history: &SelectionHistory,
    config: &SelectorConfig,
) -> Result<Pitch, Rejection> {
    let candidate = interval.transpose(current);
    let symbols = candidate.accidental_symbols();

    if symbols > 2 {
        return Err(Rejection::DegenerateSpelling);
    }
    if candidate.sounding() < config.low_bound.sounding()
        || candidate.sounding() > config.high_bound.sounding()
    {
        return Err(Rejection::OutOfRange);
    }
    if candidate.is_enharmonic(current) {
        return Err(Rejection::Unison);
    }
    if !config.allow_double_accidentals && symbols == 2 {
        return Err(Rejection::DoubleAccidental);
    }
    if history.pitches.contains(&candidate) {
        return Err(Rejection::RecentlyUsed);
    }
    if interval.quality().is_altered() && history.altered_ratio() > config.altered_ratio_threshold {
        return Err(Rejection::TooManyAltered);
    }

    Ok(candidate)
}

/// Pick a new interval and resulting pitch relative to `current`, recording
/// the accepted pair in `history`.
pub fn select_interval<R: Rng + ?Sized>(
    rng: &mut R,
    current: &Pitch,
    history: &mut SelectionHistory,
    config: &SelectorConfig,
) -> Result<Selection, TrainerError> {
    for attempt in 1..=config.max_attempts {
        let interval = draw_interval(rng);
        match evaluate_candidate(current, &interval, history, config) {
            Ok(pitch) => {
                history.record(interval, pitch);
                log::info!(
                    "selected {} from {} -> {} after {} attempt(s)",
                    interval.short_name(),
                    current,
                    pitch,
                    attempt
                );
                return Ok(Selection { interval, pitch });
            }
            Err(rejection) => {
                log::debug!("rejected {} from {}: {}", interval.short_name(), current, rejection);
            }
        }
    }

    log::warn!(
        "no valid interval from {} after {} attempts",
        current,
        config.max_attempts
    );
    Err(TrainerError::NoValidInterval {
        attempts: config.max_attempts,
    })
}

/// Owns the random source and the rolling history for one drill session
#[derive(Debug)]
pub struct IntervalSelector<R> {
    rng: R,
    history: SelectionHistory,
}

impl<R: Rng> IntervalSelector<R> {
    /// A selector whose pitch history already holds the starting pitch
    pub fn new(rng: R, start: Pitch) -> Self {
        Self {
            rng,
            history: SelectionHistory::starting_from(start),
        }
    }

    pub fn with_history(rng: R, history: SelectionHistory) -> Self {
        Self { rng, history }
    }

    pub fn select(&mut self, current: &Pitch, config: &SelectorConfig) -> Result<Selection, TrainerError> {
        select_interval(&mut self.rng, current, &mut self.history, config)
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }
}
