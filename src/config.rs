//! # Configuration
//!
//! Optional YAML file; every key may be left out:
//!
//! ```yaml
//! start-pitch: A3
//! low-bound: G2
//! high-bound: E4
//! allow-double-accidentals: true
//! play-on-reveal: true
//! max-attempts: 9999
//! altered-ratio-threshold: 0.25
//! seed: 42
//! tempo: 120
//! midi-player: [timidity, "{input}"]
//! engraver: [mscore, -o, "{output}", "{input}"]
//! ```

use crate::error::TrainerError;
use crate::notation::ExternalCommand;
use crate::pitch::{Pitch, Step};
use crate::playback::MIN_TEMPO;
use crate::selector::{SelectorConfig, DEFAULT_ALTERED_RATIO_THRESHOLD, DEFAULT_MAX_ATTEMPTS};
use serde::Deserialize;
use std::path::Path;

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub start_pitch: Option<String>,
    pub low_bound: Option<String>,
    pub high_bound: Option<String>,
    pub allow_double_accidentals: Option<bool>,
    pub play_on_reveal: Option<bool>,
    pub max_attempts: Option<usize>,
    pub altered_ratio_threshold: Option<f64>,
    pub seed: Option<u64>,
    pub tempo: Option<u16>,
    pub midi_player: Option<Vec<String>>,
    pub engraver: Option<Vec<String>>,
}

/// Validated configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub start_pitch: Pitch,
    pub selector: SelectorConfig,
    pub play_on_reveal: bool,
    pub seed: Option<u64>,
    pub tempo: u16,
    pub midi_player: Option<ExternalCommand>,
    pub engraver: Option<ExternalCommand>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_pitch: Pitch::natural(Step::A, 3),
            selector: SelectorConfig::default(),
            play_on_reveal: true,
            seed: None,
            tempo: 120,
            midi_player: None,
            engraver: None,
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self, TrainerError> {
        // An empty document deserializes to unit, not a map
        if content.trim().is_empty() {
            return Self::from_raw(RawConfig::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| TrainerError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn load(path: &Path) -> Result<Self, TrainerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, TrainerError> {
        let defaults = Config::default();

        let start_pitch = parse_pitch_field("start-pitch", raw.start_pitch, defaults.start_pitch)?;
        check_start_pitch(&start_pitch)?;
        let low_bound = parse_pitch_field("low-bound", raw.low_bound, defaults.selector.low_bound)?;
        let high_bound = parse_pitch_field("high-bound", raw.high_bound, defaults.selector.high_bound)?;
        if low_bound.sounding() > high_bound.sounding() {
            return Err(TrainerError::Config(format!(
                "low-bound {} is above high-bound {}",
                low_bound, high_bound
            )));
        }

        let max_attempts = raw.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        if max_attempts == 0 {
            return Err(TrainerError::Config("max-attempts must be at least 1".to_string()));
        }

        let altered_ratio_threshold = raw
            .altered_ratio_threshold
            .unwrap_or(DEFAULT_ALTERED_RATIO_THRESHOLD);
        if !(0.0..=1.0).contains(&altered_ratio_threshold) {
            return Err(TrainerError::Config(format!(
                "altered-ratio-threshold {} must be between 0 and 1",
                altered_ratio_threshold
            )));
        }

        let tempo = raw.tempo.unwrap_or(defaults.tempo);
        if tempo < MIN_TEMPO {
            return Err(TrainerError::Config(format!("tempo must be at least {}", MIN_TEMPO)));
        }

        Ok(Config {
            start_pitch,
            selector: SelectorConfig {
                allow_double_accidentals: raw
                    .allow_double_accidentals
                    .unwrap_or(defaults.selector.allow_double_accidentals),
                low_bound,
                high_bound,
                altered_ratio_threshold,
                max_attempts,
            },
            play_on_reveal: raw.play_on_reveal.unwrap_or(defaults.play_on_reveal),
            seed: raw.seed,
            tempo,
            midi_player: parse_command_field("midi-player", raw.midi_player)?,
            engraver: parse_command_field("engraver", raw.engraver)?,
        })
    }
}

/// The drill never spells a pitch with more than two accidental symbols
pub fn check_start_pitch(pitch: &Pitch) -> Result<(), TrainerError> {
    if pitch.accidental_symbols() > 2 {
        return Err(TrainerError::Config(format!(
            "start-pitch {} needs more than two accidentals",
            pitch
        )));
    }
    Ok(())
}

fn parse_pitch_field(name: &str, value: Option<String>, default: Pitch) -> Result<Pitch, TrainerError> {
    match value {
        Some(s) => s
            .parse()
            .map_err(|e| TrainerError::Config(format!("{}: {}", name, e))),
        None => Ok(default),
    }
}

fn parse_command_field(name: &str, value: Option<Vec<String>>) -> Result<Option<ExternalCommand>, TrainerError> {
    match value {
        Some(argv) => ExternalCommand::from_argv(&argv)
            .map(Some)
            .ok_or_else(|| TrainerError::Config(format!("{} must name a program", name))),
        None => Ok(None),
    }
}
