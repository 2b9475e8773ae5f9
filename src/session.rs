//! # Drill Session
//!
//! Holds the state of one drill: the current pitch, the pending target and
//! the live settings. User actions arrive as a [`Command`]; applying one
//! updates the state and returns the [`Effect`]s the front end should carry
//! out (show text, play audio, render notation). The session itself never
//! does I/O.
//!
//! ## Commands
//! | Key | Command |
//! |-----|---------|
//! | `p` | play the current pitch |
//! | `r` | reveal the target pitch and draw the next interval |
//! | `i` | draw a different interval for the same current pitch |
//! | `o` | toggle playing the pitch on reveal |
//! | `d` | toggle double accidentals |
//! | `q` | quit |

use crate::config::Config;
use crate::error::TrainerError;
use crate::interval::Interval;
use crate::pitch::Pitch;
use crate::selector::{IntervalSelector, Selection, SelectorConfig};
use rand::Rng;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PlayCurrent,
    Reveal,
    NewInterval,
    TogglePlayOnReveal,
    ToggleDoubleAccidentals,
    Quit,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::PlayCurrent,
        Command::Reveal,
        Command::NewInterval,
        Command::TogglePlayOnReveal,
        Command::ToggleDoubleAccidentals,
        Command::Quit,
    ];

    pub fn from_key(key: char) -> Option<Command> {
        match key {
            'p' => Some(Command::PlayCurrent),
            'r' => Some(Command::Reveal),
            'i' => Some(Command::NewInterval),
            'o' => Some(Command::TogglePlayOnReveal),
            'd' => Some(Command::ToggleDoubleAccidentals),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Command::PlayCurrent => 'p',
            Command::Reveal => 'r',
            Command::NewInterval => 'i',
            Command::TogglePlayOnReveal => 'o',
            Command::ToggleDoubleAccidentals => 'd',
            Command::Quit => 'q',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::PlayCurrent => "Play current pitch",
            Command::Reveal => "Reveal target pitch and give next interval",
            Command::NewInterval => "Give me a different interval",
            Command::TogglePlayOnReveal => "Toggle playing the target pitch when revealing it",
            Command::ToggleDoubleAccidentals => "Toggle double accidentals",
            Command::Quit => "Quit",
        }
    }
}

impl FromStr for Command {
    type Err = TrainerError;

    /// A single key, or the words `play`, `reveal`, `interval`, `quit`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let command = match (chars.next(), chars.next()) {
            (Some(key), None) => Command::from_key(key),
            _ => match trimmed.to_lowercase().as_str() {
                "play" => Some(Command::PlayCurrent),
                "reveal" => Some(Command::Reveal),
                "interval" => Some(Command::NewInterval),
                "quit" | "exit" => Some(Command::Quit),
                _ => None,
            },
        };
        command.ok_or_else(|| TrainerError::UnknownCommand(trimmed.to_string()))
    }
}

/// Toggles the user can flip while drilling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub play_on_reveal: bool,
    pub allow_double_accidentals: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            play_on_reveal: true,
            allow_double_accidentals: true,
        }
    }
}

/// Work for the front end, in the order it should happen
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowCurrent(Pitch),
    /// `None` clears the interval display
    ShowInterval(Option<Interval>),
    Play(Pitch),
    Render(Pitch),
    ShowSettings(Settings),
    Quit,
}

#[derive(Debug)]
pub struct Session<R> {
    current: Pitch,
    target: Selection,
    selector: IntervalSelector<R>,
    selector_config: SelectorConfig,
    settings: Settings,
}

impl<R: Rng> Session<R> {
    /// Start a drill at `config.start_pitch` and draw the first target
    pub fn new(config: &Config, rng: R) -> Result<Self, TrainerError> {
        let settings = Settings {
            play_on_reveal: config.play_on_reveal,
            allow_double_accidentals: config.selector.allow_double_accidentals,
        };
        let mut selector = IntervalSelector::new(rng, config.start_pitch);
        let target = selector.select(&config.start_pitch, &config.selector)?;

        Ok(Self {
            current: config.start_pitch,
            target,
            selector,
            selector_config: config.selector.clone(),
            settings,
        })
    }

    pub fn current(&self) -> Pitch {
        self.current
    }

    pub fn target(&self) -> Selection {
        self.target
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn selector(&self) -> &IntervalSelector<R> {
        &self.selector
    }

    /// What to show when the drill first opens
    pub fn opening_effects(&self) -> Vec<Effect> {
        vec![
            Effect::ShowCurrent(self.current),
            Effect::Render(self.current),
            Effect::ShowInterval(Some(self.target.interval)),
            Effect::ShowSettings(self.settings),
        ]
    }

    /// Apply a command. On error the session keeps its previous state.
    pub fn apply(&mut self, command: Command) -> Result<Vec<Effect>, TrainerError> {
        log::debug!("applying {:?}", command);
        match command {
            Command::PlayCurrent => Ok(vec![Effect::Play(self.current)]),
            Command::Reveal => self.reveal(),
            Command::NewInterval => {
                let current = self.current;
                self.target = self.draw(&current)?;
                Ok(vec![Effect::ShowInterval(Some(self.target.interval))])
            }
            Command::TogglePlayOnReveal => {
                self.settings.play_on_reveal = !self.settings.play_on_reveal;
                Ok(vec![Effect::ShowSettings(self.settings)])
            }
            Command::ToggleDoubleAccidentals => {
                self.settings.allow_double_accidentals = !self.settings.allow_double_accidentals;
                Ok(vec![Effect::ShowSettings(self.settings)])
            }
            Command::Quit => Ok(vec![Effect::Quit]),
        }
    }

    fn reveal(&mut self) -> Result<Vec<Effect>, TrainerError> {
        let revealed = self.target.pitch;
        let next = self.draw(&revealed)?;
        self.current = revealed;
        self.target = next;

        let mut effects = vec![Effect::ShowCurrent(revealed), Effect::ShowInterval(None)];
        if self.settings.play_on_reveal {
            effects.push(Effect::Play(revealed));
        }
        effects.push(Effect::Render(revealed));
        effects.push(Effect::ShowInterval(Some(next.interval)));
        Ok(effects)
    }

    /// Select with the live double-accidental setting
    fn draw(&mut self, from: &Pitch) -> Result<Selection, TrainerError> {
        let config = SelectorConfig {
            allow_double_accidentals: self.settings.allow_double_accidentals,
            ..self.selector_config.clone()
        };
        self.selector.select(from, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(seed: u64) -> Session<StdRng> {
        Session::new(&Config::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_command_keys_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_key(command.key()), Some(command));
        }
        assert_eq!("r".parse::<Command>().unwrap(), Command::Reveal);
        assert_eq!(" Quit ".parse::<Command>().unwrap(), Command::Quit);
        assert!("x".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn test_new_session_draws_target_from_start() {
        let session = session(5);
        let start = Config::default().start_pitch;
        assert_eq!(session.current(), start);
        assert_eq!(session.target().interval.transpose(&start), session.target().pitch);
        assert!(!session.target().pitch.is_enharmonic(&start));
    }

    #[test]
    fn test_reveal_commits_target_and_redraws() {
        let mut session = session(9);
        let old_target = session.target();

        let effects = session.apply(Command::Reveal).unwrap();
        assert_eq!(session.current(), old_target.pitch);

        let new_target = session.target();
        assert_eq!(new_target.interval.transpose(&old_target.pitch), new_target.pitch);
        assert!(!new_target.pitch.is_enharmonic(&old_target.pitch));

        assert_eq!(
            effects,
            vec![
                Effect::ShowCurrent(old_target.pitch),
                Effect::ShowInterval(None),
                Effect::Play(old_target.pitch),
                Effect::Render(old_target.pitch),
                Effect::ShowInterval(Some(new_target.interval)),
            ]
        );
    }

    #[test]
    fn test_reveal_without_playback() {
        let mut session = session(13);
        session.apply(Command::TogglePlayOnReveal).unwrap();
        let effects = session.apply(Command::Reveal).unwrap();
        assert!(!effects.iter().any(|effect| matches!(effect, Effect::Play(_))));
    }

    #[test]
    fn test_new_interval_keeps_current() {
        let mut session = session(21);
        let current = session.current();
        let effects = session.apply(Command::NewInterval).unwrap();
        assert_eq!(session.current(), current);
        assert_eq!(effects, vec![Effect::ShowInterval(Some(session.target().interval))]);
        assert_eq!(session.target().interval.transpose(&current), session.target().pitch);
    }

    #[test]
    fn test_toggles_and_simple_commands() {
        let mut session = session(2);
        let effects = session.apply(Command::ToggleDoubleAccidentals).unwrap();
        assert!(!session.settings().allow_double_accidentals);
        assert_eq!(effects, vec![Effect::ShowSettings(session.settings())]);

        for _ in 0..40 {
            session.apply(Command::Reveal).unwrap();
            assert!(session.target().pitch.accidental_symbols() <= 1);
        }

        assert_eq!(session.apply(Command::PlayCurrent).unwrap(), vec![Effect::Play(session.current())]);
        assert_eq!(session.apply(Command::Quit).unwrap(), vec![Effect::Quit]);
    }

    #[test]
    fn test_failed_selection_keeps_state() {
        let mut config = Config::default();
        config.selector.max_attempts = 1;
        // Find a seed whose first draw succeeds, then force failures by narrowing the range
        let mut session = (0..1000)
            .find_map(|seed| Session::new(&config, StdRng::seed_from_u64(seed)).ok())
            .unwrap();
        session.selector_config.low_bound = "C2".parse().unwrap();
        session.selector_config.high_bound = "C2".parse().unwrap();

        let current = session.current();
        let target = session.target();
        assert!(matches!(
            session.apply(Command::Reveal),
            Err(TrainerError::NoValidInterval { attempts: 1 })
        ));
        assert_eq!(session.current(), current);
        assert_eq!(session.target(), target);
    }
}
