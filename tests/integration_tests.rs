//! Integration tests for the interval trainer
//!
//! Drives the selector and sessions through many seeded draws and checks the
//! properties every accepted target must have.

use interval_trainer::interval::in_catalog;
use interval_trainer::{
    select_interval, start_session, Command, Config, Effect, IntervalSelector, Pitch, SelectionHistory,
    SelectorConfig, TrainerError, HISTORY_CAPACITY,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn p(s: &str) -> Pitch {
    s.parse().unwrap()
}

fn seeded_config(seed: u64) -> Config {
    Config {
        seed: Some(seed),
        ..Config::default()
    }
}

#[test]
fn test_first_selection_from_a3() {
    let start = p("A3");
    for seed in 0..50 {
        let mut selector = IntervalSelector::new(StdRng::seed_from_u64(seed), start);
        let selection = selector.select(&start, &SelectorConfig::default()).unwrap();
        assert!(in_catalog(&selection.interval));
        assert!(selection.pitch.sounding() >= p("G2").sounding());
        assert!(selection.pitch.sounding() <= p("E4").sounding());
        assert!(!selection.pitch.is_enharmonic(&start));
        assert_ne!(selection.pitch, start);
    }
}

#[test]
fn test_accepted_pitches_satisfy_all_rules() {
    for allow_double_accidentals in [true, false] {
        let config = SelectorConfig {
            allow_double_accidentals,
            ..SelectorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2024);
        let mut current = p("A3");
        let mut history = SelectionHistory::starting_from(current);

        for _ in 0..500 {
            let recent: Vec<Pitch> = history.pitches.iter().copied().collect();
            let ratio_before = history.altered_ratio();

            let selection = select_interval(&mut rng, &current, &mut history, &config).unwrap();
            let pitch = selection.pitch;

            assert!(in_catalog(&selection.interval));
            assert_eq!(selection.interval.transpose(&current), pitch);
            assert!(pitch.sounding() >= 43 && pitch.sounding() <= 64, "{} out of range", pitch);
            assert!(pitch.accidental_symbols() <= 2);
            if !allow_double_accidentals {
                assert!(pitch.accidental_symbols() <= 1, "{} has a double accidental", pitch);
            }
            assert!(!pitch.is_enharmonic(&current));
            assert!(!recent.contains(&pitch), "{} repeated", pitch);
            if ratio_before > 0.25 {
                assert!(!selection.interval.quality().is_altered());
            }

            assert!(history.pitches.len() <= HISTORY_CAPACITY);
            assert!(history.intervals.len() <= HISTORY_CAPACITY);
            current = pitch;
        }
    }
}

#[test]
fn test_history_keeps_last_eight_in_order() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut current = p("A3");
    let mut history = SelectionHistory::default();
    let mut accepted = Vec::new();

    for _ in 0..20 {
        let selection = select_interval(&mut rng, &current, &mut history, &SelectorConfig::default()).unwrap();
        accepted.push(selection.pitch);
        current = selection.pitch;
    }

    let expected: Vec<Pitch> = accepted[accepted.len() - HISTORY_CAPACITY..].to_vec();
    let remembered: Vec<Pitch> = history.pitches.iter().copied().collect();
    assert_eq!(remembered, expected);
}

#[test]
fn test_exhaustion_is_reported() {
    let config = SelectorConfig {
        low_bound: p("A3"),
        high_bound: p("A3"),
        max_attempts: 100,
        ..SelectorConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let mut history = SelectionHistory::default();
    let result = select_interval(&mut rng, &p("A3"), &mut history, &config);
    assert!(matches!(result, Err(TrainerError::NoValidInterval { attempts: 100 })));
    assert!(history.pitches.is_empty());
    assert!(history.intervals.is_empty());
}

#[test]
fn test_session_reveal_sequence() {
    let mut session = start_session(&seeded_config(314)).unwrap();
    for _ in 0..100 {
        let previous = session.current();
        let target = session.target();

        let effects = session.apply(Command::Reveal).unwrap();
        assert_eq!(session.current(), target.pitch);
        assert!(effects.contains(&Effect::Render(target.pitch)));

        let next = session.target();
        assert_eq!(next.interval.transpose(&target.pitch), next.pitch);
        assert!(!next.pitch.is_enharmonic(&target.pitch));
        assert_ne!(next.pitch, previous);
    }
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let mut first = start_session(&seeded_config(99)).unwrap();
    let mut second = start_session(&seeded_config(99)).unwrap();
    for _ in 0..25 {
        assert_eq!(first.target(), second.target());
        first.apply(Command::Reveal).unwrap();
        second.apply(Command::Reveal).unwrap();
    }
}

#[test]
fn test_config_file_drives_session() {
    let yaml = r#"
start-pitch: C4
allow-double-accidentals: false
play-on-reveal: false
seed: 5
"#;
    let config = Config::from_yaml(yaml).unwrap();
    let mut session = start_session(&config).unwrap();
    assert_eq!(session.current(), p("C4"));
    assert!(!session.settings().allow_double_accidentals);

    let effects = session.apply(Command::Reveal).unwrap();
    assert!(!effects.iter().any(|effect| matches!(effect, Effect::Play(_))));
    assert!(session.target().pitch.accidental_symbols() <= 1);
}
