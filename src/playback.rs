//! # Playback
//!
//! Audio for the drill is always a one-note fragment: the pitch as a half
//! note. [`Player`] builds the fragment, hands it to an [`AudioOutput`] and
//! clears it again, so nothing lingers between calls.
//!
//! ## Outputs
//! - [`MidiFileOutput`] writes a Standard MIDI File and optionally runs an
//!   external player on it (e.g. `timidity {input}`)
//! - [`SilentOutput`] only logs what would have played

use crate::error::TrainerError;
use crate::notation::ExternalCommand;
use crate::pitch::Pitch;
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use std::path::PathBuf;

/// Ticks per quarter note in MIDI output
const TICKS_PER_QUARTER: u16 = 480;

const VELOCITY: u8 = 96;

/// Slowest tempo whose microseconds-per-quarter still fits the 24-bit tempo field
pub const MIN_TEMPO: u16 = 4;

/// Note length in quarter-note beats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteValue {
    Whole,
    Half,
    Quarter,
}

impl NoteValue {
    pub fn beats(self) -> f64 {
        match self {
            NoteValue::Whole => 4.0,
            NoteValue::Half => 2.0,
            NoteValue::Quarter => 1.0,
        }
    }

    fn ticks(self) -> u32 {
        (self.beats() * TICKS_PER_QUARTER as f64) as u32
    }
}

/// A single note to be played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackNote {
    pub midi_note: u8,
    pub value: NoteValue,
}

/// Notes waiting to be handed to an output, played one after another
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub notes: Vec<PlaybackNote>,
}

impl Fragment {
    pub fn push(&mut self, note: PlaybackNote) {
        self.notes.push(note);
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Total length in quarter-note beats
    pub fn beats(&self) -> f64 {
        self.notes.iter().map(|note| note.value.beats()).sum()
    }
}

/// Where fragments go to be heard
pub trait AudioOutput {
    fn play(&mut self, fragment: &Fragment, tempo: u16) -> Result<(), TrainerError>;
}

impl<O: AudioOutput + ?Sized> AudioOutput for Box<O> {
    fn play(&mut self, fragment: &Fragment, tempo: u16) -> Result<(), TrainerError> {
        (**self).play(fragment, tempo)
    }
}

/// Convert a fragment into an in-memory single-track SMF
pub fn fragment_to_smf(fragment: &Fragment, tempo: u16) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut track: Track<'static> = Vec::new();
    let tempo_microseconds = 60_000_000 / tempo.max(MIN_TEMPO) as u32;
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });

    let channel = u4::new(0);
    for note in &fragment.notes {
        let key = u7::new(note.midi_note.min(127));
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn { key, vel: u7::new(VELOCITY) },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(note.value.ticks()),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff { key, vel: u7::new(0) },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);
    smf
}

/// Writes each fragment to a fixed `.mid` file and optionally plays it
#[derive(Debug, Clone)]
pub struct MidiFileOutput {
    path: PathBuf,
    player: Option<ExternalCommand>,
}

impl MidiFileOutput {
    pub fn new(path: impl Into<PathBuf>, player: Option<ExternalCommand>) -> Self {
        Self {
            path: path.into(),
            player,
        }
    }

    /// Output writing `interval_trainer_current_note.mid` into the temp directory
    pub fn in_temp_dir(player: Option<ExternalCommand>) -> Self {
        let path = std::env::temp_dir().join(format!("{}.mid", crate::notation::FILE_STEM));
        Self::new(path, player)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl AudioOutput for MidiFileOutput {
    fn play(&mut self, fragment: &Fragment, tempo: u16) -> Result<(), TrainerError> {
        let smf = fragment_to_smf(fragment, tempo);
        let mut buf = Vec::new();
        smf.write(&mut buf).map_err(|e| TrainerError::Midi(e.to_string()))?;
        std::fs::write(&self.path, &buf)?;
        log::debug!("wrote {} bytes of MIDI to {}", buf.len(), self.path.display());

        match &self.player {
            Some(player) => player.run(&self.path, None),
            None => Ok(()),
        }
    }
}

/// Output that discards audio
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play(&mut self, fragment: &Fragment, _tempo: u16) -> Result<(), TrainerError> {
        log::info!("(silent) would play {} note(s)", fragment.notes.len());
        Ok(())
    }
}

/// Plays single pitches through an output, one fragment at a time
#[derive(Debug)]
pub struct Player<O> {
    output: O,
    fragment: Fragment,
    tempo: u16,
}

impl<O: AudioOutput> Player<O> {
    pub fn new(output: O, tempo: u16) -> Self {
        Self {
            output,
            fragment: Fragment::default(),
            tempo,
        }
    }

    /// Play `pitch` as a half note. The fragment is emptied afterwards even
    /// if the output failed.
    pub fn play_pitch(&mut self, pitch: &Pitch) -> Result<(), TrainerError> {
        self.fragment.push(PlaybackNote {
            midi_note: pitch.midi_note(),
            value: NoteValue::Half,
        });
        let result = self.output.play(&self.fragment, self.tempo);
        self.fragment.clear();
        result
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Remembers every fragment it was asked to play
    #[derive(Default)]
    struct RecordingOutput {
        played: Vec<Fragment>,
        fail: bool,
    }

    impl AudioOutput for RecordingOutput {
        fn play(&mut self, fragment: &Fragment, _tempo: u16) -> Result<(), TrainerError> {
            self.played.push(fragment.clone());
            if self.fail {
                Err(TrainerError::Midi("device unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn p(s: &str) -> Pitch {
        s.parse().unwrap()
    }

    #[test]
    fn test_play_pitch_sends_single_half_note() {
        let mut player = Player::new(RecordingOutput::default(), 120);
        player.play_pitch(&p("A3")).unwrap();
        player.play_pitch(&p("C4")).unwrap();

        let played = &player.output().played;
        assert_eq!(played.len(), 2);
        assert_eq!(played[0].notes, vec![PlaybackNote { midi_note: 57, value: NoteValue::Half }]);
        assert_eq!(played[1].notes, vec![PlaybackNote { midi_note: 60, value: NoteValue::Half }]);
        assert!(player.fragment().is_empty());
    }

    #[test]
    fn test_fragment_cleared_after_failure() {
        let output = RecordingOutput { played: Vec::new(), fail: true };
        let mut player = Player::new(output, 120);
        assert!(player.play_pitch(&p("G2")).is_err());
        assert!(player.fragment().is_empty());
    }

    #[test]
    fn test_fragment_to_smf_events() {
        let mut fragment = Fragment::default();
        fragment.push(PlaybackNote { midi_note: 64, value: NoteValue::Half });
        assert_eq!(fragment.beats(), 2.0);

        let smf = fragment_to_smf(&fragment, 120);
        assert_eq!(smf.tracks.len(), 1);
        // tempo, note on, note off, end of track
        assert_eq!(smf.tracks[0].len(), 4);
        assert_eq!(smf.tracks[0][2].delta.as_int(), 960);
    }

    #[test]
    fn test_slow_tempo_is_clamped_to_encodable_value() {
        let smf = fragment_to_smf(&Fragment::default(), 1);
        match smf.tracks[0][0].kind {
            TrackEventKind::Meta(MetaMessage::Tempo(value)) => {
                assert_eq!(value.as_int(), 60_000_000 / MIN_TEMPO as u32);
            }
            other => panic!("expected a tempo event, got {:?}", other),
        }
    }

    #[test]
    fn test_midi_file_output_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.mid");
        let mut player = Player::new(MidiFileOutput::new(&path, None), 90);
        player.play_pitch(&p("E4")).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
    }
}
