pub mod config;
pub mod error;
pub mod history;
pub mod interval;
pub mod notation;
pub mod pitch;
pub mod playback;
pub mod selector;
pub mod session;

pub use config::Config;
pub use error::*;
pub use history::{History, SelectionHistory, HISTORY_CAPACITY};
pub use interval::{Interval, Quality, CATALOG};
pub use notation::{MusicXmlRenderer, NotationRenderer};
pub use pitch::{Pitch, Step};
pub use playback::{AudioOutput, MidiFileOutput, Player, SilentOutput};
pub use selector::{select_interval, IntervalSelector, Rejection, Selection, SelectorConfig};
pub use session::{Command, Effect, Session, Settings};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Start a drill session from a configuration.
/// Uses `config.seed` for a reproducible drill, or OS entropy otherwise.
pub fn start_session(config: &Config) -> Result<Session<StdRng>, TrainerError> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Session::new(config, rng)
}
