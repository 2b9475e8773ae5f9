//! # Error Types
//!
//! All fallible operations in the trainer return [`TrainerError`].
//!
//! ## Error Types
//! - `NoValidInterval` - the selector gave up after its attempt ceiling
//! - `InvalidPitch` / `InvalidInterval` - unparseable or impossible values
//! - `Config` - the YAML configuration is malformed or inconsistent
//! - `Io`, `Midi`, `External` - failures from the rendering/playback collaborators
//!
//! ## Usage
//! ```rust
//! use interval_trainer::{Pitch, TrainerError};
//!
//! match "H4".parse::<Pitch>() {
//!     Ok(pitch) => println!("{}", pitch),
//!     Err(TrainerError::InvalidPitch(message)) => eprintln!("bad pitch: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    /// Every draw was rejected before the attempt ceiling was reached.
    ///
    /// # Example
    /// ```
    /// # use interval_trainer::TrainerError;
    /// let err = TrainerError::NoValidInterval { attempts: 9999 };
    /// assert_eq!(err.to_string(), "No valid interval found after 9999 attempts");
    /// ```
    #[error("No valid interval found after {attempts} attempts")]
    NoValidInterval { attempts: usize },

    #[error("Invalid pitch: {0}")]
    InvalidPitch(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Invalid configuration file or option.
    ///
    /// # Example
    /// ```
    /// # use interval_trainer::TrainerError;
    /// let err = TrainerError::Config("max-attempts must be at least 1".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: max-attempts must be at least 1");
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("MIDI error: {0}")]
    Midi(String),

    /// An external program (engraver or MIDI player) failed.
    #[error("External program '{program}' failed: {message}")]
    External { program: String, message: String },
}
