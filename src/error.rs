//! Engine error types.
//!
//! Only configuration and lookup problems are errors. Crashing into a pipe or
//! leaving the screen is a normal game-over transition, and a timer firing for
//! a finished session is dropped silently by the session controller.

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for the game engine.
#[derive(Debug)]
pub enum GameError {
    /// A difficulty mode was requested that the mode table does not contain.
    UnknownMode {
        /// The name that was looked up.
        name: String,
    },

    /// A profile was added under a name that is already registered.
    DuplicateMode { name: String },

    /// A profile attribute is outside its valid range.
    InvalidProfile {
        /// Profile name.
        name: String,
        /// Offending attribute.
        field: &'static str,
        /// The value that was rejected.
        value: f64,
    },

    /// A configuration value is unusable (e.g. pipe gap larger than the screen).
    InvalidConfig { reason: String },

    /// Reading a configuration file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A configuration document was not valid JSON for [`crate::GameConfig`].
    Parse(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownMode { name } => write!(f, "unknown difficulty mode '{}'", name),
            GameError::DuplicateMode { name } => {
                write!(f, "difficulty mode '{}' is already registered", name)
            }
            GameError::InvalidProfile { name, field, value } => write!(
                f,
                "difficulty mode '{}' has invalid {}: {}",
                name, field, value
            ),
            GameError::InvalidConfig { reason } => write!(f, "invalid configuration: {}", reason),
            GameError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            GameError::Parse(err) => write!(f, "failed to parse configuration: {}", err),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io { source, .. } => Some(source),
            GameError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Parse(err)
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;
