//! Configuration errors
//!
//! The simulation itself never fails; only loading settings can.

use core::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SettingsError {
    Io { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
    InvalidViewport { width: f32, height: f32 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read settings {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed settings: {err}"),
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport {width}x{height} cannot fit ground and character")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidViewport { .. } => None,
        }
    }
}
