//! Crate-level error types.

use std::fmt;

/// Errors produced by the maquette crate.
#[derive(Debug)]
pub enum MaquetteError {
    /// The model rotation list is empty at construction time.
    NoModels,
    /// Asynchronous content import failed in the host engine.
    Import(String),
    /// Text-overlay resource (font, texture) could not be created.
    Overlay(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for MaquetteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoModels => {
                write!(f, "no models available in the rotation list")
            }
            Self::Import(msg) => write!(f, "content import error: {msg}"),
            Self::Overlay(msg) => {
                write!(f, "overlay resource error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for MaquetteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MaquetteError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
