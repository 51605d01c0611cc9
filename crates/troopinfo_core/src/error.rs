use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Format,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("not a valid SOX file: {0}")]
    Format(#[from] FormatError),
}

impl CoreError {
    pub fn code(&self) -> CoreErrorCode {
        match self {
            Self::Io(_) => CoreErrorCode::Io,
            Self::Format(_) => CoreErrorCode::Format,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("input is {actual} bytes, expected at least {expected}")]
    Truncated { expected: usize, actual: usize },
    #[error("version {found}, expected {expected}")]
    VersionMismatch { expected: i32, found: i32 },
    #[error("troop count {found}, expected {expected}")]
    CountMismatch { expected: i32, found: i32 },
    #[error("text document: {0}")]
    Text(String),
    #[error("text document has {found} troop entries, expected {expected}")]
    TroopCount { expected: usize, found: usize },
    #[error("invalid layout: {0}")]
    Layout(String),
}
