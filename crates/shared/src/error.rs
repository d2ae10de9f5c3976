use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-facing failure categories of a deck session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Could not load a new deck. Please refresh.")]
    InitError,
    #[error("Error: no cards remaining!")]
    EmptyDeck,
    #[error("Could not draw a card. Try again.")]
    DrawFailed,
    #[error("Shuffling failed. Please try again.")]
    ShuffleFailed,
}

impl ErrorKind {
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the session remains usable after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InitError)
    }
}
