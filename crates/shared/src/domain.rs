use std::fmt;

use serde::{Deserialize, Serialize};

/// Cards in a single standard deck; shown before the service reports a count.
pub const FULL_DECK_SIZE: u32 = 52;

/// Opaque deck handle issued by the remote deck service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(pub String);

impl DeckId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A card that has been drawn from the active deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub code: String,
    pub image: String,
    pub label: String,
}

impl DrawnCard {
    pub fn new(code: impl Into<String>, image: impl Into<String>, value: &str, suit: &str) -> Self {
        Self {
            code: code.into(),
            image: image.into(),
            label: format!("{value} of {suit}"),
        }
    }
}
