//! Wire shapes returned by the remote deck service.

use serde::{Deserialize, Serialize};

use crate::domain::{DeckId, DrawnCard};

/// Body of `GET new/shuffle/?deck_count=1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeckResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    pub deck_id: DeckId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayload {
    pub code: String,
    pub value: String,
    pub suit: String,
    pub image: String,
}

impl From<&CardPayload> for DrawnCard {
    fn from(card: &CardPayload) -> Self {
        DrawnCard::new(card.code.clone(), card.image.clone(), &card.value, &card.suit)
    }
}

/// Body of `GET {deck_id}/draw/?count=1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    pub remaining: u32,
    #[serde(default)]
    pub cards: Vec<CardPayload>,
}

/// Body of `GET {deck_id}/shuffle/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuffleResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    pub remaining: u32,
}

fn default_success() -> bool {
    true
}
