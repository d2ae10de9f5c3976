use std::fmt;

use shared::{
    domain::{DeckId, DrawnCard, FULL_DECK_SIZE},
    error::ErrorKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Ready,
    Drawing,
    Shuffling,
    Failed(ErrorKind),
}

impl SessionStatus {
    /// A card-consuming request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Drawing | Self::Shuffling)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => f.write_str("initializing"),
            Self::Ready => f.write_str("ready"),
            Self::Drawing => f.write_str("drawing"),
            Self::Shuffling => f.write_str("shuffling"),
            Self::Failed(kind) => write!(f, "failed ({kind:?})"),
        }
    }
}

/// The single active deck and the cards drawn from it.
#[derive(Debug, Clone)]
pub(crate) struct DeckSession {
    pub(crate) deck_id: Option<DeckId>,
    pub(crate) remaining: u32,
    pub(crate) drawn_cards: Vec<DrawnCard>,
}

impl Default for DeckSession {
    fn default() -> Self {
        Self {
            deck_id: None,
            remaining: FULL_DECK_SIZE,
            drawn_cards: Vec::new(),
        }
    }
}

pub(crate) struct SessionState {
    pub(crate) session: DeckSession,
    pub(crate) status: SessionStatus,
    pub(crate) error: Option<ErrorKind>,
    /// Bumped on re-initialization and teardown; responses tagged with an
    /// older value are stale.
    pub(crate) generation: u64,
    pub(crate) torn_down: bool,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            session: DeckSession::default(),
            status: SessionStatus::Initializing,
            error: None,
            generation: 0,
            torn_down: false,
        }
    }

    /// A deck request has been issued and has not yet been answered.
    pub(crate) fn init_pending(&self) -> bool {
        self.status == SessionStatus::Initializing && self.generation > 0
    }

    pub(crate) fn view(&self) -> SessionView {
        SessionView {
            status: self.status,
            deck_id: self.session.deck_id.clone(),
            remaining: self.session.remaining,
            drawn_cards: self.session.drawn_cards.clone(),
            error: self.error,
        }
    }
}

/// Read-only snapshot of a deck session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub status: SessionStatus,
    pub deck_id: Option<DeckId>,
    pub remaining: u32,
    pub drawn_cards: Vec<DrawnCard>,
    pub error: Option<ErrorKind>,
}

impl SessionView {
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Initializing
    }

    pub fn is_deck_ready(&self) -> bool {
        self.deck_id.is_some()
            && !matches!(
                self.status,
                SessionStatus::Initializing | SessionStatus::Failed(_)
            )
    }

    pub fn can_draw(&self) -> bool {
        self.is_deck_ready() && self.status == SessionStatus::Ready
    }

    pub fn can_shuffle(&self) -> bool {
        self.is_deck_ready() && self.status == SessionStatus::Ready
    }

    pub fn can_retry(&self) -> bool {
        matches!(self.status, SessionStatus::Failed(_))
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|kind| kind.message())
    }
}
