use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{DeckId, DrawnCard, FULL_DECK_SIZE},
    error::ErrorKind,
    protocol::{DrawResponse, NewDeckResponse, ShuffleResponse},
};
use tokio::{
    sync::{broadcast, Mutex, MutexGuard},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

pub mod error;
pub mod http;
mod session;

pub use error::ServiceError;
pub use http::{HttpDeckService, DEFAULT_API_BASE_URL};
pub use session::{SessionStatus, SessionView};

use session::{DeckSession, SessionState};

/// The remote deck service consumed by a [`DeckSessionController`].
#[async_trait]
pub trait DeckService: Send + Sync {
    async fn new_deck(&self) -> Result<NewDeckResponse, ServiceError>;
    async fn draw(&self, deck_id: &DeckId) -> Result<DrawResponse, ServiceError>;
    async fn shuffle(&self, deck_id: &DeckId) -> Result<ShuffleResponse, ServiceError>;
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Changed(SessionView),
}

/// What became of a controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request ran and its result was applied to the session.
    Applied,
    /// Rejected by the status guard; no request was issued.
    Ignored,
    /// The response arrived after teardown or re-initialization and was dropped.
    Discarded,
}

/// Owns one deck session and serializes initialize/draw/shuffle against it.
///
/// The lock is only held while checking and updating state, never across a
/// request to the service. Overlapping card-consuming calls are rejected by
/// the status guard rather than queued.
pub struct DeckSessionController {
    service: Arc<dyn DeckService>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl DeckSessionController {
    pub fn new(service: Arc<dyn DeckService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            service,
            inner: Mutex::new(SessionState::new()),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> SessionView {
        self.inner.lock().await.view()
    }

    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<Outcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.initialize().await })
    }

    pub fn spawn_draw(self: &Arc<Self>) -> JoinHandle<Outcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.draw_card().await })
    }

    pub fn spawn_shuffle(self: &Arc<Self>) -> JoinHandle<Outcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.shuffle_deck().await })
    }

    /// Requests a fresh shuffled deck and resets the session to it.
    ///
    /// Also serves as the retry path after an initialization failure. Ignored
    /// while another deck request is pending.
    pub async fn initialize(&self) -> Outcome {
        let generation = {
            let mut guard = self.inner.lock().await;
            if guard.torn_down || guard.status.is_busy() || guard.init_pending() {
                debug!(status = %guard.status, "initialize ignored");
                return Outcome::Ignored;
            }
            guard.generation += 1;
            guard.session = DeckSession::default();
            guard.status = SessionStatus::Initializing;
            guard.error = None;
            self.publish(&guard);
            guard.generation
        };

        let result = self.service.new_deck().await;

        let Some(mut guard) = self.current(generation).await else {
            return Outcome::Discarded;
        };
        match result {
            Ok(body) => {
                let remaining = body.remaining.unwrap_or(FULL_DECK_SIZE);
                info!(deck_id = %body.deck_id, remaining, "deck ready");
                guard.session.deck_id = Some(body.deck_id);
                guard.session.drawn_cards.clear();
                guard.session.remaining = remaining;
                guard.error = None;
                guard.status = SessionStatus::Ready;
            }
            Err(err) => {
                warn!(error = %err, "failed to create deck");
                guard.error = Some(ErrorKind::InitError);
                guard.status = SessionStatus::Failed(ErrorKind::InitError);
            }
        }
        self.publish(&guard);
        Outcome::Applied
    }

    /// Draws a single card from the active deck.
    pub async fn draw_card(&self) -> Outcome {
        let (deck_id, generation) = {
            let mut guard = self.inner.lock().await;
            let Some(deck_id) = self.ready_deck(&guard) else {
                debug!(status = %guard.status, "draw ignored");
                return Outcome::Ignored;
            };
            guard.error = None;
            guard.status = SessionStatus::Drawing;
            self.publish(&guard);
            (deck_id, guard.generation)
        };

        let result = self.service.draw(&deck_id).await;

        let Some(mut guard) = self.current(generation).await else {
            return Outcome::Discarded;
        };
        match result {
            Ok(body) => match body.cards.first() {
                Some(card) => {
                    let card = DrawnCard::from(card);
                    info!(%deck_id, code = %card.code, remaining = body.remaining, "card drawn");
                    guard.session.drawn_cards.push(card);
                    guard.session.remaining = body.remaining;
                }
                None => {
                    info!(%deck_id, "deck is empty");
                    guard.error = Some(ErrorKind::EmptyDeck);
                }
            },
            // A refused draw is reported as an exhausted deck.
            Err(err) if err.is_refusal() => {
                info!(%deck_id, error = %err, "draw refused");
                guard.error = Some(ErrorKind::EmptyDeck);
            }
            Err(err) => {
                warn!(%deck_id, error = %err, "draw failed");
                guard.error = Some(ErrorKind::DrawFailed);
            }
        }
        guard.status = SessionStatus::Ready;
        self.publish(&guard);
        Outcome::Applied
    }

    /// Returns every card to the active deck and shuffles it.
    pub async fn shuffle_deck(&self) -> Outcome {
        let (deck_id, generation) = {
            let mut guard = self.inner.lock().await;
            let Some(deck_id) = self.ready_deck(&guard) else {
                debug!(status = %guard.status, "shuffle ignored");
                return Outcome::Ignored;
            };
            guard.error = None;
            guard.status = SessionStatus::Shuffling;
            self.publish(&guard);
            (deck_id, guard.generation)
        };

        let result = self.service.shuffle(&deck_id).await;

        let Some(mut guard) = self.current(generation).await else {
            return Outcome::Discarded;
        };
        match result {
            Ok(body) => {
                info!(%deck_id, remaining = body.remaining, "deck shuffled");
                guard.session.drawn_cards.clear();
                guard.session.remaining = body.remaining;
            }
            Err(err) => {
                warn!(%deck_id, error = %err, "shuffle failed");
                guard.error = Some(ErrorKind::ShuffleFailed);
            }
        }
        guard.status = SessionStatus::Ready;
        self.publish(&guard);
        Outcome::Applied
    }

    /// Ends the session. Responses still in flight are dropped and later
    /// calls are ignored.
    pub async fn teardown(&self) {
        let mut guard = self.inner.lock().await;
        guard.torn_down = true;
        guard.generation += 1;
        debug!(generation = guard.generation, "deck session torn down");
    }

    fn ready_deck(&self, state: &SessionState) -> Option<DeckId> {
        if state.torn_down || state.status != SessionStatus::Ready {
            return None;
        }
        state.session.deck_id.clone()
    }

    async fn current(&self, generation: u64) -> Option<MutexGuard<'_, SessionState>> {
        let guard = self.inner.lock().await;
        if guard.generation != generation {
            debug!(
                started = generation,
                current = guard.generation,
                "discarding stale deck service response"
            );
            return None;
        }
        Some(guard)
    }

    fn publish(&self, state: &SessionState) {
        let _ = self.events.send(SessionEvent::Changed(state.view()));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
