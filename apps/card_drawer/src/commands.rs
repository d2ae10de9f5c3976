//! Terminal commands and their dispatch to the deck session controller.

use std::{str::FromStr, sync::Arc};

use deck_client::DeckSessionController;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Draw,
    Shuffle,
    Retry,
    View,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}' (type 'help' for a list)")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "draw" => Ok(Self::Draw),
            "s" | "shuffle" => Ok(Self::Shuffle),
            "r" | "retry" | "refresh" => Ok(Self::Retry),
            "v" | "view" | "" => Ok(Self::View),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Shuffle => "shuffle",
            Self::Retry => "retry",
            Self::View => "view",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

pub const HELP: &str = "\
commands:
  d, draw      draw one card
  s, shuffle   return all cards and reshuffle
  r, retry     request a new deck; only available after a load failure
  v, view      show the table again
  h, help      show this list
  q, quit      leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Render,
    Help,
    NothingToRetry,
    Quit,
}

/// Starts the controller operation for `cmd` without waiting on it, so the
/// prompt stays responsive while a request is in flight. A retry is only
/// started once the deck failed to load, so it never discards a dealt hand.
pub async fn dispatch(controller: &Arc<DeckSessionController>, cmd: Command) -> Flow {
    tracing::debug!(command = cmd.name(), "dispatching command");
    match cmd {
        Command::Draw => {
            controller.spawn_draw();
            Flow::Continue
        }
        Command::Shuffle => {
            controller.spawn_shuffle();
            Flow::Continue
        }
        Command::Retry => {
            if !controller.view().await.can_retry() {
                return Flow::NothingToRetry;
            }
            controller.spawn_initialize();
            Flow::Continue
        }
        Command::View => Flow::Render,
        Command::Help => Flow::Help,
        Command::Quit => Flow::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use deck_client::{DeckService, Outcome, ServiceError, SessionStatus};
    use shared::{
        domain::DeckId,
        protocol::{DrawResponse, NewDeckResponse, ShuffleResponse},
    };

    /// Deck service whose new-deck request fails until `healthy_after` calls.
    struct FlakyDeckService {
        healthy_after: usize,
        new_deck_calls: AtomicUsize,
    }

    #[async_trait]
    impl DeckService for FlakyDeckService {
        async fn new_deck(&self) -> Result<NewDeckResponse, ServiceError> {
            let call = self.new_deck_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call < self.healthy_after {
                return Err(ServiceError::Transport("connection refused".into()));
            }
            Ok(NewDeckResponse {
                success: true,
                deck_id: DeckId::new("deck-1"),
                remaining: Some(52),
            })
        }

        async fn draw(&self, _deck_id: &DeckId) -> Result<DrawResponse, ServiceError> {
            Err(ServiceError::Rejected)
        }

        async fn shuffle(&self, _deck_id: &DeckId) -> Result<ShuffleResponse, ServiceError> {
            Err(ServiceError::Rejected)
        }
    }

    fn flaky(healthy_after: usize) -> (Arc<FlakyDeckService>, Arc<DeckSessionController>) {
        let service = Arc::new(FlakyDeckService {
            healthy_after,
            new_deck_calls: AtomicUsize::new(0),
        });
        let controller =
            DeckSessionController::new(Arc::clone(&service) as Arc<dyn DeckService>);
        (service, controller)
    }

    #[tokio::test]
    async fn retry_is_refused_while_the_deck_is_usable() {
        let (service, controller) = flaky(1);
        assert_eq!(controller.initialize().await, Outcome::Applied);

        assert_eq!(
            dispatch(&controller, Command::Retry).await,
            Flow::NothingToRetry
        );
        assert_eq!(service.new_deck_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.view().await.status, SessionStatus::Ready);
    }

    #[tokio::test]
    async fn retry_is_refused_before_the_first_load_answers() {
        let (service, controller) = flaky(1);

        assert_eq!(
            dispatch(&controller, Command::Retry).await,
            Flow::NothingToRetry
        );
        assert_eq!(service.new_deck_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn retry_after_failed_load_requests_a_new_deck() {
        let (service, controller) = flaky(2);
        controller.initialize().await;
        assert!(controller.view().await.can_retry());

        assert_eq!(dispatch(&controller, Command::Retry).await, Flow::Continue);
        tokio::time::timeout(Duration::from_secs(5), async {
            while controller.view().await.status != SessionStatus::Ready {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("retry reaches ready");
        assert_eq!(service.new_deck_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!("d".parse::<Command>(), Ok(Command::Draw));
        assert_eq!(" Draw ".parse::<Command>(), Ok(Command::Draw));
        assert_eq!("s".parse::<Command>(), Ok(Command::Shuffle));
        assert_eq!("refresh".parse::<Command>(), Ok(Command::Retry));
        assert_eq!("".parse::<Command>(), Ok(Command::View));
        assert_eq!("?".parse::<Command>(), Ok(Command::Help));
        assert_eq!("EXIT".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_unknown_input() {
        let err = "deal".parse::<Command>().expect_err("unknown");
        assert_eq!(err, UnknownCommand("deal".into()));
        assert!(err.to_string().contains("help"));
    }
}
