use std::fmt::Write as _;

use deck_client::{SessionStatus, SessionView};

const TITLE: &str = "Card Drawer";
const SUBTITLE: &str = "Type draw to reveal cards from a freshly shuffled deck.";

pub fn render(view: &SessionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{SUBTITLE}");
    let _ = writeln!(out);

    let draw_label = if view.status == SessionStatus::Drawing {
        "Drawing..."
    } else {
        "Draw Card"
    };
    let shuffle_label = if view.status == SessionStatus::Shuffling {
        "Shuffling..."
    } else {
        "Shuffle Deck"
    };
    let _ = write!(
        out,
        "{}  {}",
        action("d", draw_label, view.can_draw()),
        action("s", shuffle_label, view.can_shuffle())
    );
    if view.can_retry() {
        let _ = write!(out, "  {}", action("r", "Retry", true));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Cards remaining: {}", view.remaining);
    if let Some(message) = view.error_message() {
        let _ = writeln!(out, "! {message}");
    }

    if view.is_loading() {
        let _ = writeln!(out, "Loading deck...");
    } else {
        for card in &view.drawn_cards {
            let _ = writeln!(out, "  {:<18} {}", card.label, card.image);
        }
    }
    out
}

fn action(key: &str, label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{key}] {label}")
    } else {
        format!("[-] {label}")
    }
}
