//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Scroll keys double as the
//! controller's scroll trigger: every position change re-runs the load
//! decision, the same way the original fed its document scroll listener
//! into the append path.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Rows a single arrow-key press scrolls.
const SCROLL_STEP: u32 = 2;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(SCROLL_STEP),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(SCROLL_STEP),
        KeyCode::PageDown => app.scroll_down(u32::from(app.viewport_height)),
        KeyCode::PageUp => app.scroll_up(u32::from(app.viewport_height)),
        KeyCode::Home | KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.scroll_to_bottom(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ControlMsg;
    use crate::buffer::ItemBuffer;
    use crate::error::Error;
    use crate::feed::{FeedSource, MediaRecord};
    use crate::render::ItemRenderer;
    use crate::window::MountedCard;
    use async_trait::async_trait;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct EmptySource;

    #[async_trait]
    impl FeedSource for EmptySource {
        fn name(&self) -> &str {
            "empty"
        }

        async fn fetch_page(&mut self) -> Result<Vec<MediaRecord>, Error> {
            Ok(Vec::new())
        }
    }

    struct NullRenderer;

    #[async_trait]
    impl ItemRenderer for NullRenderer {
        async fn render(&self, _record: &MediaRecord) -> Result<Option<MountedCard>, Error> {
            Ok(None)
        }
    }

    fn app() -> (App, mpsc::UnboundedReceiver<ControlMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            App::new(ItemBuffer::new(EmptySource), Arc::new(NullRenderer), tx, "random"),
            rx,
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[tokio::test]
    async fn q_requests_quit() {
        let (mut app, _rx) = app();
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);
    }

    #[tokio::test]
    async fn esc_requests_quit() {
        let (mut app, _rx) = app();
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[tokio::test]
    async fn release_events_are_ignored() {
        let (mut app, _rx) = app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }

    #[tokio::test]
    async fn scroll_keys_run_the_load_decision() {
        let (mut app, _rx) = app();
        let before = app.in_flight();
        handle_key_event(&mut app, press(KeyCode::Down));
        // Nothing mounted, so the trigger starts a load.
        assert_eq!(app.in_flight(), before + 1);
    }
}
