//! apodscroll — an infinite-scrolling APOD media gallery for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ fetch_page ┌───────────┐   next()   ┌────────────┐
//! │  feed/    │ ◄───────── │ buffer.rs │ ◄───────── │ load tasks │
//! │ (client)  │            │ (prefetch)│            │  (spawned) │
//! └───────────┘            └───────────┘            └─────┬──────┘
//!                                                         │ ControlMsg
//!                                                         ▼
//! ┌───────────┐  scroll    ┌───────────┐   draw()   ┌───────────┐
//! │ input.rs  │ ─────────► │  app.rs   │ ─────────► │  ui.rs    │
//! │ (thread)  │            │ (control) │            │ (render)  │
//! └───────────┘            └───────────┘            └───────────┘
//! ```
//!
//! * **`feed/`** — the `FeedSource` trait, the APOD client, and the
//!   date-window cursor for ordered mode.
//! * **`buffer`** — prefetched records awaiting render; refills itself.
//! * **`gate`** — bounds concurrent renders with RAII slots.
//! * **`window`** — the bounded sequence of mounted cards.
//! * **`render`** — the `ItemRenderer` collaborator building cards.
//! * **`app`** — owns all state and the scroll-driven load controller.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: parse args, set up the
//!   terminal, and run the event loop.

mod app;
mod buffer;
mod error;
mod feed;
mod gate;
mod input;
mod render;
mod ui;
mod window;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use app::{App, Trigger};
use buffer::ItemBuffer;
use feed::{ApodClient, DateCursor, FetchMode};
use render::CardRenderer;

/// The feed endpoint.
const FEED_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

/// Wrap width for card bodies, in columns.
const CARD_TEXT_WIDTH: usize = 72;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.  This prevents the common TUI bug where a panic leaves the
/// terminal in a broken state.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.  Without this, a panic inside the event loop would leave
/// raw mode enabled and the alternate screen active.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Read terminal events on a dedicated thread and forward them to the
/// event loop.  `event::read` blocks, so it cannot live on the async
/// runtime; the thread stops once the receiver is gone.
fn spawn_input_thread() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    return;
                }
            }
            Err(_) => return,
        }
    });
    rx
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    install_panic_hook();

    // -- parse arguments -----------------------------------------------------
    // `apodscroll date` walks the archive backward by date; anything else
    // (or nothing) streams random items.
    let sort_by_date = matches!(std::env::args().nth(1).as_deref(), Some("date"));

    // -- configure the feed --------------------------------------------------
    let api_key = std::env::var("APOD_API_KEY").unwrap_or_else(|_| "DEMO_KEY".into());
    let (mode, sort_label) = if sort_by_date {
        (
            FetchMode::ByDate(DateCursor::new(Utc::now().date_naive())),
            "by date",
        )
    } else {
        (FetchMode::Random, "random")
    };
    let client = ApodClient::new(FEED_ENDPOINT, api_key, mode);

    // -- wire the controller -------------------------------------------------
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(
        ItemBuffer::new(client),
        Arc::new(CardRenderer::new(CARD_TEXT_WIDTH)),
        tx,
        sort_label,
    );

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    app.viewport_height = guard.terminal.size()?.height.saturating_sub(1);
    let mut input_rx = spawn_input_thread();

    // -- initial load --------------------------------------------------------
    app.on_trigger(Trigger::Startup);

    // -- main event loop -----------------------------------------------------
    // Each iteration: wait for a control message, an input event, or the
    // redraw tick; drain whatever else queued up; then render one frame.
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            Some(msg) = rx.recv() => app.handle(msg),
            Some(ev) = input_rx.recv() => {
                if let Event::Key(key) = ev {
                    input::handle_key_event(&mut app, key);
                }
            }
            _ = tick.tick() => {}
        }

        while let Ok(msg) = rx.try_recv() {
            app.handle(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
