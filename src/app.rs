//! Application state and the scroll-driven loading controller.
//!
//! `App` owns everything the event loop mutates: the mounted-card window,
//! the concurrency gate, the scroll position, and the status line.  All
//! asynchronous work — item loads, refills, retry timers — reports back
//! through one [`ControlMsg`] channel drained by the main loop, so the
//! controller itself never races.
//!
//! The trigger logic on each event:
//!
//! 1. gate saturated → defer, retry on a timer;
//! 2. enough card rows already rendered below the viewport top → idle;
//! 3. otherwise reserve a slot, spawn a load task, and immediately
//!    re-trigger so the next item's load overlaps this one's render.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use crate::buffer::ItemBuffer;
use crate::error::Error;
use crate::gate::{ConcurrencyGate, RenderSlot, MAX_IN_FLIGHT};
use crate::render::ItemRenderer;
use crate::window::{MountedCard, RenderedWindow};

/// How long a deferred trigger waits before retrying.
pub const RETRY_DELAY: Duration = Duration::from_secs(4);

/// Load-ahead bound: stop loading once the last card's bottom edge sits
/// this many viewport-heights below the viewport top.
const LOOKAHEAD_FACTOR: u32 = 3;

/// Where the loading controller currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Evaluating,
    Loading,
    Deferred,
}

/// What woke the controller up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The one-time initial invocation.
    Startup,
    /// A scroll key.
    Scroll,
    /// The timer scheduled by a deferred trigger.
    Retry,
    /// The controller's own re-invocation after starting a load.
    Pipelined,
}

/// Messages drained by the main event loop.
pub enum ControlMsg {
    Trigger(Trigger),
    /// A load task finished rendering the item it popped.
    RenderDone {
        ticket: u64,
        outcome: Result<Option<MountedCard>, Error>,
    },
    /// A load task failed before it could pop an item.
    LoadFailed(Error),
}

pub struct App {
    /// Mounted cards, in commit order.
    pub window: RenderedWindow,
    pub state: LoadState,
    /// Rows scrolled past the top of the mounted content.
    pub scroll: u32,
    /// Viewport height in rows, refreshed on every draw.
    pub viewport_height: u16,
    pub status: String,
    pub quit: bool,
    /// Sort-mode label for the status bar.
    pub sort_label: String,
    pub(crate) gate: ConcurrencyGate,
    buffer: Arc<Mutex<ItemBuffer>>,
    renderer: Arc<dyn ItemRenderer>,
    /// Commit tickets, taken atomically with each pop.
    tickets: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<ControlMsg>,
}

impl App {
    pub fn new(
        buffer: ItemBuffer,
        renderer: Arc<dyn ItemRenderer>,
        tx: mpsc::UnboundedSender<ControlMsg>,
        sort_label: impl Into<String>,
    ) -> Self {
        Self {
            window: RenderedWindow::new(),
            state: LoadState::Idle,
            scroll: 0,
            viewport_height: 0,
            status: "Starting…".into(),
            quit: false,
            sort_label: sort_label.into(),
            gate: ConcurrencyGate::new(MAX_IN_FLIGHT),
            buffer: Arc::new(Mutex::new(buffer)),
            renderer,
            tickets: Arc::new(AtomicU64::new(0)),
            tx,
        }
    }

    /// Dispatch one control message.
    pub fn handle(&mut self, msg: ControlMsg) {
        match msg {
            ControlMsg::Trigger(trigger) => self.on_trigger(trigger),
            ControlMsg::RenderDone { ticket, outcome } => self.on_render_done(ticket, outcome),
            ControlMsg::LoadFailed(err) => {
                self.status = format!("load failed: {err}");
            }
        }
    }

    /// The load decision, run for every trigger kind.
    pub fn on_trigger(&mut self, _trigger: Trigger) {
        self.state = LoadState::Evaluating;

        if self.gate.is_saturated() {
            self.state = LoadState::Deferred;
            self.schedule_retry();
            return;
        }

        if self.rendered_bottom() > i64::from(self.viewport_height) * i64::from(LOOKAHEAD_FACTOR) {
            self.state = LoadState::Idle;
            return;
        }

        // Between the saturation check and here the counter can only have
        // gone down, but stay defensive about the reservation itself.
        let Some(slot) = self.gate.try_acquire() else {
            self.state = LoadState::Deferred;
            self.schedule_retry();
            return;
        };

        self.state = LoadState::Loading;
        self.spawn_load(slot);
        let _ = self.tx.send(ControlMsg::Trigger(Trigger::Pipelined));
    }

    /// Bottom edge of the last mounted card, in rows below the viewport
    /// top.  Zero while nothing is mounted.
    fn rendered_bottom(&self) -> i64 {
        i64::from(self.window.total_height()) - i64::from(self.scroll)
    }

    fn schedule_retry(&self) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(RETRY_DELAY).await;
            let _ = tx.send(ControlMsg::Trigger(Trigger::Retry));
        });
    }

    /// Pop, normalize, render — off the dispatcher, reporting back over
    /// the channel.  The slot is released when the inner scope closes, on
    /// every path.
    fn spawn_load(&self, slot: RenderSlot) {
        let buffer = Arc::clone(&self.buffer);
        let renderer = Arc::clone(&self.renderer);
        let tickets = Arc::clone(&self.tickets);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let msg = {
                let _slot = slot;

                // The ticket is taken under the buffer lock, so commit
                // order always matches pop order.
                let popped = {
                    let mut buffer = buffer.lock().await;
                    buffer.next().await.map(|mut record| {
                        let ticket = tickets.fetch_add(1, Ordering::SeqCst);
                        record.normalize_locators();
                        (record, ticket)
                    })
                };

                match popped {
                    Err(err) => ControlMsg::LoadFailed(err),
                    Ok((record, ticket)) => {
                        let outcome = renderer.render(&record).await;
                        ControlMsg::RenderDone { ticket, outcome }
                    }
                }
            };
            let _ = tx.send(msg);
        });
    }

    fn on_render_done(&mut self, ticket: u64, outcome: Result<Option<MountedCard>, Error>) {
        match outcome {
            Ok(card) => {
                let evicted = self.window.complete(ticket, card);
                if !evicted.is_empty() {
                    // Keep the view anchored when rows vanish above it.
                    let removed: u32 = evicted.iter().map(|c| u32::from(c.height())).sum();
                    self.scroll = self.scroll.saturating_sub(removed);
                }
                self.status = format!("{} mounted", self.window.len());
            }
            Err(err) => {
                // The ticket still resolves so later commits aren't stuck
                // behind it.
                self.window.complete(ticket, None);
                self.status = format!("render failed: {err}");
            }
        }

        if self.state == LoadState::Loading && self.gate.in_flight() == 0 {
            self.state = LoadState::Idle;
        }
    }

    /// Renders currently in flight.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Buffered-record count, when the buffer isn't mid-pop.
    pub fn buffered_len(&self) -> Option<usize> {
        self.buffer.try_lock().ok().map(|b| b.len())
    }

    // -- scrolling -----------------------------------------------------------
    //
    // Every scroll is also a load trigger, exactly like the document-level
    // scroll listener feeding the original controller.

    pub fn scroll_down(&mut self, rows: u32) {
        self.scroll = (self.scroll + rows).min(self.max_scroll());
        self.on_trigger(Trigger::Scroll);
    }

    pub fn scroll_up(&mut self, rows: u32) {
        self.scroll = self.scroll.saturating_sub(rows);
        self.on_trigger(Trigger::Scroll);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
        self.on_trigger(Trigger::Scroll);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
        self.on_trigger(Trigger::Scroll);
    }

    fn max_scroll(&self) -> u32 {
        self.window
            .total_height()
            .saturating_sub(u32::from(self.viewport_height))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
