//! Prefetch buffer between the feed and the render pipeline.
//!
//! Holds fetched-but-unrendered records and refills itself before running
//! dry: every refill is a spawned task that fetches one page and sends the
//! result back over a channel, so consumers keep popping from already
//! buffered data while the network round-trip is in flight.  Only the very
//! first fill (or a fully drained buffer) makes a caller wait.
//!
//! Records are popped from the tail, so a page's items are served in
//! reverse of fetch order.  Downstream consumers rely on that order, so it
//! is kept.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::error::Error;
use crate::feed::{FeedSource, MediaRecord};

/// Remaining-item count below which a speculative refill is started.
pub const LOW_WATER: usize = 8;

/// Most refills allowed in flight at once.
pub const MAX_REFILLS_IN_FLIGHT: usize = 2;

type RefillResult = Result<Vec<MediaRecord>, Error>;

/// Ordered stash of records awaiting consumption.
pub struct ItemBuffer {
    items: Vec<MediaRecord>,
    source: Arc<Mutex<Box<dyn FeedSource>>>,
    refill_tx: mpsc::UnboundedSender<RefillResult>,
    refill_rx: mpsc::UnboundedReceiver<RefillResult>,
    refills_in_flight: usize,
}

impl ItemBuffer {
    pub fn new(source: impl FeedSource + 'static) -> Self {
        let (refill_tx, refill_rx) = mpsc::unbounded_channel();
        Self {
            items: Vec::new(),
            source: Arc::new(Mutex::new(Box::new(source))),
            refill_tx,
            refill_rx,
            refills_in_flight: 0,
        }
    }

    /// Pop the next record, refilling as needed.
    ///
    /// Suspends only when the buffer is empty: the caller then waits for
    /// the oldest outstanding refill (starting one if none is in flight)
    /// and its failure, if any, propagates here.  A speculative refill that
    /// fails while the buffer still has items is dropped; the next caller
    /// to actually run dry surfaces its own refill's error.
    pub async fn next(&mut self) -> Result<MediaRecord, Error> {
        self.absorb_ready();

        loop {
            if let Some(record) = self.items.pop() {
                if self.items.len() < LOW_WATER && self.refills_in_flight < MAX_REFILLS_IN_FLIGHT {
                    self.start_refill();
                }
                return Ok(record);
            }

            if self.refills_in_flight == 0 {
                self.start_refill();
            }
            if let Some(result) = self.refill_rx.recv().await {
                self.refills_in_flight -= 1;
                self.items.extend(result?);
            }
        }
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Refills currently outstanding.
    pub fn pending_refills(&self) -> usize {
        self.refills_in_flight
    }

    /// Fold any finished refills into the buffer without waiting.
    fn absorb_ready(&mut self) {
        while let Ok(result) = self.refill_rx.try_recv() {
            self.refills_in_flight -= 1;
            if let Ok(page) = result {
                self.items.extend(page);
            }
        }
    }

    /// Spawn one page fetch; its result comes back through the channel.
    fn start_refill(&mut self) {
        let source = Arc::clone(&self.source);
        let tx = self.refill_tx.clone();
        self.refills_in_flight += 1;
        tokio::spawn(async move {
            let result = source.lock().await.fetch_page().await;
            // A closed channel means the buffer is gone; nothing to do.
            let _ = tx.send(result);
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
