//! The bounded sequence of currently-mounted item cards.
//!
//! Renders are pipelined, so completions can arrive out of order.  The
//! window hands the dispatcher a strict commit order instead: each render
//! carries the ticket taken when its record was popped, and completions
//! are held in a pending map until every earlier ticket has resolved.  A
//! failed or skipped render resolves its ticket with no card, releasing
//! the tickets behind it.
//!
//! Once more than [`MAX_MOUNTED`] cards are mounted, the oldest
//! [`EVICT_BATCH`] are removed together, in insertion order.

use std::collections::{BTreeMap, VecDeque};

/// Mounted cards allowed before an eviction pass.
pub const MAX_MOUNTED: usize = 24;

/// How many of the oldest cards one eviction pass removes.
pub const EVICT_BATCH: usize = 8;

/// A rendered item, ready to draw.  Produced by the presentation layer;
/// the window only cares about its height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedCard {
    pub title: String,
    pub date_line: String,
    pub media_line: String,
    pub copyright_line: Option<String>,
    /// Pre-wrapped description snippet.
    pub body: Vec<String>,
}

impl MountedCard {
    /// Height in terminal rows: the text lines plus the card's border.
    pub fn height(&self) -> u16 {
        let text = 3 // title, date, media
            + usize::from(self.copyright_line.is_some())
            + self.body.len();
        (text + 2) as u16
    }
}

/// Ordered, bounded collection of mounted cards.
pub struct RenderedWindow {
    cards: VecDeque<MountedCard>,
    /// Completions waiting for an earlier ticket to resolve.
    pending: BTreeMap<u64, Option<MountedCard>>,
    /// The ticket the next commit must carry.
    next_commit: u64,
}

impl RenderedWindow {
    pub fn new() -> Self {
        Self {
            cards: VecDeque::new(),
            pending: BTreeMap::new(),
            next_commit: 0,
        }
    }

    /// Resolve one ticket.  `None` means the render failed or the item was
    /// skipped; the ticket is still consumed so later ones can commit.
    ///
    /// Returns the cards evicted by any pruning this commit caused, oldest
    /// first, so the caller can release them.
    pub fn complete(&mut self, ticket: u64, card: Option<MountedCard>) -> Vec<MountedCard> {
        self.pending.insert(ticket, card);

        let mut evicted = Vec::new();
        while let Some(resolved) = self.pending.remove(&self.next_commit) {
            self.next_commit += 1;
            if let Some(card) = resolved {
                self.cards.push_back(card);
                if self.cards.len() > MAX_MOUNTED {
                    evicted.extend(self.cards.drain(..EVICT_BATCH));
                }
            }
        }
        evicted
    }

    /// Mounted card count.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The most recently mounted card.
    pub fn last(&self) -> Option<&MountedCard> {
        self.cards.back()
    }

    /// Total height of all mounted cards, in rows.
    pub fn total_height(&self) -> u32 {
        self.cards.iter().map(|c| u32::from(c.height())).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MountedCard> {
        self.cards.iter()
    }
}

impl Default for RenderedWindow {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
