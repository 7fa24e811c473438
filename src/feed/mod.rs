//! Feed abstraction layer.
//!
//! This module defines the [`FeedSource`] trait and the common
//! [`MediaRecord`] type.  The concrete APOD client lives in [`apod`]; the
//! date-window bookkeeping for its ordered mode lives in [`cursor`].
//!
//! The buffer only ever talks to `dyn FeedSource`, so swapping in another
//! paginated media feed (or a test fake) means implementing this one trait.

mod apod;
mod cursor;
mod record;

pub use apod::{ApodClient, FetchMode, PAGE_SIZE};
pub use cursor::DateCursor;
pub use record::{MediaKind, MediaRecord};

use async_trait::async_trait;

use crate::error::Error;

/// A paginated source of media records.
///
/// The buffer calls [`fetch_page`](FeedSource::fetch_page) from spawned
/// refill tasks, so implementations must be [`Send`].  Each call returns
/// one page; stateful sources (date cursors) advance their own position.
#[async_trait]
pub trait FeedSource: Send {
    /// Short label for the status bar (e.g. the active sort mode).
    fn name(&self) -> &str;

    /// Fetch the next page of records.
    async fn fetch_page(&mut self) -> Result<Vec<MediaRecord>, Error>;
}
