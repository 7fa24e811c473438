//! Item presentation: turning a feed record into a mounted card.
//!
//! The controller only knows the [`ItemRenderer`] trait; the concrete
//! [`CardRenderer`] builds the text card shown in the gallery and, for
//! images, waits for the media bytes so a card never mounts before its
//! media exists.  That wait is the render pipeline's long suspension point
//! and is bounded by [`MEDIA_WAIT_SECS`].
//!
//! Video items mount immediately (the locator is embedded, not loaded),
//! and records with an unrecognized media kind render to `Ok(None)`: the
//! render completed, there is just nothing to mount.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Error;
use crate::feed::{MediaKind, MediaRecord};
use crate::window::MountedCard;

/// Upper bound on the media-load wait, in seconds.
pub const MEDIA_WAIT_SECS: u64 = 64;

/// Longest snippet taken from an item's explanation, in characters.
const SNIPPET_MAX: usize = 200;

/// Shortest snippet the word-boundary backtrack may produce.
const SNIPPET_MIN: usize = 100;

/// Renders one record into a mounted card.
#[async_trait]
pub trait ItemRenderer: Send + Sync {
    /// `Ok(None)` means the record's media kind is unrecognized: the
    /// caller skips insertion but the render still counts as completed.
    async fn render(&self, record: &MediaRecord) -> Result<Option<MountedCard>, Error>;
}

/// The gallery's card renderer.
pub struct CardRenderer {
    http: reqwest::Client,
    /// Wrap width for the snippet body, in columns.
    text_width: usize,
}

impl CardRenderer {
    pub fn new(text_width: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            text_width,
        }
    }

    async fn load_image(&self, url: &str) -> Result<usize, Error> {
        let fetch = async {
            let bytes = self
                .http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            Ok(bytes.len())
        };
        with_media_deadline(fetch).await
    }

    fn card(&self, record: &MediaRecord, media_line: String) -> MountedCard {
        MountedCard {
            title: record.title.clone(),
            date_line: record.date.format("%A, %B %-d, %Y").to_string(),
            media_line,
            copyright_line: record
                .copyright
                .as_ref()
                .map(|holder| format!("Copyright holder: {holder}")),
            body: textwrap::wrap(&snippet(&record.explanation), self.text_width)
                .into_iter()
                .map(|line| line.into_owned())
                .collect(),
        }
    }
}

#[async_trait]
impl ItemRenderer for CardRenderer {
    async fn render(&self, record: &MediaRecord) -> Result<Option<MountedCard>, Error> {
        let Some(url) = record.locator() else {
            return Ok(None);
        };

        let media_line = match record.media_type {
            MediaKind::Image => {
                let size = self.load_image(url).await?;
                format!("[image · {} KiB] {url}", size / 1024)
            }
            MediaKind::Video => format!("[video] {url}"),
            MediaKind::Other => return Ok(None),
        };

        Ok(Some(self.card(record, media_line)))
    }
}

/// Bound a media-load future by the render wait limit.
pub(crate) async fn with_media_deadline<T, F>(fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match tokio::time::timeout(Duration::from_secs(MEDIA_WAIT_SECS), fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::MediaLoadTimeout(MEDIA_WAIT_SECS)),
    }
}

/// First chunk of an explanation: at most [`SNIPPET_MAX`] characters,
/// backtracked to a word boundary but never below [`SNIPPET_MIN`].
fn snippet(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= SNIPPET_MAX {
        return text.to_string();
    }

    let mut cut = SNIPPET_MAX;
    while cut > SNIPPET_MIN && chars[cut] != ' ' {
        cut -= 1;
    }

    let mut snipped: String = chars[..cut].iter().collect();
    snipped.push('…');
    snipped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
