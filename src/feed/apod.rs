//! APOD feed client.
//!
//! Issues one paginated GET per [`fetch_page`](crate::feed::FeedSource::fetch_page)
//! call and parses the JSON payload into [`MediaRecord`]s.  Two request
//! modes exist:
//!
//! * **random** — ask for a fixed count of arbitrary items, no cursor state;
//! * **by date** — ask for the items inside the next [`DateCursor`] window,
//!   stepping the cursor backward once per call.
//!
//! Parsing is kept out of the transport path so tests can exercise it
//! without hitting the network.

use async_trait::async_trait;

use crate::error::Error;

use super::cursor::DateCursor;
use super::{FeedSource, MediaRecord};

/// How many items a random-mode page requests.
pub const PAGE_SIZE: usize = 16;

/// Which pagination scheme the client uses.
pub enum FetchMode {
    /// Stateless: a fixed count of arbitrary items per page.
    Random,
    /// Stateful: 14-day date windows walked backward from the cursor.
    ByDate(DateCursor),
}

/// HTTP client for the APOD feed.
pub struct ApodClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    mode: FetchMode,
}

impl ApodClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, mode: FetchMode) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            mode,
        }
    }

    /// Query parameters for the next page.  Steps the date cursor in
    /// by-date mode, so call this exactly once per request.
    fn page_query(&mut self) -> Vec<(&'static str, String)> {
        let mut query = vec![("api_key", self.api_key.clone())];
        match &mut self.mode {
            FetchMode::Random => query.push(("count", PAGE_SIZE.to_string())),
            FetchMode::ByDate(cursor) => {
                let window = cursor.advance();
                query.push(("start_date", window.start.to_string()));
                query.push(("end_date", window.end.to_string()));
            }
        }
        query
    }

    /// Parse a feed response body into records.
    ///
    /// Pure function (no I/O) so the parsing logic is testable offline.
    pub fn parse_page(body: &[u8]) -> Result<Vec<MediaRecord>, Error> {
        serde_json::from_slice(body).map_err(Error::MalformedResponse)
    }
}

#[async_trait]
impl FeedSource for ApodClient {
    fn name(&self) -> &str {
        match self.mode {
            FetchMode::Random => "random",
            FetchMode::ByDate(_) => "by date",
        }
    }

    async fn fetch_page(&mut self) -> Result<Vec<MediaRecord>, Error> {
        let query = self.page_query();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        Self::parse_page(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MediaKind;
    use chrono::NaiveDate;

    fn client(mode: FetchMode) -> ApodClient {
        ApodClient::new("https://example.com/feed", "TEST_KEY", mode)
    }

    #[test]
    fn parse_page_extracts_records() {
        let body = br#"[
            {
                "date": "2024-03-01",
                "title": "First",
                "explanation": "one",
                "media_type": "image",
                "url": "https://example.com/1.jpg",
                "hdurl": "https://example.com/1_hd.jpg"
            },
            {
                "date": "2024-03-02",
                "title": "Second",
                "explanation": "two",
                "media_type": "video",
                "url": "https://example.com/2",
                "copyright": "Someone"
            }
        ]"#;

        let records = ApodClient::parse_page(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "First");
        assert_eq!(records[0].media_type, MediaKind::Image);
        assert_eq!(records[1].copyright.as_deref(), Some("Someone"));
    }

    #[test]
    fn parse_page_rejects_non_sequence_payload() {
        let body = br#"{"error": "rate limited"}"#;
        let err = ApodClient::parse_page(body).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn parse_page_rejects_items_missing_required_fields() {
        let body = br#"[{"title": "no date"}]"#;
        assert!(matches!(
            ApodClient::parse_page(body),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn random_mode_requests_a_fixed_count() {
        let mut c = client(FetchMode::Random);
        let query = c.page_query();
        assert!(query.contains(&("api_key", "TEST_KEY".to_string())));
        assert!(query.contains(&("count", "16".to_string())));
    }

    #[test]
    fn by_date_mode_requests_the_cursor_window() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let mut c = client(FetchMode::ByDate(DateCursor::new(start)));

        let query = c.page_query();
        assert!(query.contains(&("start_date", "2026-07-22".to_string())));
        assert!(query.contains(&("end_date", "2026-08-05".to_string())));
    }

    #[test]
    fn by_date_mode_steps_backward_with_a_one_day_gap() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let mut c = client(FetchMode::ByDate(DateCursor::new(start)));

        c.page_query();
        let second = c.page_query();
        assert!(second.contains(&("end_date", "2026-07-21".to_string())));
        assert!(second.contains(&("start_date", "2026-07-07".to_string())));
    }

    #[test]
    fn name_reflects_the_mode() {
        assert_eq!(client(FetchMode::Random).name(), "random");
        let dated = client(FetchMode::ByDate(DateCursor::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )));
        assert_eq!(dated.name(), "by date");
    }
}
