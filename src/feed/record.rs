//! The core data type shared across the feed, buffer, and render layers.
//!
//! `MediaRecord` is one entry of the APOD feed, deserialized straight from
//! the JSON payload.  It is treated as an immutable value once fetched; the
//! single exception is [`MediaRecord::normalize_locators`], which the load
//! path applies before handing the record to the renderer.

use chrono::NaiveDate;
use serde::Deserialize;

/// What kind of media a record points at.
///
/// The feed only ever sends `image` and `video` today; anything else is
/// mapped to [`MediaKind::Other`] and skipped by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[serde(other)]
    Other,
}

/// A single feed entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaRecord {
    /// Publication date, also the record's stable identifier (the feed
    /// publishes at most one item per day).
    pub date: NaiveDate,

    /// Headline.
    pub title: String,

    /// Long-form description; the renderer shows a snippet of it.
    pub explanation: String,

    /// Media locator.
    pub url: Option<String>,

    /// High-definition media locator, preferred over `url` when present.
    pub hdurl: Option<String>,

    /// Media kind, drives how the renderer mounts the item.
    pub media_type: MediaKind,

    /// Copyright holder, absent for public-domain items.
    #[serde(default)]
    pub copyright: Option<String>,
}

impl MediaRecord {
    /// Rewrite protocol-relative locators (`//host/path`) to explicit
    /// secure-scheme absolute ones.  Applied to both `url` and `hdurl`.
    pub fn normalize_locators(&mut self) {
        for locator in [&mut self.url, &mut self.hdurl] {
            if let Some(loc) = locator {
                if let Some(rest) = loc.strip_prefix("//") {
                    *loc = format!("https://{rest}");
                }
            }
        }
    }

    /// The locator the renderer should load: `hdurl` when present, else
    /// `url`.
    pub fn locator(&self) -> Option<&str> {
        self.hdurl.as_deref().or(self.url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: Option<&str>, hdurl: Option<&str>) -> MediaRecord {
        MediaRecord {
            date: NaiveDate::from_ymd_opt(2017, 7, 4).unwrap(),
            title: "t".into(),
            explanation: "e".into(),
            url: url.map(String::from),
            hdurl: hdurl.map(String::from),
            media_type: MediaKind::Image,
            copyright: None,
        }
    }

    #[test]
    fn normalizes_protocol_relative_url() {
        let mut rec = record(Some("//example.com/x.jpg"), None);
        rec.normalize_locators();
        assert_eq!(rec.url.as_deref(), Some("https://example.com/x.jpg"));
    }

    #[test]
    fn normalizes_both_locators() {
        let mut rec = record(Some("//a.example/x.jpg"), Some("//b.example/y.jpg"));
        rec.normalize_locators();
        assert_eq!(rec.url.as_deref(), Some("https://a.example/x.jpg"));
        assert_eq!(rec.hdurl.as_deref(), Some("https://b.example/y.jpg"));
    }

    #[test]
    fn leaves_absolute_locators_alone() {
        let mut rec = record(Some("https://example.com/x.jpg"), None);
        rec.normalize_locators();
        assert_eq!(rec.url.as_deref(), Some("https://example.com/x.jpg"));
    }

    #[test]
    fn locator_prefers_hdurl() {
        let rec = record(Some("https://low.example/x.jpg"), Some("https://hd.example/x.jpg"));
        assert_eq!(rec.locator(), Some("https://hd.example/x.jpg"));
    }

    #[test]
    fn locator_falls_back_to_url() {
        let rec = record(Some("https://low.example/x.jpg"), None);
        assert_eq!(rec.locator(), Some("https://low.example/x.jpg"));
    }

    #[test]
    fn deserializes_a_feed_record() {
        let json = r#"{
            "date": "2017-07-04",
            "title": "Celestial Fireworks",
            "explanation": "What if you could go right into a cluster?",
            "media_type": "video",
            "service_version": "v1",
            "url": "https://www.youtube.com/embed/dtY44sPNHcU?rel=0"
        }"#;

        let rec: MediaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.media_type, MediaKind::Video);
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2017, 7, 4).unwrap());
        assert!(rec.hdurl.is_none());
        assert!(rec.copyright.is_none());
    }

    #[test]
    fn unknown_media_type_maps_to_other() {
        let json = r#"{
            "date": "2020-01-01",
            "title": "t",
            "explanation": "e",
            "media_type": "hologram",
            "url": "https://example.com/x"
        }"#;

        let rec: MediaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.media_type, MediaKind::Other);
    }
}
