//! Failure taxonomy shared by the feed, buffer, and render layers.
//!
//! Three things can go wrong while streaming the gallery: the transport
//! fails, the payload isn't a list of items, or a media load outlives its
//! wait bound.  Everything else (a skipped media kind, an empty page) is a
//! normal outcome, not an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or non-success HTTP status from the feed or a
    /// media endpoint.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The feed responded, but the body was not a sequence of item-shaped
    /// records.
    #[error("malformed feed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// A media load exceeded the wait bound (64 s).
    #[error("media load timed out after {0} seconds")]
    MediaLoadTimeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_response_message_includes_cause() {
        let cause = serde_json::from_str::<Vec<i32>>("not json").unwrap_err();
        let err = Error::MalformedResponse(cause);
        assert!(err.to_string().starts_with("malformed feed response"));
    }

    #[test]
    fn media_timeout_message_names_the_bound() {
        let err = Error::MediaLoadTimeout(64);
        assert_eq!(err.to_string(), "media load timed out after 64 seconds");
    }
}
