//! Date-range cursor for the ordered fetch mode.
//!
//! Walks backward through the archive in fixed 14-day windows, one window
//! per fetch.  Consecutive windows do not overlap, and one calendar day is
//! skipped at every boundary: the next window ends the day *before* the
//! previous window's start date, minus one more day.  That extra skipped
//! day matches the behavior the feed's existing consumers depend on, so it
//! is kept as-is.

use chrono::{Days, NaiveDate};

/// Length of each requested window, inclusive of both endpoints.
const WINDOW_SPAN_DAYS: u64 = 14;

/// Mutable cursor over the feed's date axis.  One lives for the whole
/// session; [`DateCursor::advance`] is called exactly once per ordered
/// fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCursor {
    window_end: NaiveDate,
}

/// An inclusive `[start, end]` date range to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateCursor {
    /// Start the walk at `latest` (normally today).
    pub fn new(latest: NaiveDate) -> Self {
        Self { window_end: latest }
    }

    /// Produce the next window to request and step the cursor backward
    /// past it.
    pub fn advance(&mut self) -> DateWindow {
        let end = self.window_end;
        let start = end - Days::new(WINDOW_SPAN_DAYS);
        self.window_end = start - Days::new(1);
        DateWindow { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_window_ends_at_the_starting_date() {
        let mut cursor = DateCursor::new(day(2026, 8, 5));
        let w = cursor.advance();
        assert_eq!(w.end, day(2026, 8, 5));
        assert_eq!(w.start, day(2026, 7, 22));
    }

    #[test]
    fn window_span_is_always_fourteen_days() {
        let mut cursor = DateCursor::new(day(2026, 8, 5));
        for _ in 0..50 {
            let w = cursor.advance();
            assert_eq!((w.end - w.start).num_days(), 14);
        }
    }

    #[test]
    fn consecutive_windows_skip_exactly_one_day() {
        let mut cursor = DateCursor::new(day(2026, 8, 5));
        let first = cursor.advance();
        let second = cursor.advance();
        assert_eq!(second.end, first.start - Days::new(1));

        let third = cursor.advance();
        assert_eq!(third.end, second.start - Days::new(1));
    }

    #[test]
    fn walk_crosses_month_and_year_boundaries() {
        let mut cursor = DateCursor::new(day(2026, 1, 10));
        let first = cursor.advance();
        assert_eq!(first.start, day(2025, 12, 27));

        let second = cursor.advance();
        assert_eq!(second.end, day(2025, 12, 26));
        assert_eq!(second.start, day(2025, 12, 12));
    }
}
