use crate::error::StoreError;
use chrono::{Duration, Local, NaiveDateTime, Timelike};

/// Wire format for every timestamp leaving the core: naive local time,
/// second precision, no timezone marker.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_WINDOW_HOURS: i64 = 24;

pub fn format_ts(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Current wall clock truncated to whole seconds.
pub fn now_second() -> NaiveDateTime {
    Local::now()
        .naive_local()
        .with_nanosecond(0)
        .expect("zero nanoseconds is always valid")
}

/// Inclusive [start, end] window for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Resolve caller-supplied boundaries into a concrete window.
    ///
    /// If either boundary is missing the window defaults to
    /// [now − hours, now] with `hours` defaulting to 24. Boundaries accept
    /// `YYYY-MM-DD HH:MM` and `YYYY-MM-DDTHH:MM` (trailing seconds are
    /// tolerated) and are normalized to minute precision.
    pub fn resolve(from: Option<&str>, to: Option<&str>, hours: Option<i64>) -> Result<Self, StoreError> {
        match (from, to) {
            (Some(from), Some(to)) => Ok(TimeWindow {
                start: parse_boundary(from)?,
                end: parse_boundary(to)?,
            }),
            _ => {
                let end = now_second();
                let start = end - Duration::hours(hours.unwrap_or(DEFAULT_WINDOW_HOURS));
                Ok(TimeWindow { start, end })
            }
        }
    }

    pub fn covering(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        TimeWindow { start, end }
    }
}

fn parse_boundary(raw: &str) -> Result<NaiveDateTime, StoreError> {
    // datetime-local inputs arrive as "YYYY-MM-DD HH:MM" or "YYYY-MM-DDTHH:MM"
    let text = raw.trim().replace('T', " ");
    let parsed = NaiveDateTime::parse_from_str(&text, TS_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M"))
        .map_err(|_| StoreError::Validation(format!("invalid time boundary: {}", raw)))?;
    Ok(parsed.with_second(0).expect("zero seconds is always valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn minute(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn resolves_space_separated_boundaries() {
        let w = TimeWindow::resolve(Some("2026-01-02 03:04"), Some("2026-01-02 05:06"), None).unwrap();
        assert_eq!(w.start, minute(2026, 1, 2, 3, 4));
        assert_eq!(w.end, minute(2026, 1, 2, 5, 6));
    }

    #[test]
    fn resolves_t_separated_boundaries() {
        let w = TimeWindow::resolve(Some("2026-01-02T03:04"), Some("2026-01-02T05:06"), None).unwrap();
        assert_eq!(w.start, minute(2026, 1, 2, 3, 4));
        assert_eq!(w.end, minute(2026, 1, 2, 5, 6));
    }

    #[test]
    fn seconds_are_normalized_to_minute_precision() {
        let w = TimeWindow::resolve(Some("2026-01-02 03:04:59"), Some("2026-01-02T05:06:07"), None).unwrap();
        assert_eq!(w.start, minute(2026, 1, 2, 3, 4));
        assert_eq!(w.end, minute(2026, 1, 2, 5, 6));
    }

    #[test]
    fn missing_boundary_falls_back_to_hours() {
        let w = TimeWindow::resolve(None, Some("2026-01-02 03:04"), None).unwrap();
        assert_eq!(w.end - w.start, Duration::hours(DEFAULT_WINDOW_HOURS));

        let w = TimeWindow::resolve(None, None, Some(6)).unwrap();
        assert_eq!(w.end - w.start, Duration::hours(6));
    }

    #[test]
    fn garbage_boundary_is_a_validation_error() {
        let err = TimeWindow::resolve(Some("yesterday"), Some("2026-01-02 03:04"), None).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn timestamps_format_to_the_wire_layout() {
        let ts = NaiveDate::from_ymd_opt(2026, 8, 24)
            .unwrap()
            .and_hms_opt(7, 5, 9)
            .unwrap();
        assert_eq!(format_ts(ts), "2026-08-24 07:05:09");
    }
}
