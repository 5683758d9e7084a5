//! Timestamp parsing for date-bucketed aggregation.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Calendar day of a stored timestamp, in the offset it was stored with
/// (never re-localized).
///
/// Accepts RFC3339 ("2025-10-12T10:45:00Z"), bare ISO date-times without
/// an offset, and plain dates. Anything else is None and the record is
/// counted as unscheduled by the aggregations.
pub fn record_day(raw: &str) -> Option<NaiveDate> {
  let s = raw.trim();
  if s.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.date_naive());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(dt.date());
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
