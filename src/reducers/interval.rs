//! # Interval Filter
//!
//! Keeps records whose timestamp field falls inside `[start, end)`.
//!
//! ## Behavior
//!
//! - The timestamp is parsed with the configured [`TimeFormat`].
//! - A record without the field, or whose value does not parse, is dropped.
//! - A timestamp equal to `start` is kept; one equal to `end` is dropped.
//! - Kept records are forwarded unchanged and in input order. The filter never
//!   synthesizes a record, so its output may be empty.

use crate::reducer::{Reducer, RecordReceiver, RecordSender};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::trace;

/// `$time_local` layout of the common nginx/Apache access log,
/// e.g. `08/Nov/2013:13:39:18 +0000`.
pub const ACCESS_LOG_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// How a timestamp field is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFormat {
  /// RFC 3339, e.g. `2015-02-02T02:02:02Z`.
  Rfc3339,
  /// RFC 2822, e.g. `Mon, 02 Feb 2015 02:02:02 +0000`.
  Rfc2822,
  /// A `chrono` strftime pattern. Patterns without an offset are read as UTC;
  /// date-only patterns such as `%Y-%m-%d` yield midnight of that day.
  Custom(String),
}

impl TimeFormat {
  /// Creates a custom strftime-based format.
  pub fn custom(pattern: impl Into<String>) -> Self {
    Self::Custom(pattern.into())
  }

  /// Parses `value`, returning `None` when it does not fit the format.
  pub fn parse(&self, value: &str) -> Option<DateTime<Utc>> {
    match self {
      Self::Rfc3339 => DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc)),
      Self::Rfc2822 => DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|t| t.with_timezone(&Utc)),
      Self::Custom(pattern) => {
        if let Ok(t) = DateTime::parse_from_str(value, pattern) {
          return Some(t.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
          return Some(Utc.from_utc_datetime(&naive));
        }
        NaiveDate::parse_from_str(value, pattern)
          .ok()
          .and_then(|date| date.and_hms_opt(0, 0, 0))
          .map(|naive| Utc.from_utc_datetime(&naive))
      }
    }
  }
}

/// Forwards records whose `field` timestamp lies in `[start, end)`.
#[derive(Debug, Clone)]
pub struct IntervalFilter {
  field: String,
  format: TimeFormat,
  start: DateTime<Utc>,
  end: DateTime<Utc>,
}

impl IntervalFilter {
  /// Creates a filter over `field`, parsed with `format`.
  pub fn new(
    field: impl Into<String>,
    format: TimeFormat,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Self {
    Self {
      field: field.into(),
      format,
      start,
      end,
    }
  }

  /// Returns `true` when `t` equals `start`, or lies strictly between
  /// `start` and `end`.
  pub fn within_bounds(&self, t: DateTime<Utc>) -> bool {
    t == self.start || (t > self.start && t < self.end)
  }
}

#[async_trait]
impl Reducer for IntervalFilter {
  async fn reduce(&self, mut input: RecordReceiver, output: RecordSender) {
    let mut kept = 0usize;
    let mut dropped = 0usize;

    while let Some(record) = input.recv().await {
      let Ok(value) = record.field(&self.field) else {
        dropped += 1;
        continue;
      };
      let Some(t) = self.format.parse(value) else {
        dropped += 1;
        continue;
      };
      if self.within_bounds(t) {
        kept += 1;
        let _ = output.send(record).await;
      } else {
        dropped += 1;
      }
    }
    trace!(field = %self.field, kept, dropped, "interval filter finished");
  }
}
