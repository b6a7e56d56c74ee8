//! Tests for IntervalFilter

use super::test_support::run_buffered;
use crate::record::Record;
use crate::reducers::interval::ACCESS_LOG_TIME;
use crate::reducers::{IntervalFilter, TimeFormat};
use chrono::{TimeZone, Utc};

fn filter() -> IntervalFilter {
  IntervalFilter::new(
    "timestamp",
    TimeFormat::Rfc3339,
    Utc.with_ymd_and_hms(2015, 2, 2, 2, 2, 2).unwrap(),
    Utc.with_ymd_and_hms(2015, 5, 5, 5, 5, 5).unwrap(),
  )
}

fn fingerprint(record: &Record) -> String {
  record.fields_hash(&["timestamp", "foo", "bar", "baz"])
}

#[tokio::test]
async fn test_interval_keeps_start_and_drops_end() {
  let records = vec![
    Record::from([
      ("timestamp", "2015-01-01T01:01:01Z"),
      ("foo", "123"),
      ("bar", "234"),
      ("baz", "345"),
    ]),
    Record::from([
      ("timestamp", "2015-02-02T02:02:02Z"),
      ("foo", "456"),
      ("bar", "567"),
      ("baz", "678"),
    ]),
    Record::from([
      ("timestamp", "2015-03-03T03:03:03Z"),
      ("foo", "789"),
      ("bar", "891"),
      ("baz", "912"),
    ]),
    Record::from([
      ("timestamp", "2015-04-04T04:04:04Z"),
      ("foo", "123"),
      ("bar", "234"),
      ("baz", "345"),
    ]),
    Record::from([
      ("timestamp", "2015-05-05T05:05:05Z"),
      ("foo", "456"),
      ("bar", "567"),
      ("baz", "678"),
    ]),
  ];

  let results = run_buffered(&filter(), records, 5).await;
  let got: Vec<String> = results.iter().map(fingerprint).collect();
  assert_eq!(
    got,
    vec![
      "'timestamp'=2015-02-02T02:02:02Z;'foo'=456;'bar'=567;'baz'=678",
      "'timestamp'=2015-03-03T03:03:03Z;'foo'=789;'bar'=891;'baz'=912",
      "'timestamp'=2015-04-04T04:04:04Z;'foo'=123;'bar'=234;'baz'=345",
    ]
  );
}

#[tokio::test]
async fn test_interval_drops_missing_and_unparseable() {
  let records = vec![
    Record::from([("other", "2015-03-03T03:03:03Z")]),
    Record::from([("timestamp", "yesterday")]),
    Record::from([("timestamp", "2015-03-03T03:03:03+01:00")]),
  ];
  let results = run_buffered(&filter(), records, 5).await;
  assert_eq!(
    results,
    vec![Record::from([("timestamp", "2015-03-03T03:03:03+01:00")])]
  );
}

#[test]
fn test_within_bounds() {
  let filter = filter();
  assert!(filter.within_bounds(Utc.with_ymd_and_hms(2015, 2, 2, 2, 2, 2).unwrap()));
  assert!(filter.within_bounds(Utc.with_ymd_and_hms(2015, 5, 5, 5, 5, 4).unwrap()));
  assert!(!filter.within_bounds(Utc.with_ymd_and_hms(2015, 5, 5, 5, 5, 5).unwrap()));
  assert!(!filter.within_bounds(Utc.with_ymd_and_hms(2015, 2, 2, 2, 2, 1).unwrap()));
}

#[test]
fn test_time_formats() {
  let expected = Utc.with_ymd_and_hms(2013, 11, 8, 13, 39, 18).unwrap();
  assert_eq!(
    TimeFormat::custom(ACCESS_LOG_TIME).parse("08/Nov/2013:13:39:18 +0000"),
    Some(expected)
  );
  assert_eq!(
    TimeFormat::custom("%Y-%m-%d %H:%M:%S").parse("2013-11-08 13:39:18"),
    Some(expected)
  );
  assert_eq!(
    TimeFormat::Rfc2822.parse("Fri, 08 Nov 2013 14:39:18 +0100"),
    Some(expected)
  );
  assert_eq!(TimeFormat::Rfc3339.parse("08/Nov/2013"), None);
}

#[tokio::test]
async fn test_interval_date_only_format() {
  let filter = IntervalFilter::new(
    "day",
    TimeFormat::custom("%Y-%m-%d"),
    Utc.with_ymd_and_hms(2015, 2, 1, 0, 0, 0).unwrap(),
    Utc.with_ymd_and_hms(2015, 3, 1, 0, 0, 0).unwrap(),
  );
  let records = vec![
    Record::from([("day", "2015-02-10")]),
    Record::from([("day", "2015-03-01")]),
    Record::from([("day", "2015-02-01")]),
  ];
  let results = run_buffered(&filter, records, 3).await;
  assert_eq!(
    results,
    vec![
      Record::from([("day", "2015-02-10")]),
      Record::from([("day", "2015-02-01")]),
    ]
  );
  assert_eq!(
    TimeFormat::custom("%Y-%m-%d").parse("2015-02-10"),
    Some(Utc.with_ymd_and_hms(2015, 2, 10, 0, 0, 0).unwrap())
  );
}
