//! Tests for GroupBy

use super::test_support::run_buffered;
use crate::config::ReduceConfig;
use crate::record::Record;
use crate::reducer::reduce_all;
use crate::reducers::{Count, GroupBy, Sum};
use std::collections::HashMap;

fn by_host(results: Vec<Record>) -> HashMap<String, Record> {
  results
    .into_iter()
    .map(|record| (record.field("host").unwrap().to_string(), record))
    .collect()
}

#[tokio::test]
async fn test_group_by_host() {
  let reducer = GroupBy::new(["host"])
    .with(Sum::new(["foo", "bar"]))
    .with(Count::new());

  let records = vec![
    Record::from([
      ("uri", "/asd/fgh"),
      ("host", "alpha.example.com"),
      ("foo", "1"),
      ("bar", "2"),
      ("baz", "3"),
    ]),
    Record::from([
      ("uri", "/zxc/vbn"),
      ("host", "beta.example.com"),
      ("foo", "4"),
      ("bar", "5"),
      ("baz", "6"),
    ]),
    Record::from([
      ("uri", "/ijk/lmn"),
      ("host", "beta.example.com"),
      ("foo", "7"),
      ("bar", "8"),
      ("baz", "9"),
    ]),
  ];

  let groups = by_host(run_buffered(&reducer, records, 2).await);
  assert_eq!(groups.len(), 2);

  let alpha = &groups["alpha.example.com"];
  assert_eq!(alpha.float_field("foo").unwrap(), 1.0);
  assert_eq!(alpha.float_field("bar").unwrap(), 2.0);
  assert_eq!(alpha.field("count").unwrap(), "1");
  assert!(alpha.field("uri").is_err());

  let beta = &groups["beta.example.com"];
  assert_eq!(beta.float_field("foo").unwrap(), 4.0 + 7.0);
  assert_eq!(beta.float_field("bar").unwrap(), 5.0 + 8.0);
  assert_eq!(beta.field("count").unwrap(), "2");
}

#[tokio::test]
async fn test_group_by_multiple_fields() {
  let reducer = GroupBy::new(["host", "status"]).with(Count::new());
  assert_eq!(reducer.fields(), ["host", "status"]);
  let records = vec![
    Record::from([("host", "a"), ("status", "200")]),
    Record::from([("host", "a"), ("status", "500")]),
    Record::from([("host", "a"), ("status", "200")]),
    Record::from([("host", "b")]),
  ];
  let mut results = reduce_all(&reducer, records, &ReduceConfig::default()).await;
  results.sort_by_key(|r| r.to_string());

  assert_eq!(
    results,
    vec![
      Record::from([("host", "a"), ("status", "500"), ("count", "1")]),
      Record::from([("host", "b"), ("count", "1")]),
      Record::from([("host", "a"), ("status", "200"), ("count", "2")]),
    ]
  );
}

#[tokio::test]
async fn test_group_by_aggregate_overrides_key() {
  let reducer = GroupBy::new(["foo"]).with(Sum::new(["foo"]));
  let records = vec![
    Record::from([("foo", "2")]),
    Record::from([("foo", "2")]),
  ];
  let results = run_buffered(&reducer, records, 1).await;
  assert_eq!(results, vec![Record::from([("foo", "4.00")])]);
}

#[tokio::test]
async fn test_group_by_empty_input() {
  let reducer = GroupBy::new(["host"]).with(Count::new());
  let results = run_buffered(&reducer, Vec::new(), 1).await;
  assert!(results.is_empty());
}

#[tokio::test]
async fn test_group_by_without_reducers_emits_keys() {
  let reducer = GroupBy::new(["host"]);
  let records = vec![
    Record::from([("host", "a"), ("x", "1")]),
    Record::from([("host", "a"), ("x", "2")]),
  ];
  let results = run_buffered(&reducer, records, 1).await;
  assert_eq!(results, vec![Record::from([("host", "a")])]);
}

#[tokio::test]
async fn test_group_by_many_keys_small_buffers() {
  let reducer = GroupBy::new(["k"]).with(Sum::new(["v"])).with(Count::new());
  let records: Vec<Record> = (0..3000)
    .map(|i| {
      let key = (i % 100).to_string();
      Record::from([("k", key.as_str()), ("v", "1")])
    })
    .collect();
  let config = ReduceConfig::default().with_buffer_size(1);
  let results = reduce_all(&reducer, records, &config).await;

  assert_eq!(results.len(), 100);
  for result in results {
    assert!(result.field("k").is_ok());
    assert_eq!(result.uint_field("count").unwrap(), 30);
    assert_eq!(result.float_field("v").unwrap(), 30.0);
  }
}
