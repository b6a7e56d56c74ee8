//! Helpers shared by the reducer tests.

use crate::record::Record;
use crate::reducer::{Reducer, channel};

/// Two records in the shape used across the aggregate tests.
pub(crate) fn two_records() -> Vec<Record> {
  vec![
    Record::from([
      ("uri", "/asd/fgh"),
      ("foo", "123"),
      ("bar", "234"),
      ("baz", "345"),
    ]),
    Record::from([
      ("uri", "/zxc/vbn"),
      ("foo", "456"),
      ("bar", "567"),
      ("baz", "678"),
    ]),
  ]
}

/// Pre-fills a closed input channel, runs the reducer to completion, then
/// reads the output. Buffers are sized so the reducer never blocks, the way
/// a caller would drive a reducer without spawning it.
pub(crate) async fn run_buffered<R: Reducer + ?Sized>(
  reducer: &R,
  records: Vec<Record>,
  output_capacity: usize,
) -> Vec<Record> {
  let (input_tx, input_rx) = channel(records.len());
  for record in records {
    input_tx.send(record).await.unwrap();
  }
  drop(input_tx);

  let (output_tx, mut output_rx) = channel(output_capacity);
  reducer.reduce(input_rx, output_tx).await;

  let mut results = Vec::new();
  while let Some(record) = output_rx.recv().await {
    results.push(record);
  }
  results
}
