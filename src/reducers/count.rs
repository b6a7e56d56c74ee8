//! # Count Reducer

use crate::record::Record;
use crate::reducer::{Reducer, RecordReceiver, RecordSender};
use async_trait::async_trait;
use tracing::trace;

/// Name of the field written by [`Count`].
pub const COUNT_FIELD: &str = "count";

/// Counts input records, ignoring their content. Emits a single record with
/// a `count` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl Count {
  /// Creates a count reducer.
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl Reducer for Count {
  async fn reduce(&self, mut input: RecordReceiver, output: RecordSender) {
    let mut count: u64 = 0;
    while input.recv().await.is_some() {
      count += 1;
    }

    let mut result = Record::empty();
    result.set_uint_field(COUNT_FIELD, count);
    trace!(count, "count finished");
    let _ = output.send(result).await;
  }
}
