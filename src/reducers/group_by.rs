//! # Group By Reducer
//!
//! Partitions the input by a key built from named fields and runs an
//! independent [`Chain`] of the configured reducers for every key.
//!
//! ## Behavior
//!
//! For each input record the key is `record.fields_hash(fields)`. The first
//! time a key is seen, the reducer:
//!
//! - opens an input/output channel pair for it, with one spare output slot;
//! - writes the seed record `record.partial(fields)` into that output, which
//!   preserves the grouping values no aggregate knows about;
//! - spawns a `Chain` bound to the pair.
//!
//! Every record, unprojected, is then forwarded to its key's input. When the
//! master input is exhausted all key inputs are closed and, key by key, the
//! seed and the aggregate are read back, merged (aggregate fields win) and
//! emitted. Output order across keys is unspecified.
//!
//! Groups are never evicted: the number of live chains equals the number of
//! distinct keys seen so far.

use super::chain::Chain;
use crate::reducer::{Reducer, RecordReceiver, RecordSender, channel};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

/// Per-key state: where to send the key's records, where its results come
/// back, and the chain task producing them.
struct Group {
  input: RecordSender,
  output: RecordReceiver,
  task: JoinHandle<()>,
}

/// Groups records by field values and reduces each group independently.
#[derive(Clone, Default)]
pub struct GroupBy {
  fields: Vec<String>,
  reducers: Vec<Arc<dyn Reducer>>,
}

impl GroupBy {
  /// Creates a grouping over the given field names with no reducers yet.
  pub fn new<I, S>(fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      fields: fields.into_iter().map(Into::into).collect(),
      reducers: Vec::new(),
    }
  }

  /// Appends a reducer applied to every group.
  pub fn with<R: Reducer + 'static>(self, reducer: R) -> Self {
    self.with_shared(Arc::new(reducer))
  }

  /// Appends a reducer that is shared with other composites.
  pub fn with_shared(mut self, reducer: Arc<dyn Reducer>) -> Self {
    self.reducers.push(reducer);
    self
  }

  /// The grouping field names.
  pub fn fields(&self) -> &[String] {
    &self.fields
  }
}

#[async_trait]
impl Reducer for GroupBy {
  async fn reduce(&self, mut input: RecordReceiver, output: RecordSender) {
    let input_capacity = input.max_capacity();
    let output_capacity = output.max_capacity();
    let mut groups: HashMap<String, Group> = HashMap::new();

    while let Some(record) = input.recv().await {
      let key = record.fields_hash(self.fields.as_slice());
      let group = match groups.entry(key) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
          let (sub_tx, sub_rx) = channel(input_capacity);
          let (result_tx, result_rx) = channel(output_capacity + 1);
          // The receiver is held right here and the channel has room, so
          // this neither blocks nor fails.
          let _ = result_tx.send(record.partial(self.fields.as_slice())).await;

          let chain = Chain::from_reducers(self.reducers.clone());
          let task = tokio::spawn(async move {
            chain.reduce(sub_rx, result_tx).await;
          });
          trace!(key = %entry.key(), "group started");
          entry.insert(Group {
            input: sub_tx,
            output: result_rx,
            task,
          })
        }
      };
      let _ = group.input.send(record).await;
    }

    let group_count = groups.len();
    let pending: Vec<(String, RecordReceiver, JoinHandle<()>)> = groups
      .into_iter()
      .map(|(key, group)| {
        drop(group.input);
        (key, group.output, group.task)
      })
      .collect();

    for (key, mut results, task) in pending {
      let Some(mut merged) = results.recv().await else {
        warn!(key = %key, "group closed before its seed record was read");
        continue;
      };
      match results.recv().await {
        Some(aggregate) => merged.merge(aggregate),
        None => warn!(key = %key, "group closed without an aggregate"),
      }
      if let Err(e) = task.await {
        error!(key = %key, error = %e, "group task failed");
      }
      let _ = output.send(merged).await;
    }
    debug!(groups = group_count, "group by finished");
  }
}
