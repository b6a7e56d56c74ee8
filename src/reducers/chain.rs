//! # Chain Reducer
//!
//! Broadcast-merge: every child reducer sees the whole input, and their
//! results are merged into one record.
//!
//! ## Behavior
//!
//! 1. Each child gets its own input and output channel and runs in its own
//!    task.
//! 2. Every master input record is sent to every child, in input order.
//! 3. Once the master input is exhausted, the child inputs are closed.
//! 4. One result is taken from each child, in list order, and merged into an
//!    accumulator; later children overwrite earlier ones on field collisions.
//! 5. The merged record is the only output, even when the input was empty.
//!
//! Each child's output is drained alongside the child, so a child that emits
//! more than one record cannot stall the broadcast. Only its first record
//! takes part in the merge.

use crate::record::Record;
use crate::reducer::{Reducer, RecordReceiver, RecordSender, channel};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Applies several reducers to the same input and merges their results.
#[derive(Clone, Default)]
pub struct Chain {
  reducers: Vec<Arc<dyn Reducer>>,
}

impl Chain {
  /// Creates an empty chain. An empty chain drains its input and emits one
  /// empty record.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a chain from already shared reducers.
  pub fn from_reducers(reducers: Vec<Arc<dyn Reducer>>) -> Self {
    Self { reducers }
  }

  /// Appends a reducer.
  pub fn with<R: Reducer + 'static>(self, reducer: R) -> Self {
    self.with_shared(Arc::new(reducer))
  }

  /// Appends a reducer that is shared with other composites.
  pub fn with_shared(mut self, reducer: Arc<dyn Reducer>) -> Self {
    self.reducers.push(reducer);
    self
  }

  /// Number of child reducers.
  pub fn len(&self) -> usize {
    self.reducers.len()
  }

  /// Returns `true` when the chain has no children.
  pub fn is_empty(&self) -> bool {
    self.reducers.is_empty()
  }
}

/// Keeps the first record of a child's output and discards the rest.
async fn first_result(mut results: RecordReceiver, index: usize) -> Option<Record> {
  let first = results.recv().await;
  let mut extra = 0usize;
  while results.recv().await.is_some() {
    extra += 1;
  }
  if extra > 0 {
    warn!(index, extra, "chain member emitted extra records, discarding");
  }
  first
}

#[async_trait]
impl Reducer for Chain {
  async fn reduce(&self, mut input: RecordReceiver, output: RecordSender) {
    let input_capacity = input.max_capacity();
    let output_capacity = output.max_capacity();

    let mut sub_inputs: Vec<RecordSender> = Vec::with_capacity(self.reducers.len());
    let mut members: Vec<JoinHandle<Option<Record>>> = Vec::with_capacity(self.reducers.len());
    for (index, reducer) in self.reducers.iter().enumerate() {
      let (sub_tx, sub_rx) = channel(input_capacity);
      let (result_tx, result_rx) = channel(output_capacity);
      let reducer = Arc::clone(reducer);
      sub_inputs.push(sub_tx);
      members.push(tokio::spawn(async move {
        let ((), first) = tokio::join!(
          reducer.reduce(sub_rx, result_tx),
          first_result(result_rx, index)
        );
        first
      }));
    }

    let mut received = 0usize;
    while let Some(record) = input.recv().await {
      received += 1;
      if let Some((last, rest)) = sub_inputs.split_last() {
        for sub in rest {
          let _ = sub.send(record.clone()).await;
        }
        let _ = last.send(record).await;
      }
    }
    drop(sub_inputs);

    let mut merged = Record::empty();
    for (index, member) in members.into_iter().enumerate() {
      match member.await {
        Ok(Some(result)) => merged.merge(result),
        Ok(None) => warn!(index, "chain member closed without a result"),
        Err(e) => error!(index, error = %e, "chain member task failed"),
      }
    }
    debug!(
      members = self.reducers.len(),
      records = received,
      "chain finished"
    );
    let _ = output.send(merged).await;
  }
}
