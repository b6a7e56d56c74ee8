//! # Pipeline Reducer
//!
//! Staged composition: stage *i*'s output channel is stage *i + 1*'s input.
//! The first stage reads the pipeline's input; the last stage's output is
//! drained into the pipeline's output.
//!
//! Stages run inside the task that called [`Reducer::reduce`]; the pipeline
//! spawns nothing itself. All stages and the final drain are polled together,
//! so a stage that forwards more records than a buffer holds keeps flowing
//! instead of waiting on a stage that has not started. Awaiting the stages one
//! after another would deadlock as soon as a stage emits more records than its
//! output buffer holds. Any concurrency beyond that belongs to the stages
//! themselves.

use crate::reducer::{Reducer, RecordReceiver, RecordSender, channel, forward};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Feeds the output of each reducer into the next one.
#[derive(Clone, Default)]
pub struct Pipeline {
  reducers: Vec<Arc<dyn Reducer>>,
}

impl Pipeline {
  /// Creates an empty pipeline, which forwards its input unchanged.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a pipeline from already shared reducers.
  pub fn from_reducers(reducers: Vec<Arc<dyn Reducer>>) -> Self {
    Self { reducers }
  }

  /// Appends a stage.
  pub fn with<R: Reducer + 'static>(self, reducer: R) -> Self {
    self.with_shared(Arc::new(reducer))
  }

  /// Appends a stage that is shared with other composites.
  pub fn with_shared(mut self, reducer: Arc<dyn Reducer>) -> Self {
    self.reducers.push(reducer);
    self
  }
}

#[async_trait]
impl Reducer for Pipeline {
  async fn reduce(&self, input: RecordReceiver, output: RecordSender) {
    let capacity = output.max_capacity();

    let mut stages = Vec::with_capacity(self.reducers.len());
    let mut upstream = input;
    for reducer in &self.reducers {
      let (stage_tx, stage_rx) = channel(capacity);
      stages.push(reducer.reduce(upstream, stage_tx));
      upstream = stage_rx;
    }

    let (_, forwarded) = tokio::join!(join_all(stages), forward(upstream, output));
    debug!(
      stages = self.reducers.len(),
      forwarded, "pipeline finished"
    );
  }
}
