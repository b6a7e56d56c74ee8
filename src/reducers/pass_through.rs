//! # Pass-Through Reducer
//!
//! Forwards every input record unchanged and in order. Useful as the last
//! stage of a [`Pipeline`](super::Pipeline) or when only the side effect of
//! reading a source is wanted.

use crate::reducer::{Reducer, RecordReceiver, RecordSender, forward};
use async_trait::async_trait;
use tracing::trace;

/// Forwards input records to the output unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl PassThrough {
  /// Creates a pass-through reducer.
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl Reducer for PassThrough {
  async fn reduce(&self, input: RecordReceiver, output: RecordSender) {
    let forwarded = forward(input, output).await;
    trace!(forwarded, "pass-through finished");
  }
}
