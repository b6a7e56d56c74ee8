//! # MapReduce Driver
//!
//! Wires a line source, a [`Parser`] and a [`Reducer`] together: one task
//! parses lines into records, another runs the reducer over them. The caller
//! gets the reducer's output channel and reads results until it closes.

use crate::config::ReduceConfig;
use crate::reader::{Parser, Reader};
use crate::reducer::{RecordReceiver, Reducer, channel};
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tracing::debug;

/// Parses `source` with `parser` and reduces the records with `reducer`.
///
/// Must be called from within a tokio runtime. Lines that do not match the
/// format are skipped. The returned channel closes once the reducer has
/// written its last result.
pub fn map_reduce<S>(
  source: S,
  parser: Arc<Parser>,
  reducer: Arc<dyn Reducer>,
  config: &ReduceConfig,
) -> RecordReceiver
where
  S: AsyncBufRead + Unpin + Send + 'static,
{
  let records = Reader::new(source, parser).into_channel(config);
  let (output_tx, output_rx) = channel(config.buffer_size);
  let name = config.display_name().to_string();

  tokio::spawn(async move {
    reducer.reduce(records, output_tx).await;
    debug!(name = %name, "map-reduce finished");
  });

  output_rx
}
