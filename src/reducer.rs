//! # Reducer Contract
//!
//! Every operator, leaf or composite, implements [`Reducer`]. A reducer reads
//! records from a bounded input channel until every sender is gone, writes
//! its results to a bounded output channel, and returns.
//!
//! ## Completion
//!
//! The output sender is moved into [`Reducer::reduce`], so the channel closes
//! exactly once: when `reduce` returns and the sender is dropped. Consumers
//! treat the closed channel as "no more results". There is no error channel;
//! records a reducer cannot use are skipped.
//!
//! ## Backpressure
//!
//! Sends suspend while the output buffer is full, receives suspend while the
//! input is empty. Composite reducers size the channels they create from the
//! capacities of the channels they were given, see [`channel`].

use crate::config::ReduceConfig;
use crate::record::Record;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

/// Sending half of a record stream.
pub type RecordSender = mpsc::Sender<Record>;

/// Receiving half of a record stream.
pub type RecordReceiver = mpsc::Receiver<Record>;

/// The operator contract.
///
/// Implementations must drain `input` completely before returning, even if
/// the output consumer has gone away, so that an upstream producer blocked on
/// a full buffer is always released.
#[async_trait]
pub trait Reducer: Send + Sync {
  /// Consumes `input` and writes results to `output`.
  async fn reduce(&self, input: RecordReceiver, output: RecordSender);
}

/// Creates a bounded record channel. A zero capacity is raised to one, since
/// tokio rejects empty buffers.
pub fn channel(capacity: usize) -> (RecordSender, RecordReceiver) {
  mpsc::channel(capacity.max(1))
}

/// Copies every record from `input` to `output`, then drops `output`.
///
/// If the consumer disappears the remaining input is still drained.
pub(crate) async fn forward(mut input: RecordReceiver, output: RecordSender) -> usize {
  let mut forwarded = 0;
  while let Some(record) = input.recv().await {
    if output.send(record).await.is_ok() {
      forwarded += 1;
    }
  }
  forwarded
}

/// Runs `reducer` over an in-memory batch and collects everything it emits.
///
/// Feeding, reducing and collecting are polled together in the calling task,
/// so the result is independent of `config.buffer_size`.
///
/// ```rust
/// use logweave::config::ReduceConfig;
/// use logweave::record::Record;
/// use logweave::reducer::reduce_all;
/// use logweave::reducers::Count;
///
/// # tokio_test_main();
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn tokio_test_main() {
/// let records = vec![Record::empty(), Record::empty()];
/// let results = reduce_all(&Count::new(), records, &ReduceConfig::default()).await;
/// assert_eq!(results[0].field("count").unwrap(), "2");
/// # }
/// ```
pub async fn reduce_all<R, I>(reducer: &R, records: I, config: &ReduceConfig) -> Vec<Record>
where
  R: Reducer + ?Sized,
  I: IntoIterator<Item = Record>,
  I::IntoIter: Send,
{
  let (input_tx, input_rx) = channel(config.buffer_size);
  let (output_tx, mut output_rx) = channel(config.buffer_size);

  let feed = async move {
    for record in records {
      if input_tx.send(record).await.is_err() {
        break;
      }
    }
  };
  let collect = async move {
    let mut results = Vec::new();
    while let Some(record) = output_rx.recv().await {
      results.push(record);
    }
    results
  };

  let ((), (), results) = tokio::join!(feed, reducer.reduce(input_rx, output_tx), collect);
  debug!(
    name = config.display_name(),
    results = results.len(),
    "reduce finished"
  );
  results
}
