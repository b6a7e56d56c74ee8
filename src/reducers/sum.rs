//! # Sum Reducer
//!
//! Sums the float value of each configured field across the input. A record
//! that lacks a field, or carries a value that is not a number, contributes
//! nothing to that field. Only fields seen at least once appear in the result.

use crate::record::Record;
use crate::reducer::{Reducer, RecordReceiver, RecordSender};
use async_trait::async_trait;
use tracing::trace;

/// Per-field float sums.
#[derive(Debug, Clone, Default)]
pub struct Sum {
  fields: Vec<String>,
}

impl Sum {
  /// Creates a sum reducer over the given field names.
  pub fn new<I, S>(fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      fields: fields.into_iter().map(Into::into).collect(),
    }
  }

  /// The fields being summed.
  pub fn fields(&self) -> &[String] {
    &self.fields
  }
}

#[async_trait]
impl Reducer for Sum {
  async fn reduce(&self, mut input: RecordReceiver, output: RecordSender) {
    let mut sums: Vec<Option<f64>> = vec![None; self.fields.len()];
    let mut seen: u64 = 0;

    while let Some(record) = input.recv().await {
      seen += 1;
      for (name, sum) in self.fields.iter().zip(sums.iter_mut()) {
        if let Ok(value) = record.float_field(name) {
          *sum = Some(sum.unwrap_or(0.0) + value);
        }
      }
    }

    let mut result = Record::empty();
    for (name, sum) in self.fields.iter().zip(sums) {
      if let Some(sum) = sum {
        result.set_float_field(name.as_str(), sum);
      }
    }
    trace!(records = seen, fields = result.len(), "sum finished");
    let _ = output.send(result).await;
  }
}
