//! # Average Reducer
//!
//! Running arithmetic mean of each configured field.
//!
//! The mean is updated incrementally as `avg = (avg * n + x) / (n + 1)`, where
//! `n` is the number of input records processed before the current one. `n`
//! advances once per record, whether or not the record carried the field. When
//! records populate different subsets of the fields, a field's result is
//! therefore not the plain mean over the records that had it.

use crate::record::Record;
use crate::reducer::{Reducer, RecordReceiver, RecordSender};
use async_trait::async_trait;
use tracing::trace;

/// Per-field running averages.
#[derive(Debug, Clone, Default)]
pub struct Average {
  fields: Vec<String>,
}

impl Average {
  /// Creates an average reducer over the given field names.
  pub fn new<I, S>(fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      fields: fields.into_iter().map(Into::into).collect(),
    }
  }

  /// The fields being averaged.
  pub fn fields(&self) -> &[String] {
    &self.fields
  }
}

#[async_trait]
impl Reducer for Average {
  async fn reduce(&self, mut input: RecordReceiver, output: RecordSender) {
    let mut averages: Vec<Option<f64>> = vec![None; self.fields.len()];
    let mut count = 0.0_f64;

    while let Some(record) = input.recv().await {
      for (name, avg) in self.fields.iter().zip(averages.iter_mut()) {
        if let Ok(value) = record.float_field(name) {
          let current = avg.unwrap_or(0.0);
          *avg = Some((current * count + value) / (count + 1.0));
        }
      }
      count += 1.0;
    }

    let mut result = Record::empty();
    for (name, avg) in self.fields.iter().zip(averages) {
      if let Some(avg) = avg {
        result.set_float_field(name.as_str(), avg);
      }
    }
    trace!(records = count, fields = result.len(), "average finished");
    let _ = output.send(result).await;
  }
}
