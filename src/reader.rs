//! # Log Reader
//!
//! Turns raw log lines into [`Record`]s.
//!
//! ## Formats
//!
//! A format is literal text with `$name` variables, mirroring web server log
//! configuration:
//!
//! ```text
//! $remote_addr [$time_local] "$request"
//! ```
//!
//! Each variable captures everything up to the literal character that follows
//! it in the format. A variable at the very end captures up to the next space.
//! Variable names are lowercase letters and underscores.
//!
//! ## Reading
//!
//! [`Reader`] pulls lines from any [`AsyncBufRead`] and parses them one at a
//! time. [`Reader::into_channel`] runs the reader in its own task and feeds a
//! bounded record channel, skipping lines that do not match.

use crate::config::ReduceConfig;
use crate::error::ReaderError;
use crate::record::Record;
use crate::reducer::{RecordReceiver, channel};
use regex::{Captures, Regex};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, error, trace, warn};

/// Matches an escaped `$name` variable and the (possibly escaped) literal
/// character after it.
const VARIABLE_PATTERN: &str = r"\\\$([a-z_]+)(\\?(.))";

/// Compiled line format.
#[derive(Debug, Clone)]
pub struct Parser {
  format: String,
  regex: Regex,
}

impl Parser {
  /// Compiles a format string.
  ///
  /// ```rust
  /// use logweave::reader::Parser;
  ///
  /// let parser = Parser::new(r#"$remote_addr [$time_local] "$request""#).unwrap();
  /// let record = parser
  ///   .parse(r#"89.234.89.123 [08/Nov/2013:13:39:18 +0000] "GET /api/foo/bar HTTP/1.1""#)
  ///   .unwrap();
  /// assert_eq!(record.field("remote_addr").unwrap(), "89.234.89.123");
  /// ```
  pub fn new(format: &str) -> Result<Self, ReaderError> {
    let compile_error = |source: regex::Error| ReaderError::Format {
      format: format.to_string(),
      source,
    };

    let variable = Regex::new(VARIABLE_PATTERN).map_err(compile_error)?;
    // The trailing space gives a final variable a delimiter to stop at.
    let escaped = regex::escape(&format!("{} ", format));
    let pattern = variable.replace_all(&escaped, |caps: &Captures<'_>| {
      format!(
        "(?P<{}>[^{}]*){}",
        &caps[1],
        regex::escape(&caps[3]),
        &caps[2]
      )
    });
    let regex = Regex::new(&format!("^{}", pattern.trim())).map_err(compile_error)?;

    Ok(Self {
      format: format.to_string(),
      regex,
    })
  }

  /// The format this parser was compiled from.
  pub fn format(&self) -> &str {
    &self.format
  }

  /// Names of the variables in the format, in order of appearance.
  pub fn fields(&self) -> Vec<&str> {
    self.regex.capture_names().flatten().collect()
  }

  /// Parses one line into a record holding every variable of the format.
  pub fn parse(&self, line: &str) -> Result<Record, ReaderError> {
    let caps = self
      .regex
      .captures(line)
      .ok_or_else(|| ReaderError::Mismatch {
        line: line.to_string(),
      })?;

    let mut record = Record::empty();
    for name in self.regex.capture_names().flatten() {
      if let Some(value) = caps.name(name) {
        record.set_field(name, value.as_str());
      }
    }
    Ok(record)
  }
}

/// Reads records from a line-oriented source.
pub struct Reader<R> {
  lines: LinesStream<R>,
  parser: Arc<Parser>,
  line_no: usize,
}

impl<R> Reader<R>
where
  R: AsyncBufRead + Unpin,
{
  /// Creates a reader over `source` using an already compiled parser.
  pub fn new(source: R, parser: Arc<Parser>) -> Self {
    Self {
      lines: LinesStream::new(source.lines()),
      parser,
      line_no: 0,
    }
  }

  /// Creates a reader over `source`, compiling `format` first.
  pub fn with_format(source: R, format: &str) -> Result<Self, ReaderError> {
    Ok(Self::new(source, Arc::new(Parser::new(format)?)))
  }

  /// Number of lines consumed so far, including skipped ones.
  pub fn line_no(&self) -> usize {
    self.line_no
  }

  /// Returns the next record, or `Ok(None)` once the source is exhausted.
  ///
  /// Blank lines are skipped. A line that does not match the format yields
  /// [`ReaderError::Mismatch`]; reading may continue afterwards.
  pub async fn read(&mut self) -> Result<Option<Record>, ReaderError> {
    while let Some(line) = self.lines.next().await {
      let line = line?;
      self.line_no += 1;
      let line = line.trim_end_matches('\r');
      if line.is_empty() {
        continue;
      }
      return self.parser.parse(line).map(Some);
    }
    Ok(None)
  }
}

impl<R> Reader<R>
where
  R: AsyncBufRead + Unpin + Send + 'static,
{
  /// Spawns a task that reads the whole source into a bounded channel.
  ///
  /// Lines that do not match are logged and skipped. An I/O error ends the
  /// stream early. The channel closes when the source is exhausted.
  pub fn into_channel(self, config: &ReduceConfig) -> RecordReceiver {
    let (tx, rx) = channel(config.buffer_size);
    let name = config.display_name().to_string();
    let mut reader = self;

    tokio::spawn(async move {
      let mut parsed = 0usize;
      let mut skipped = 0usize;
      loop {
        match reader.read().await {
          Ok(Some(record)) => {
            parsed += 1;
            if tx.send(record).await.is_err() {
              trace!(name = %name, "record consumer went away");
              break;
            }
          }
          Ok(None) => break,
          Err(ReaderError::Mismatch { line }) => {
            skipped += 1;
            warn!(
              name = %name,
              line_no = reader.line_no,
              line = %line,
              "skipping malformed line"
            );
          }
          Err(e) => {
            error!(
              name = %name,
              line_no = reader.line_no,
              error = %e,
              "reading stopped"
            );
            break;
          }
        }
      }
      debug!(name = %name, parsed, skipped, "reader finished");
    });

    rx
  }
}
