//! Summarizes an access log per status code.
//!
//! ```text
//! cargo run --example access_log_summary -- access.log '$remote_addr [$time_local] "$request" $status $body_bytes_sent'
//! ```
//!
//! Results are printed as one JSON object per line. Skipped lines are
//! reported on stderr. `LOGWEAVE_CONFIG` may hold a JSON `ReduceConfig`.

use logweave::config::ReduceConfig;
use logweave::map_reduce::map_reduce;
use logweave::reader::Parser;
use logweave::reducers::{Count, GroupBy, Sum};
use std::sync::Arc;
use tokio::io::BufReader;

const DEFAULT_FORMAT: &str =
  r#"$remote_addr - $remote_user [$time_local] "$request" $status $body_bytes_sent"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();

  let mut args = std::env::args().skip(1);
  let path = args.next().ok_or("usage: access_log_summary <file> [format]")?;
  let format = args.next().unwrap_or_else(|| DEFAULT_FORMAT.to_string());

  let config = match std::env::var("LOGWEAVE_CONFIG") {
    Ok(json) => ReduceConfig::from_json(&json)?,
    Err(_) => ReduceConfig::default().with_name("access_log_summary"),
  };

  let file = tokio::fs::File::open(&path).await?;
  let parser = Arc::new(Parser::new(&format)?);
  let reducer = Arc::new(
    GroupBy::new(["status"])
      .with(Sum::new(["body_bytes_sent"]))
      .with(Count::new()),
  );

  let mut results = map_reduce(BufReader::new(file), parser, reducer, &config);
  while let Some(record) = results.recv().await {
    println!("{}", serde_json::to_string(&record)?);
  }
  Ok(())
}
