//! # logweave
//!
//! Composable, concurrent reducers over streams of parsed log records.
//!
//! logweave reads log lines, turns them into [`Record`]s and runs them through
//! a graph of reducers connected by bounded tokio channels. Reducers count,
//! sum, average and filter; composite reducers broadcast to several children,
//! group by field values, or chain stages one after another.
//!
//! ## Key Features
//!
//! - **Async-First**: every reducer is an async task fed by bounded channels
//! - **Composable**: any nesting of [`Chain`], [`GroupBy`] and [`Pipeline`]
//! - **Backpressure**: slow consumers throttle producers; nothing is unbounded
//! - **Schema-Free**: fields are strings, typed on demand
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logweave::config::ReduceConfig;
//! use logweave::reader::Parser;
//! use logweave::reducers::{Count, GroupBy, Sum};
//! use logweave::map_reduce::map_reduce;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let file = tokio::fs::File::open("access.log").await?;
//! let parser = Arc::new(Parser::new(r#"$remote_addr [$time_local] "$request" $status $bytes"#)?);
//! let reducer = Arc::new(
//!   GroupBy::new(["status"])
//!     .with(Sum::new(["bytes"]))
//!     .with(Count::new()),
//! );
//!
//! let mut results = map_reduce(
//!   tokio::io::BufReader::new(file),
//!   parser,
//!   reducer,
//!   &ReduceConfig::default(),
//! );
//! while let Some(record) = results.recv().await {
//!   println!("{}", record);
//! }
//! # Ok(())
//! # }
//! ```

// Documentation enforcement
#![warn(missing_docs)]

/// Runtime configuration for drivers and readers.
pub mod config;
/// Error types.
pub mod error;
/// Reader plus reducer wiring.
pub mod map_reduce;
/// Line format parsing and async line reading.
pub mod reader;
/// The record data model.
pub mod record;
/// The reducer contract and channel helpers.
pub mod reducer;
/// Built-in reducers.
pub mod reducers;

pub use error::{ConfigError, FieldError, ReaderError};
pub use record::Record;
pub use reducer::{RecordReceiver, RecordSender, Reducer, reduce_all};
pub use reducers::{
  Average, Chain, Count, GroupBy, IntervalFilter, PassThrough, Pipeline, Sum, TimeFormat,
};
