//! # Reducer Library
//!
//! Built-in implementations of the [`Reducer`](crate::reducer::Reducer) contract.
//!
//! ## Leaf Reducers
//!
//! - **PassThrough**: forwards input unchanged
//! - **Count**: one record, `count = N`
//! - **Sum**: one record, per-field float sums
//! - **Average**: one record, per-field running means
//! - **IntervalFilter**: forwards records whose timestamp falls in a window
//!
//! ## Composite Reducers
//!
//! - **Chain**: broadcasts input to every child, merges their single results
//! - **GroupBy**: runs an independent `Chain` per grouping key
//! - **Pipeline**: feeds each stage's output into the next stage

pub mod average;
pub mod chain;
pub mod count;
pub mod group_by;
pub mod interval;
pub mod pass_through;
pub mod pipeline;
pub mod sum;

pub use average::Average;
pub use chain::Chain;
pub use count::Count;
pub use group_by::GroupBy;
pub use interval::{IntervalFilter, TimeFormat};
pub use pass_through::PassThrough;
pub use pipeline::Pipeline;
pub use sum::Sum;

#[cfg(test)]
mod group_by_test;
#[cfg(test)]
mod interval_test;
#[cfg(test)]
pub(crate) mod test_support;
