//! Per-group aggregation over Tabula columns.
//!
//! An [`Aggregator`] reduces a group of row indices to one value. [`aggregate_groups`] runs an
//! aggregator over many groups and materialises the results as a column, and
//! [`AggregateConfig`] builds aggregators from serializable configuration.

#![forbid(unsafe_code)]

mod aggregator;
mod config;
mod count;
mod error;
mod first;
mod group;
mod ordering;
mod sum;

pub use crate::aggregator::Aggregator;
pub use crate::config::{AggregateConfig, AggregateKind, OrderBy};
pub use crate::count::Count;
pub use crate::error::{AggregateError, AggregateResult};
pub use crate::first::{First, Last};
pub use crate::group::aggregate_groups;
pub use crate::ordering::{OrderedMultiValueKey, SortDirection};
pub use crate::sum::Sum;
