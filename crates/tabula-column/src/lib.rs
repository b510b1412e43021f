//! Typed in-memory column storage for Tabula.
//!
//! This crate focuses on:
//! - A closed set of [`StorageType`]s and immutable [`Storage`] columns with uniform missing
//!   value semantics.
//! - Growable [`Builder`]s that promote themselves to a mixed column when handed a value of
//!   another kind.
//! - Per-row [`Problem`] reporting and cooperative cancellation shared by the parsing and
//!   aggregation crates.

#![forbid(unsafe_code)]

mod bitmap;
mod builder;
pub mod cancel;
mod error;
mod grow;
mod problems;
mod storage;
mod storage_type;
mod value;

pub use crate::bitmap::BitVec;
pub use crate::builder::Builder;
pub use crate::cancel::{
    CancellationSignal, CancellationToken, Cancelled, NeverCancel, Safepoint, SAFEPOINT_INTERVAL,
};
pub use crate::error::{ColumnError, ColumnResult};
pub use crate::problems::{Problem, ProblemAggregator, ProblemKind, WithProblems};
pub use crate::storage::{
    BoolStorage, BoxedStorage, DateStorage, DateTimeStorage, DoubleStorage, LongStorage,
    MixedStorage, NumericStorage, Storage, TextStorage, TimeOfDayStorage,
};
pub use crate::storage_type::{Bits, StorageType};
pub use crate::value::Value;
