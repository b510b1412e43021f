//! Text to number parsing for Tabula columns.
//!
//! [`NumberParser`] converts text to `i64` or `f64` values, inferring thousand and decimal
//! separators, bracketed negatives and currency symbols from the data. Whole-column parsing
//! picks one format for the column and reports the rows it cannot read as problems.

#![forbid(unsafe_code)]

mod error;
mod number;
mod options;
mod pattern;

pub use crate::error::{NumberParserError, NumberParserResult};
pub use crate::number::NumberParser;
pub use crate::options::{NumberParserOptions, Separators};
pub use crate::pattern::{Convention, PatternCache, PatternKey, Shape};
