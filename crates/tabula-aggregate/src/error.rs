use tabula_column::{Cancelled, ColumnError};

pub type AggregateResult<T> = Result<T, AggregateError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("{columns} ordering columns but {directions} sort directions")]
    OrderingLengthMismatch { columns: usize, directions: usize },

    #[error("ordering column {index} has {actual} rows, fewer than the {expected} rows being aggregated")]
    OrderingColumnTooShort {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("aggregate {name} refers to column {index}, but only {available} columns exist")]
    UnknownColumn {
        name: String,
        index: usize,
        available: usize,
    },

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error(transparent)]
    Column(#[from] ColumnError),
}
