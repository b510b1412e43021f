use tabula_column::{Cancelled, ColumnError};

pub type NumberParserResult<T> = Result<T, NumberParserError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumberParserError {
    #[error("scientific notation requires decimal numbers to be allowed")]
    ScientificWithoutDecimal,

    #[error("decimal separator must be a single character, got {0:?}")]
    InvalidDecimalSeparator(String),

    #[error("thousand separator must be at most one character, got {0:?}")]
    InvalidThousandSeparator(String),

    #[error("thousand and decimal separators must differ, both are {0:?}")]
    SeparatorsCollide(char),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error(transparent)]
    Column(#[from] ColumnError),
}
