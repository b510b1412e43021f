use crate::storage_type::StorageType;

pub type ColumnResult<T> = Result<T, ColumnError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("only 64-bit {kind} columns are supported, got {bits} bits")]
    UnsupportedBits { kind: &'static str, bits: u32 },

    #[error("fixed-length text columns are not supported")]
    UnsupportedFixedText,

    #[error("text columns with a maximum length are not supported (max length {max_length})")]
    UnsupportedBoundedText { max_length: u32 },

    #[error("storage type mismatch: cannot append a {found} storage to a {expected} builder")]
    StorageTypeMismatch {
        expected: StorageType,
        found: StorageType,
    },

    #[error("builder has already been sealed")]
    AlreadySealed,
}
