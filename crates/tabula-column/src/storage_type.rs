use serde::{Deserialize, Serialize};
use std::fmt;

/// Bit width of an integer or floating point column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bits {
    Bits8,
    Bits16,
    Bits32,
    Bits64,
}

impl Bits {
    #[must_use]
    pub const fn to_integer(self) -> u32 {
        match self {
            Bits::Bits8 => 8,
            Bits::Bits16 => 16,
            Bits::Bits32 => 32,
            Bits::Bits64 => 64,
        }
    }
}

/// The element kind of a column.
///
/// This is a closed set: every dispatch site (builder factory, parser output, aggregate result
/// type) matches on it exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    Boolean,
    Integer(Bits),
    Float(Bits),
    Date,
    DateTime,
    TimeOfDay,
    /// Text values. `max_length = None` means unbounded; `fixed_length` pads every value to
    /// `max_length` characters.
    Text {
        max_length: Option<u32>,
        fixed_length: bool,
    },
    /// Fully dynamic column holding values of any kind.
    AnyObject,
}

impl StorageType {
    pub const INTEGER_64: StorageType = StorageType::Integer(Bits::Bits64);
    pub const FLOAT_64: StorageType = StorageType::Float(Bits::Bits64);
    pub const TEXT: StorageType = StorageType::Text {
        max_length: None,
        fixed_length: false,
    };

    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, StorageType::Integer(_) | StorageType::Float(_))
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Boolean => f.write_str("Boolean"),
            StorageType::Integer(bits) => write!(f, "Integer ({} bits)", bits.to_integer()),
            StorageType::Float(bits) => write!(f, "Float ({} bits)", bits.to_integer()),
            StorageType::Date => f.write_str("Date"),
            StorageType::DateTime => f.write_str("Date_Time"),
            StorageType::TimeOfDay => f.write_str("Time_Of_Day"),
            StorageType::Text {
                max_length: None,
                fixed_length: _,
            } => f.write_str("Text"),
            StorageType::Text {
                max_length: Some(len),
                fixed_length: true,
            } => write!(f, "Text (fixed {len})"),
            StorageType::Text {
                max_length: Some(len),
                fixed_length: false,
            } => write!(f, "Text (max {len})"),
            StorageType::AnyObject => f.write_str("Mixed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(StorageType::INTEGER_64.to_string(), "Integer (64 bits)");
        assert_eq!(StorageType::Float(Bits::Bits32).to_string(), "Float (32 bits)");
        assert_eq!(StorageType::TEXT.to_string(), "Text");
        assert_eq!(StorageType::AnyObject.to_string(), "Mixed");
    }

    #[test]
    fn serde_roundtrip() {
        let ty = StorageType::Text {
            max_length: Some(10),
            fixed_length: true,
        };
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(serde_json::from_str::<StorageType>(&json).unwrap(), ty);

        let json = serde_json::to_string(&StorageType::INTEGER_64).unwrap();
        assert_eq!(json, r#"{"integer":"bits64"}"#);
    }
}
