use crate::error::{NumberParserError, NumberParserResult};
use serde::{Deserialize, Serialize};

/// Explicit separators; disables separator inference.
///
/// `thousand = None` means digits are not grouped. `decimal` is only consulted by decimal
/// parsers, which require it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Separators {
    pub thousand: Option<char>,
    pub decimal: Option<char>,
}

/// Configuration of a [`crate::NumberParser`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberParserOptions {
    /// Produce `f64` values instead of `i64`.
    pub allow_decimal: bool,
    /// Accept a currency symbol before or after the digits.
    pub allow_currency: bool,
    pub allow_leading_zeros: bool,
    /// Tolerate whitespace around the value.
    pub trim_values: bool,
    /// Accept an `e`/`E` exponent. Requires `allow_decimal`.
    pub allow_scientific: bool,
    /// Fixed separators; `None` infers them from the data.
    pub separators: Option<Separators>,
    /// Only run the direct scan; no separator or currency formats are tried.
    pub fast_only: bool,
}

impl Default for NumberParserOptions {
    fn default() -> Self {
        Self {
            allow_decimal: true,
            allow_currency: false,
            allow_leading_zeros: false,
            trim_values: true,
            allow_scientific: true,
            separators: None,
            fast_only: false,
        }
    }
}

impl NumberParserOptions {
    pub fn validate(&self) -> NumberParserResult<()> {
        if self.allow_scientific && !self.allow_decimal {
            return Err(NumberParserError::ScientificWithoutDecimal);
        }

        if let Some(separators) = self.separators {
            if self.allow_decimal && separators.decimal.is_none() {
                return Err(NumberParserError::InvalidDecimalSeparator(String::new()));
            }
            if let (Some(thousand), Some(decimal)) = (separators.thousand, separators.decimal) {
                if self.allow_decimal && thousand == decimal {
                    return Err(NumberParserError::SeparatorsCollide(thousand));
                }
            }
        }

        Ok(())
    }
}

/// The single character of `text`, if it has exactly one.
pub(crate) fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Thousand separator argument: empty disables grouping, otherwise exactly one character.
pub(crate) fn thousand_separator(text: &str) -> NumberParserResult<Option<char>> {
    if text.is_empty() {
        return Ok(None);
    }
    single_char(text)
        .map(Some)
        .ok_or_else(|| NumberParserError::InvalidThousandSeparator(text.to_string()))
}
