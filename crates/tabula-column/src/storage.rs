#![forbid(unsafe_code)]

use crate::bitmap::BitVec;
use crate::builder::Builder;
use crate::error::ColumnResult;
use crate::storage_type::StorageType;
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use std::sync::Arc;

/// Bit-packed boolean column with a missing bitmap.
#[derive(Clone, Debug, PartialEq)]
pub struct BoolStorage {
    values: BitVec,
    missing: BitVec,
}

impl BoolStorage {
    pub(crate) fn new(values: BitVec, missing: BitVec) -> Self {
        debug_assert_eq!(values.len(), missing.len());
        Self { values, missing }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_missing(&self, idx: usize) -> bool {
        idx >= self.len() || self.missing.get(idx)
    }

    pub fn get(&self, idx: usize) -> Option<bool> {
        if self.is_missing(idx) {
            None
        } else {
            Some(self.values.get(idx))
        }
    }

    pub fn values(&self) -> &BitVec {
        &self.values
    }

    /// Bitmap with a set bit for every missing row.
    pub fn missing(&self) -> &BitVec {
        &self.missing
    }
}

/// Primitive-backed numeric column: a dense value array plus a missing bitmap.
///
/// Missing slots hold an arbitrary placeholder in `data` (zero when built by this crate).
#[derive(Clone, Debug, PartialEq)]
pub struct NumericStorage<T> {
    data: Vec<T>,
    missing: BitVec,
}

pub type LongStorage = NumericStorage<i64>;
pub type DoubleStorage = NumericStorage<f64>;

impl<T: Copy> NumericStorage<T> {
    pub(crate) fn new(data: Vec<T>, missing: BitVec) -> Self {
        debug_assert_eq!(data.len(), missing.len());
        Self { data, missing }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_missing(&self, idx: usize) -> bool {
        idx >= self.len() || self.missing.get(idx)
    }

    pub fn get(&self, idx: usize) -> Option<T> {
        if self.is_missing(idx) {
            None
        } else {
            Some(self.data[idx])
        }
    }

    /// Raw slots, including placeholders at missing positions.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    pub fn missing(&self) -> &BitVec {
        &self.missing
    }
}

/// Object-backed column; `None` is the missing sentinel.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxedStorage<T> {
    data: Vec<Option<T>>,
}

pub type DateStorage = BoxedStorage<NaiveDate>;
pub type DateTimeStorage = BoxedStorage<DateTime<FixedOffset>>;
pub type TimeOfDayStorage = BoxedStorage<NaiveTime>;
pub type TextStorage = BoxedStorage<Arc<str>>;
pub type MixedStorage = BoxedStorage<Value>;

impl<T> BoxedStorage<T> {
    pub(crate) fn new(data: Vec<Option<T>>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_missing(&self, idx: usize) -> bool {
        self.get(idx).is_none()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.data.get(idx).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.data.iter().map(Option::as_ref)
    }

    pub(crate) fn slots(&self) -> &[Option<T>] {
        &self.data
    }
}

/// An immutable, materialised column.
///
/// Produced once by [`Builder::seal`]; afterwards read-only and safe to share between threads.
#[derive(Clone, Debug, PartialEq)]
pub enum Storage {
    Boolean(BoolStorage),
    Long(LongStorage),
    Double(DoubleStorage),
    Date(DateStorage),
    DateTime(DateTimeStorage),
    TimeOfDay(TimeOfDayStorage),
    Text(TextStorage),
    Mixed(MixedStorage),
}

impl Storage {
    /// Build a storage of `storage_type` from a sequence of values.
    ///
    /// Values that do not fit `storage_type` promote the column to [`StorageType::AnyObject`],
    /// exactly as [`Builder::append`] does.
    pub fn from_values<I, V>(storage_type: StorageType, values: I) -> ColumnResult<Storage>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter();
        let mut builder = Builder::for_type(storage_type, values.size_hint().0)?;
        for value in values {
            builder.append(value)?;
        }
        builder.seal()
    }

    pub fn len(&self) -> usize {
        match self {
            Storage::Boolean(s) => s.len(),
            Storage::Long(s) => s.len(),
            Storage::Double(s) => s.len(),
            Storage::Date(s) => s.len(),
            Storage::DateTime(s) => s.len(),
            Storage::TimeOfDay(s) => s.len(),
            Storage::Text(s) => s.len(),
            Storage::Mixed(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Storage::Boolean(_) => StorageType::Boolean,
            Storage::Long(_) => StorageType::INTEGER_64,
            Storage::Double(_) => StorageType::FLOAT_64,
            Storage::Date(_) => StorageType::Date,
            Storage::DateTime(_) => StorageType::DateTime,
            Storage::TimeOfDay(_) => StorageType::TimeOfDay,
            Storage::Text(_) => StorageType::TEXT,
            Storage::Mixed(_) => StorageType::AnyObject,
        }
    }

    /// Whether row `idx` is missing. Rows past the end count as missing.
    pub fn is_missing(&self, idx: usize) -> bool {
        match self {
            Storage::Boolean(s) => s.is_missing(idx),
            Storage::Long(s) => s.is_missing(idx),
            Storage::Double(s) => s.is_missing(idx),
            Storage::Date(s) => s.is_missing(idx),
            Storage::DateTime(s) => s.is_missing(idx),
            Storage::TimeOfDay(s) => s.is_missing(idx),
            Storage::Text(s) => s.is_missing(idx),
            Storage::Mixed(s) => s.is_missing(idx),
        }
    }

    /// Boxed read of row `idx`; missing (and out-of-range) rows read as [`Value::Null`].
    pub fn get(&self, idx: usize) -> Value {
        match self {
            Storage::Boolean(s) => s.get(idx).into(),
            Storage::Long(s) => s.get(idx).into(),
            Storage::Double(s) => s.get(idx).into(),
            Storage::Date(s) => s.get(idx).copied().into(),
            Storage::DateTime(s) => s.get(idx).copied().into(),
            Storage::TimeOfDay(s) => s.get(idx).copied().into(),
            Storage::Text(s) => s.get(idx).cloned().into(),
            Storage::Mixed(s) => s.get(idx).cloned().unwrap_or(Value::Null),
        }
    }

    pub fn count_missing(&self) -> usize {
        match self {
            Storage::Boolean(s) => s.missing().count_ones(),
            Storage::Long(s) => s.missing().count_ones(),
            Storage::Double(s) => s.missing().count_ones(),
            _ => (0..self.len()).filter(|&idx| self.is_missing(idx)).count(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(|idx| self.get(idx))
    }

    pub fn as_long(&self) -> Option<&LongStorage> {
        match self {
            Storage::Long(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<&DoubleStorage> {
        match self {
            Storage::Double(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextStorage> {
        match self {
            Storage::Text(s) => Some(s),
            _ => None,
        }
    }
}
