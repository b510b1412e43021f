use super::{mismatch, ColumnBuilder, MixedBuilder};
use crate::error::ColumnResult;
use crate::grow::GrowableVec;
use crate::storage::{BoxedStorage, Storage};
use crate::storage_type::StorageType;
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use std::sync::Arc;

/// Element types stored boxed, with `None` as the missing sentinel.
pub(crate) trait BoxedElement: Clone + Sized {
    const STORAGE_TYPE: StorageType;

    /// Unwrap a non-null value of the matching kind, or hand it back.
    fn from_value(value: Value) -> Result<Self, Value>;

    fn to_value(&self) -> Value;

    fn wrap(storage: BoxedStorage<Self>) -> Storage;

    fn view(storage: &Storage) -> Option<&BoxedStorage<Self>>;
}

impl BoxedElement for NaiveDate {
    const STORAGE_TYPE: StorageType = StorageType::Date;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Date(d) => Ok(d),
            other => Err(other),
        }
    }

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn wrap(storage: BoxedStorage<Self>) -> Storage {
        Storage::Date(storage)
    }

    fn view(storage: &Storage) -> Option<&BoxedStorage<Self>> {
        match storage {
            Storage::Date(s) => Some(s),
            _ => None,
        }
    }
}

impl BoxedElement for DateTime<FixedOffset> {
    const STORAGE_TYPE: StorageType = StorageType::DateTime;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => Err(other),
        }
    }

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn wrap(storage: BoxedStorage<Self>) -> Storage {
        Storage::DateTime(storage)
    }

    fn view(storage: &Storage) -> Option<&BoxedStorage<Self>> {
        match storage {
            Storage::DateTime(s) => Some(s),
            _ => None,
        }
    }
}

impl BoxedElement for NaiveTime {
    const STORAGE_TYPE: StorageType = StorageType::TimeOfDay;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::TimeOfDay(t) => Ok(t),
            other => Err(other),
        }
    }

    fn to_value(&self) -> Value {
        Value::TimeOfDay(*self)
    }

    fn wrap(storage: BoxedStorage<Self>) -> Storage {
        Storage::TimeOfDay(storage)
    }

    fn view(storage: &Storage) -> Option<&BoxedStorage<Self>> {
        match storage {
            Storage::TimeOfDay(s) => Some(s),
            _ => None,
        }
    }
}

impl BoxedElement for Arc<str> {
    const STORAGE_TYPE: StorageType = StorageType::TEXT;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other),
        }
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn wrap(storage: BoxedStorage<Self>) -> Storage {
        Storage::Text(storage)
    }

    fn view(storage: &Storage) -> Option<&BoxedStorage<Self>> {
        match storage {
            Storage::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Builder for the boxed temporal and text kinds.
#[derive(Debug)]
pub(crate) struct BoxedBuilder<T> {
    data: GrowableVec<Option<T>>,
}

pub(crate) type DateBuilder = BoxedBuilder<NaiveDate>;
pub(crate) type DateTimeBuilder = BoxedBuilder<DateTime<FixedOffset>>;
pub(crate) type TimeOfDayBuilder = BoxedBuilder<NaiveTime>;
pub(crate) type TextBuilder = BoxedBuilder<Arc<str>>;

impl<T: BoxedElement> BoxedBuilder<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: GrowableVec::with_capacity(capacity),
        }
    }

    fn slot(value: Value) -> Result<Option<T>, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: BoxedElement> ColumnBuilder for BoxedBuilder<T> {
    fn try_append(&mut self, value: Value) -> Result<(), Value> {
        self.data.push(Self::slot(value)?);
        Ok(())
    }

    fn try_append_no_grow(&mut self, value: Value) -> Result<(), Value> {
        self.data.push_no_grow(Self::slot(value)?);
        Ok(())
    }

    fn append_nulls(&mut self, count: usize) {
        self.data.push_repeated(None, count);
    }

    fn append_bulk_storage(&mut self, storage: &Storage) -> ColumnResult<()> {
        let source = T::view(storage).ok_or_else(|| mismatch(T::STORAGE_TYPE, storage))?;
        self.data.extend_from_slice(source.slots());
        Ok(())
    }

    fn current_size(&self) -> usize {
        self.data.len()
    }

    fn capacity(&self) -> usize {
        self.data.capacity()
    }

    fn seal(&mut self) -> Storage {
        T::wrap(BoxedStorage::new(self.data.take()))
    }

    fn storage_type(&self) -> StorageType {
        T::STORAGE_TYPE
    }

    fn to_mixed(&self, capacity: usize) -> MixedBuilder {
        let mut mixed = MixedBuilder::with_capacity(capacity);
        for slot in self.data.as_slice() {
            mixed.push(slot.as_ref().map(T::to_value).unwrap_or(Value::Null));
        }
        mixed
    }
}
