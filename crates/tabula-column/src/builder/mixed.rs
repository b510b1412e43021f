use super::ColumnBuilder;
use crate::error::ColumnResult;
use crate::grow::GrowableVec;
use crate::storage::{BoxedStorage, Storage};
use crate::storage_type::StorageType;
use crate::value::Value;

/// The dynamic fallback builder; accepts values and storages of every kind.
#[derive(Debug)]
pub(crate) struct MixedBuilder {
    data: GrowableVec<Option<Value>>,
}

impl MixedBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: GrowableVec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.data.push(Self::slot(value));
    }

    fn slot(value: Value) -> Option<Value> {
        match value {
            Value::Null => None,
            other => Some(other),
        }
    }
}

impl ColumnBuilder for MixedBuilder {
    fn try_append(&mut self, value: Value) -> Result<(), Value> {
        self.push(value);
        Ok(())
    }

    fn try_append_no_grow(&mut self, value: Value) -> Result<(), Value> {
        self.data.push_no_grow(Self::slot(value));
        Ok(())
    }

    fn append_nulls(&mut self, count: usize) {
        self.data.push_repeated(None, count);
    }

    fn append_bulk_storage(&mut self, storage: &Storage) -> ColumnResult<()> {
        if let Storage::Mixed(source) = storage {
            self.data.extend_from_slice(source.slots());
            return Ok(());
        }

        for value in storage.iter() {
            self.push(value);
        }
        Ok(())
    }

    fn current_size(&self) -> usize {
        self.data.len()
    }

    fn capacity(&self) -> usize {
        self.data.capacity()
    }

    fn seal(&mut self) -> Storage {
        Storage::Mixed(BoxedStorage::new(self.data.take()))
    }

    fn storage_type(&self) -> StorageType {
        StorageType::AnyObject
    }

    fn to_mixed(&self, capacity: usize) -> MixedBuilder {
        let mut mixed = MixedBuilder::with_capacity(capacity);
        mixed.data.extend_from_slice(self.data.as_slice());
        mixed
    }
}
