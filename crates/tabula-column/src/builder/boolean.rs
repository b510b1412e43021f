use super::{mismatch, ColumnBuilder, MixedBuilder};
use crate::bitmap::BitVec;
use crate::error::ColumnResult;
use crate::storage::{BoolStorage, Storage};
use crate::storage_type::StorageType;
use crate::value::Value;

/// Bit-packed boolean builder.
#[derive(Debug)]
pub(crate) struct BoolBuilder {
    values: BitVec,
    missing: BitVec,
}

impl BoolBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: BitVec::with_capacity_bits(capacity),
            missing: BitVec::with_capacity_bits(capacity),
        }
    }

    fn push(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::Null => {
                self.values.push(false);
                self.missing.push(true);
            }
            Value::Boolean(b) => {
                self.values.push(b);
                self.missing.push(false);
            }
            other => return Err(other),
        }
        Ok(())
    }
}

impl ColumnBuilder for BoolBuilder {
    fn try_append(&mut self, value: Value) -> Result<(), Value> {
        self.push(value)
    }

    fn try_append_no_grow(&mut self, value: Value) -> Result<(), Value> {
        debug_assert!(self.values.len() < self.values.capacity_bits());
        self.push(value)
    }

    fn append_nulls(&mut self, count: usize) {
        self.values.push_repeated(false, count);
        self.missing.push_repeated(true, count);
    }

    fn append_bulk_storage(&mut self, storage: &Storage) -> ColumnResult<()> {
        let Storage::Boolean(source) = storage else {
            return Err(mismatch(StorageType::Boolean, storage));
        };
        self.values.extend_from_bitvec(source.values());
        self.missing.extend_from_bitvec(source.missing());
        Ok(())
    }

    fn current_size(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.values.capacity_bits()
    }

    fn seal(&mut self) -> Storage {
        let mut values = std::mem::take(&mut self.values);
        let mut missing = std::mem::take(&mut self.missing);
        values.shrink_to_fit();
        missing.shrink_to_fit();
        Storage::Boolean(BoolStorage::new(values, missing))
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Boolean
    }

    fn to_mixed(&self, capacity: usize) -> MixedBuilder {
        let mut mixed = MixedBuilder::with_capacity(capacity);
        for idx in 0..self.values.len() {
            if self.missing.get(idx) {
                mixed.push(Value::Null);
            } else {
                mixed.push(Value::Boolean(self.values.get(idx)));
            }
        }
        mixed
    }
}
