use super::{mismatch, ColumnBuilder, MixedBuilder};
use crate::bitmap::BitVec;
use crate::error::ColumnResult;
use crate::grow::GrowableVec;
use crate::storage::{NumericStorage, Storage};
use crate::storage_type::StorageType;
use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NumericKind {
    Long,
    Double,
}

/// 64-bit numeric builder shared by the integer and float column kinds.
///
/// Slots hold raw 64-bit words (`i64` bit pattern or `f64::to_bits`); `kind` decides how they
/// are reinterpreted when sealing.
#[derive(Debug)]
pub(crate) struct NumericBuilder {
    kind: NumericKind,
    data: GrowableVec<u64>,
    missing: BitVec,
}

impl NumericBuilder {
    pub fn long(capacity: usize) -> Self {
        Self::new(NumericKind::Long, capacity)
    }

    pub fn double(capacity: usize) -> Self {
        Self::new(NumericKind::Double, capacity)
    }

    fn new(kind: NumericKind, capacity: usize) -> Self {
        Self {
            kind,
            data: GrowableVec::with_capacity(capacity),
            missing: BitVec::with_capacity_bits(capacity),
        }
    }

    /// The raw slot for `value`; `Ok(None)` is a missing value.
    fn slot(&self, value: Value) -> Result<Option<u64>, Value> {
        match (self.kind, value) {
            (_, Value::Null) => Ok(None),
            (NumericKind::Long, Value::Long(v)) => Ok(Some(v as u64)),
            (NumericKind::Double, Value::Double(v)) => Ok(Some(v.to_bits())),
            (_, other) => Err(other),
        }
    }

    fn decode(&self, word: u64) -> Value {
        match self.kind {
            NumericKind::Long => Value::Long(word as i64),
            NumericKind::Double => Value::Double(f64::from_bits(word)),
        }
    }
}

impl ColumnBuilder for NumericBuilder {
    fn try_append(&mut self, value: Value) -> Result<(), Value> {
        let slot = self.slot(value)?;
        self.data.push(slot.unwrap_or(0));
        self.missing.push(slot.is_none());
        Ok(())
    }

    fn try_append_no_grow(&mut self, value: Value) -> Result<(), Value> {
        let slot = self.slot(value)?;
        self.data.push_no_grow(slot.unwrap_or(0));
        self.missing.push(slot.is_none());
        Ok(())
    }

    fn append_nulls(&mut self, count: usize) {
        self.data.push_repeated(0, count);
        self.missing.push_repeated(true, count);
    }

    fn append_bulk_storage(&mut self, storage: &Storage) -> ColumnResult<()> {
        match (self.kind, storage) {
            (NumericKind::Long, Storage::Long(source)) => {
                for &v in source.values() {
                    self.data.push(v as u64);
                }
                self.missing.extend_from_bitvec(source.missing());
            }
            (NumericKind::Double, Storage::Double(source)) => {
                for &v in source.values() {
                    self.data.push(v.to_bits());
                }
                self.missing.extend_from_bitvec(source.missing());
            }
            _ => return Err(mismatch(self.storage_type(), storage)),
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
        let words = self.data.take();
        let mut missing = std::mem::take(&mut self.missing);
        missing.shrink_to_fit();
        match self.kind {
            NumericKind::Long => Storage::Long(NumericStorage::new(
                words.into_iter().map(|w| w as i64).collect(),
                missing,
            )),
            NumericKind::Double => Storage::Double(NumericStorage::new(
                words.into_iter().map(f64::from_bits).collect(),
                missing,
            )),
        }
    }

    fn storage_type(&self) -> StorageType {
        match self.kind {
            NumericKind::Long => StorageType::INTEGER_64,
            NumericKind::Double => StorageType::FLOAT_64,
        }
    }

    fn to_mixed(&self, capacity: usize) -> MixedBuilder {
        let mut mixed = MixedBuilder::with_capacity(capacity);
        for (idx, &word) in self.data.as_slice().iter().enumerate() {
            if self.missing.get(idx) {
                mixed.push(Value::Null);
            } else {
                mixed.push(self.decode(word));
            }
        }
        mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_bits_survive_sealing() {
        let mut builder = NumericBuilder::double(3);
        builder.try_append_no_grow(Value::Double(-0.0)).unwrap();
        builder.try_append_no_grow(Value::Null).unwrap();
        builder.try_append_no_grow(Value::Double(1.25)).unwrap();

        let Storage::Double(storage) = builder.seal() else {
            panic!("expected a double storage");
        };
        assert!(storage.get(0).unwrap().is_sign_negative());
        assert_eq!(storage.get(1), None);
        assert_eq!(storage.get(2), Some(1.25));
    }

    #[test]
    fn long_builder_hands_back_doubles() {
        let mut builder = NumericBuilder::long(1);
        assert_eq!(
            builder.try_append(Value::Double(1.0)),
            Err(Value::Double(1.0))
        );
        assert_eq!(builder.current_size(), 0);
    }
}
