//! Growable column builders.
//!
//! Every storage kind has one concrete builder implementing [`ColumnBuilder`]. The public
//! [`Builder`] handle dispatches to the concrete builder and owns the two cross-cutting rules:
//!
//! - a value the concrete builder rejects promotes the handle to the dynamic
//!   [`MixedBuilder`], copying every slot appended so far, and
//! - sealing is one-shot; afterwards every operation fails with
//!   [`ColumnError::AlreadySealed`].

#![forbid(unsafe_code)]

mod boolean;
mod boxed;
mod mixed;
mod numeric;

use crate::error::{ColumnError, ColumnResult};
use crate::storage::Storage;
use crate::storage_type::{Bits, StorageType};
use crate::value::Value;

use self::boolean::BoolBuilder;
use self::boxed::{DateBuilder, DateTimeBuilder, TextBuilder, TimeOfDayBuilder};
use self::mixed::MixedBuilder;
use self::numeric::NumericBuilder;

/// Operations shared by the concrete builders.
///
/// `try_append*` hand an incompatible value back to the caller instead of storing it, so the
/// [`Builder`] handle can retype and retry.
pub(crate) trait ColumnBuilder {
    fn try_append(&mut self, value: Value) -> Result<(), Value>;

    fn try_append_no_grow(&mut self, value: Value) -> Result<(), Value>;

    fn append_nulls(&mut self, count: usize);

    fn append_bulk_storage(&mut self, storage: &Storage) -> ColumnResult<()>;

    fn current_size(&self) -> usize;

    fn capacity(&self) -> usize;

    /// Moves the appended slots into a storage, leaving the builder empty.
    fn seal(&mut self) -> Storage;

    fn storage_type(&self) -> StorageType;

    /// Copies the appended slots, in order, into a dynamic builder with room for `capacity`.
    fn to_mixed(&self, capacity: usize) -> MixedBuilder;
}

fn mismatch(expected: StorageType, storage: &Storage) -> ColumnError {
    ColumnError::StorageTypeMismatch {
        expected,
        found: storage.storage_type(),
    }
}

#[derive(Debug)]
enum BuilderKind {
    Boolean(BoolBuilder),
    Numeric(NumericBuilder),
    Date(DateBuilder),
    DateTime(DateTimeBuilder),
    TimeOfDay(TimeOfDayBuilder),
    Text(TextBuilder),
    Mixed(MixedBuilder),
}

impl BuilderKind {
    fn as_dyn(&mut self) -> &mut dyn ColumnBuilder {
        match self {
            BuilderKind::Boolean(b) => b,
            BuilderKind::Numeric(b) => b,
            BuilderKind::Date(b) => b,
            BuilderKind::DateTime(b) => b,
            BuilderKind::TimeOfDay(b) => b,
            BuilderKind::Text(b) => b,
            BuilderKind::Mixed(b) => b,
        }
    }

    fn as_dyn_ref(&self) -> &dyn ColumnBuilder {
        match self {
            BuilderKind::Boolean(b) => b,
            BuilderKind::Numeric(b) => b,
            BuilderKind::Date(b) => b,
            BuilderKind::DateTime(b) => b,
            BuilderKind::TimeOfDay(b) => b,
            BuilderKind::Text(b) => b,
            BuilderKind::Mixed(b) => b,
        }
    }
}

/// A mutable, growable column under construction.
#[derive(Debug)]
pub struct Builder {
    kind: BuilderKind,
    sealed: bool,
}

impl Builder {
    /// Create a builder for `storage_type` with room for `capacity` values.
    ///
    /// Fails for parameterisations that have no builder: numeric widths other than 64 bits and
    /// fixed-length or bounded text.
    pub fn for_type(storage_type: StorageType, capacity: usize) -> ColumnResult<Self> {
        let kind = match storage_type {
            StorageType::AnyObject => BuilderKind::Mixed(MixedBuilder::with_capacity(capacity)),
            StorageType::Boolean => BuilderKind::Boolean(BoolBuilder::with_capacity(capacity)),
            StorageType::Date => BuilderKind::Date(DateBuilder::with_capacity(capacity)),
            StorageType::DateTime => {
                BuilderKind::DateTime(DateTimeBuilder::with_capacity(capacity))
            }
            StorageType::TimeOfDay => {
                BuilderKind::TimeOfDay(TimeOfDayBuilder::with_capacity(capacity))
            }
            StorageType::Float(bits) => match bits {
                Bits::Bits64 => BuilderKind::Numeric(NumericBuilder::double(capacity)),
                other => {
                    return Err(ColumnError::UnsupportedBits {
                        kind: "float",
                        bits: other.to_integer(),
                    })
                }
            },
            StorageType::Integer(bits) => match bits {
                Bits::Bits64 => BuilderKind::Numeric(NumericBuilder::long(capacity)),
                other => {
                    return Err(ColumnError::UnsupportedBits {
                        kind: "integer",
                        bits: other.to_integer(),
                    })
                }
            },
            StorageType::Text {
                max_length,
                fixed_length,
            } => {
                if fixed_length {
                    return Err(ColumnError::UnsupportedFixedText);
                }
                if let Some(max_length) = max_length {
                    return Err(ColumnError::UnsupportedBoundedText { max_length });
                }
                BuilderKind::Text(TextBuilder::with_capacity(capacity))
            }
        };

        let builder = Self {
            kind,
            sealed: false,
        };
        debug_assert_eq!(builder.storage_type(), storage_type);
        Ok(builder)
    }

    /// Append one value, growing the backing array when needed.
    ///
    /// A value the current builder cannot hold promotes it to [`StorageType::AnyObject`]
    /// first; the handle keeps working and earlier values are preserved in order.
    pub fn append(&mut self, value: impl Into<Value>) -> ColumnResult<()> {
        self.ensure_open()?;
        if let Err(value) = self.kind.as_dyn().try_append(value.into()) {
            self.retype_and_append(value);
        }
        Ok(())
    }

    /// Append one value into capacity reserved up front.
    ///
    /// Same semantics as [`Builder::append`]; exceeding the reserved capacity is a logic error
    /// caught by debug assertions.
    pub fn append_no_grow(&mut self, value: impl Into<Value>) -> ColumnResult<()> {
        self.ensure_open()?;
        if let Err(value) = self.kind.as_dyn().try_append_no_grow(value.into()) {
            self.retype_and_append(value);
        }
        Ok(())
    }

    /// Append `count` missing values.
    pub fn append_nulls(&mut self, count: usize) -> ColumnResult<()> {
        self.ensure_open()?;
        self.kind.as_dyn().append_nulls(count);
        Ok(())
    }

    /// Append every element of `storage`.
    ///
    /// Unlike [`Builder::append`] this never retypes: a storage of an incompatible kind fails
    /// with [`ColumnError::StorageTypeMismatch`] and leaves the builder unchanged. The mixed
    /// builder accepts any storage.
    pub fn append_bulk_storage(&mut self, storage: &Storage) -> ColumnResult<()> {
        self.ensure_open()?;
        self.kind.as_dyn().append_bulk_storage(storage)
    }

    /// Number of values appended so far.
    pub fn current_size(&self) -> usize {
        self.kind.as_dyn_ref().current_size()
    }

    pub fn capacity(&self) -> usize {
        self.kind.as_dyn_ref().capacity()
    }

    /// Current storage type; becomes [`StorageType::AnyObject`] after a promotion.
    pub fn storage_type(&self) -> StorageType {
        self.kind.as_dyn_ref().storage_type()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Turn the appended values into an immutable storage of exactly
    /// [`Builder::current_size`] elements. Can only be called once.
    pub fn seal(&mut self) -> ColumnResult<Storage> {
        self.ensure_open()?;
        self.sealed = true;
        Ok(self.kind.as_dyn().seal())
    }

    fn ensure_open(&self) -> ColumnResult<()> {
        if self.sealed {
            Err(ColumnError::AlreadySealed)
        } else {
            Ok(())
        }
    }

    fn retype_and_append(&mut self, value: Value) {
        let current = self.kind.as_dyn_ref();
        log::debug!(
            "promoting {} builder with {} values to {} after appending {value:?}",
            current.storage_type(),
            current.current_size(),
            StorageType::AnyObject,
        );

        let capacity = current.capacity().max(current.current_size() + 1);
        let mut mixed = current.to_mixed(capacity);
        mixed.push(value);
        self.kind = BuilderKind::Mixed(mixed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn factory_rejects_unsupported_parameterisations() {
        assert_eq!(
            Builder::for_type(StorageType::Integer(Bits::Bits32), 4).unwrap_err(),
            ColumnError::UnsupportedBits {
                kind: "integer",
                bits: 32
            }
        );
        assert_eq!(
            Builder::for_type(StorageType::Float(Bits::Bits16), 4).unwrap_err(),
            ColumnError::UnsupportedBits {
                kind: "float",
                bits: 16
            }
        );
        assert_eq!(
            Builder::for_type(
                StorageType::Text {
                    max_length: Some(3),
                    fixed_length: true
                },
                4
            )
            .unwrap_err(),
            ColumnError::UnsupportedFixedText
        );
        assert_eq!(
            Builder::for_type(
                StorageType::Text {
                    max_length: Some(3),
                    fixed_length: false
                },
                4
            )
            .unwrap_err(),
            ColumnError::UnsupportedBoundedText { max_length: 3 }
        );
    }

    #[test]
    fn retype_keeps_the_handle_usable() {
        let mut builder = Builder::for_type(StorageType::INTEGER_64, 2).unwrap();
        builder.append(1i64).unwrap();
        builder.append_nulls(1).unwrap();
        builder.append("x").unwrap();
        assert_eq!(builder.storage_type(), StorageType::AnyObject);
        builder.append(2.5).unwrap();

        let storage = builder.seal().unwrap();
        assert_eq!(
            storage.iter().collect::<Vec<_>>(),
            vec![
                Value::Long(1),
                Value::Null,
                Value::from("x"),
                Value::Double(2.5)
            ]
        );
    }
}
