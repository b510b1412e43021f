use crate::storage_type::StorageType;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A single boxed cell value.
///
/// `Null` is the missing value. Typed storages never hand out a value of a different kind than
/// their [`StorageType`]; the mixed storage can hold any of them.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Long(i64),
    Double(f64),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    TimeOfDay(NaiveTime),
    Text(Arc<str>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The storage type a column of only this value would have, `None` for `Null`.
    pub fn storage_type(&self) -> Option<StorageType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(StorageType::Boolean),
            Value::Long(_) => Some(StorageType::INTEGER_64),
            Value::Double(_) => Some(StorageType::FLOAT_64),
            Value::Date(_) => Some(StorageType::Date),
            Value::DateTime(_) => Some(StorageType::DateTime),
            Value::TimeOfDay(_) => Some(StorageType::TimeOfDay),
            Value::Text(_) => Some(StorageType::TEXT),
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value; longs widen to `f64`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Total order across all kinds.
    ///
    /// `Null` sorts first, then booleans, numbers (longs and doubles compare numerically, NaN
    /// last), dates, date-times, times of day and finally text.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Long(a), Value::Double(b)) => cmp_long_double(*a, *b),
            (Value::Double(a), Value::Long(b)) => cmp_long_double(*b, *a).reverse(),
            (Value::Double(a), Value::Double(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::TimeOfDay(a), Value::TimeOfDay(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Long(_) | Value::Double(_) => 2,
            Value::Date(_) => 3,
            Value::DateTime(_) => 4,
            Value::TimeOfDay(_) => 5,
            Value::Text(_) => 6,
        }
    }
}

fn cmp_long_double(a: i64, b: f64) -> Ordering {
    OrderedFloat(a as f64).cmp(&OrderedFloat(b))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Nothing"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::TimeOfDay(t) => write!(f, "{t}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::TimeOfDay(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
