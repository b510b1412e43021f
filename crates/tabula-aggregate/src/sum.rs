use crate::aggregator::Aggregator;
use std::sync::Arc;
use tabula_column::{
    CancellationSignal, Cancelled, DoubleStorage, LongStorage, Problem, ProblemAggregator,
    Safepoint, Storage, StorageType, Value,
};

const NOT_A_NUMBER: &str = "Cannot convert to a number.";

/// Running total that starts out integral and switches to `f64` when it has to.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Total {
    Empty,
    Long(i64),
    Double(f64),
}

impl Total {
    /// Adds `value`; the flag reports an `i64` overflow that forced the switch to `f64`.
    fn add_long(self, value: i64) -> (Total, bool) {
        match self {
            Total::Empty => (Total::Long(value), false),
            Total::Long(acc) => match acc.checked_add(value) {
                Some(sum) => (Total::Long(sum), false),
                None => (Total::Double(acc as f64 + value as f64), true),
            },
            Total::Double(acc) => (Total::Double(acc + value as f64), false),
        }
    }

    fn add_double(self, value: f64) -> Total {
        match self {
            Total::Empty => Total::Double(value),
            Total::Long(acc) => Total::Double(acc as f64 + value),
            Total::Double(acc) => Total::Double(acc + value),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Total::Empty => Value::Null,
            Total::Long(v) => Value::Long(v),
            Total::Double(v) => Value::Double(v),
        }
    }
}

/// Total of the non-missing values in a group; missing when the group has none.
///
/// Declared as a 64-bit float column. Integer columns are summed as `i64` and the scalar result
/// stays a [`Value::Long`] unless the total overflows. Mixed columns accept integers and floats;
/// the first other value makes the group result missing and is reported.
#[derive(Debug)]
pub struct Sum {
    name: String,
    column: Arc<Storage>,
    problems: ProblemAggregator,
}

impl Sum {
    pub fn new(name: impl Into<String>, column: Arc<Storage>) -> Self {
        let name = name.into();
        Self {
            problems: ProblemAggregator::new(name.clone()),
            name,
            column,
        }
    }

    fn sum_long(
        &self,
        storage: &LongStorage,
        rows: &[usize],
        safepoint: &mut Safepoint<'_>,
    ) -> Result<Value, Cancelled> {
        let mut total = Total::Empty;
        for &row in rows {
            safepoint.poll()?;
            if let Some(value) = storage.get(row) {
                total = self.add_long(total, value, row);
            }
        }
        Ok(total.into_value())
    }

    fn sum_double(
        storage: &DoubleStorage,
        rows: &[usize],
        safepoint: &mut Safepoint<'_>,
    ) -> Result<Value, Cancelled> {
        let mut total = Total::Empty;
        for &row in rows {
            safepoint.poll()?;
            if let Some(value) = storage.get(row) {
                total = total.add_double(value);
            }
        }
        Ok(total.into_value())
    }

    fn sum_dynamic(
        &mut self,
        rows: &[usize],
        safepoint: &mut Safepoint<'_>,
    ) -> Result<Value, Cancelled> {
        let mut total = Total::Empty;
        for &row in rows {
            safepoint.poll()?;
            total = match self.column.get(row) {
                Value::Null => continue,
                Value::Long(value) => self.add_long(total, value, row),
                Value::Double(value) => total.add_double(value),
                _ => {
                    self.problems.report_invalid_aggregation(row, NOT_A_NUMBER);
                    return Ok(Value::Null);
                }
            };
        }
        Ok(total.into_value())
    }

    fn add_long(&self, total: Total, value: i64, row: usize) -> Total {
        let (total, overflowed) = total.add_long(value);
        if overflowed {
            log::debug!(
                "sum {}: integer total overflowed at row {row}, continuing in floating point",
                self.name
            );
        }
        total
    }
}

impl Aggregator for Sum {
    fn name(&self) -> &str {
        &self.name
    }

    fn result_type(&self) -> StorageType {
        StorageType::FLOAT_64
    }

    fn aggregate(
        &mut self,
        rows: &[usize],
        cancel: &dyn CancellationSignal,
    ) -> Result<Value, Cancelled> {
        let mut safepoint = Safepoint::new(cancel);
        let column = Arc::clone(&self.column);
        match &*column {
            Storage::Long(storage) => self.sum_long(storage, rows, &mut safepoint),
            Storage::Double(storage) => Self::sum_double(storage, rows, &mut safepoint),
            _ => self.sum_dynamic(rows, &mut safepoint),
        }
    }

    fn take_problems(&mut self) -> Vec<Problem> {
        self.problems.take_problems()
    }
}
