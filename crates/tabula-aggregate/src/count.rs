use crate::aggregator::Aggregator;
use std::sync::Arc;
use tabula_column::{CancellationSignal, Cancelled, Problem, Safepoint, Storage, StorageType, Value};

/// Number of rows in a group, or of non-missing values of one column.
#[derive(Debug)]
pub struct Count {
    name: String,
    non_missing_of: Option<Arc<Storage>>,
}

impl Count {
    pub fn rows(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            non_missing_of: None,
        }
    }

    pub fn non_missing(name: impl Into<String>, column: Arc<Storage>) -> Self {
        Self {
            name: name.into(),
            non_missing_of: Some(column),
        }
    }
}

impl Aggregator for Count {
    fn name(&self) -> &str {
        &self.name
    }

    fn result_type(&self) -> StorageType {
        StorageType::INTEGER_64
    }

    fn aggregate(
        &mut self,
        rows: &[usize],
        cancel: &dyn CancellationSignal,
    ) -> Result<Value, Cancelled> {
        let Some(column) = &self.non_missing_of else {
            return Ok(Value::Long(rows.len() as i64));
        };

        let mut safepoint = Safepoint::new(cancel);
        let mut count = 0i64;
        for &row in rows {
            safepoint.poll()?;
            if !column.is_missing(row) {
                count += 1;
            }
        }
        Ok(Value::Long(count))
    }

    fn take_problems(&mut self) -> Vec<Problem> {
        Vec::new()
    }
}
