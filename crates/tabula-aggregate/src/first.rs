use crate::aggregator::Aggregator;
use crate::error::{AggregateError, AggregateResult};
use crate::ordering::{OrderedMultiValueKey, SortDirection};
use std::sync::Arc;
use tabula_column::{CancellationSignal, Cancelled, Problem, Safepoint, Storage, StorageType, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum End {
    First,
    Last,
}

/// Shared state of [`First`] and [`Last`].
#[derive(Debug)]
struct Selection {
    name: String,
    column: Arc<Storage>,
    ignore_missing: bool,
    order_by: Vec<Arc<Storage>>,
    directions: Arc<[SortDirection]>,
}

impl Selection {
    fn new(
        name: String,
        column: Arc<Storage>,
        ignore_missing: bool,
        order_by: Vec<Arc<Storage>>,
        directions: Vec<SortDirection>,
    ) -> AggregateResult<Self> {
        if order_by.len() != directions.len() {
            return Err(AggregateError::OrderingLengthMismatch {
                columns: order_by.len(),
                directions: directions.len(),
            });
        }
        if let Some((index, short)) = order_by
            .iter()
            .enumerate()
            .find(|(_, ordering)| ordering.len() < column.len())
        {
            return Err(AggregateError::OrderingColumnTooShort {
                index,
                expected: column.len(),
                actual: short.len(),
            });
        }

        Ok(Self {
            name,
            column,
            ignore_missing,
            order_by,
            directions: directions.into(),
        })
    }

    fn skips(&self, row: usize) -> bool {
        self.ignore_missing && self.column.is_missing(row)
    }

    fn select(
        &self,
        end: End,
        rows: &[usize],
        cancel: &dyn CancellationSignal,
    ) -> Result<Value, Cancelled> {
        let mut safepoint = Safepoint::new(cancel);

        if self.order_by.is_empty() {
            let mut chosen = None;
            for &row in rows {
                safepoint.poll()?;
                if self.skips(row) {
                    continue;
                }
                chosen = Some(row);
                if end == End::First {
                    break;
                }
            }
            return Ok(chosen.map_or(Value::Null, |row| self.column.get(row)));
        }

        let mut best: Option<(OrderedMultiValueKey, usize)> = None;
        for &row in rows {
            safepoint.poll()?;
            if self.skips(row) {
                continue;
            }
            let key = OrderedMultiValueKey::new(&self.order_by, self.directions.clone(), row);
            // Equal keys keep the earliest row for `First` and take the latest for `Last`.
            let replace = match (&best, end) {
                (None, _) => true,
                (Some((current, _)), End::First) => key < *current,
                (Some((current, _)), End::Last) => key >= *current,
            };
            if replace {
                best = Some((key, row));
            }
        }
        Ok(best.map_or(Value::Null, |(_, row)| self.column.get(row)))
    }
}

/// The first value of a group, by row order or by the minimal ordering key.
#[derive(Debug)]
pub struct First {
    selection: Selection,
}

impl First {
    pub fn new(name: impl Into<String>, column: Arc<Storage>, ignore_missing: bool) -> Self {
        Self {
            selection: Selection {
                name: name.into(),
                column,
                ignore_missing,
                order_by: Vec::new(),
                directions: Arc::from(Vec::new()),
            },
        }
    }

    /// Picks the row with the smallest key over `order_by`; ties keep the earliest row.
    pub fn ordered(
        name: impl Into<String>,
        column: Arc<Storage>,
        ignore_missing: bool,
        order_by: Vec<Arc<Storage>>,
        directions: Vec<SortDirection>,
    ) -> AggregateResult<Self> {
        Ok(Self {
            selection: Selection::new(name.into(), column, ignore_missing, order_by, directions)?,
        })
    }
}

impl Aggregator for First {
    fn name(&self) -> &str {
        &self.selection.name
    }

    fn result_type(&self) -> StorageType {
        self.selection.column.storage_type()
    }

    fn aggregate(
        &mut self,
        rows: &[usize],
        cancel: &dyn CancellationSignal,
    ) -> Result<Value, Cancelled> {
        self.selection.select(End::First, rows, cancel)
    }

    fn take_problems(&mut self) -> Vec<Problem> {
        Vec::new()
    }
}

/// The last value of a group, by row order or by the maximal ordering key.
#[derive(Debug)]
pub struct Last {
    selection: Selection,
}

impl Last {
    pub fn new(name: impl Into<String>, column: Arc<Storage>, ignore_missing: bool) -> Self {
        Self {
            selection: First::new(name, column, ignore_missing).selection,
        }
    }

    /// Picks the row with the largest key over `order_by`; ties take the latest row.
    pub fn ordered(
        name: impl Into<String>,
        column: Arc<Storage>,
        ignore_missing: bool,
        order_by: Vec<Arc<Storage>>,
        directions: Vec<SortDirection>,
    ) -> AggregateResult<Self> {
        Ok(Self {
            selection: Selection::new(name.into(), column, ignore_missing, order_by, directions)?,
        })
    }
}

impl Aggregator for Last {
    fn name(&self) -> &str {
        &self.selection.name
    }

    fn result_type(&self) -> StorageType {
        self.selection.column.storage_type()
    }

    fn aggregate(
        &mut self,
        rows: &[usize],
        cancel: &dyn CancellationSignal,
    ) -> Result<Value, Cancelled> {
        self.selection.select(End::Last, rows, cancel)
    }

    fn take_problems(&mut self) -> Vec<Problem> {
        Vec::new()
    }
}
