use crate::aggregator::Aggregator;
use crate::count::Count;
use crate::error::{AggregateError, AggregateResult};
use crate::first::{First, Last};
use crate::ordering::SortDirection;
use crate::sum::Sum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabula_column::Storage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    Sum,
    First,
    Last,
    Count,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: usize,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Serializable description of one aggregate column.
///
/// Column references are indices into the slice of storages passed to
/// [`AggregateConfig::build`]. `ignore_missing` and `order_by` apply to `first` and `last`;
/// `count` with `ignore_missing` counts the non-missing values of `column`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateConfig {
    pub name: String,
    pub kind: AggregateKind,
    pub column: usize,
    #[serde(default)]
    pub ignore_missing: bool,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
}

impl AggregateConfig {
    pub fn build(&self, columns: &[Arc<Storage>]) -> AggregateResult<Box<dyn Aggregator>> {
        let column = self.resolve(columns, self.column)?;

        let aggregator: Box<dyn Aggregator> = match self.kind {
            AggregateKind::Sum => Box::new(Sum::new(&self.name, column)),
            AggregateKind::Count if self.ignore_missing => {
                Box::new(Count::non_missing(&self.name, column))
            }
            AggregateKind::Count => Box::new(Count::rows(&self.name)),
            AggregateKind::First | AggregateKind::Last => {
                let (order_by, directions) = self.ordering(columns)?;
                if self.kind == AggregateKind::First {
                    Box::new(First::ordered(
                        &self.name,
                        column,
                        self.ignore_missing,
                        order_by,
                        directions,
                    )?)
                } else {
                    Box::new(Last::ordered(
                        &self.name,
                        column,
                        self.ignore_missing,
                        order_by,
                        directions,
                    )?)
                }
            }
        };
        Ok(aggregator)
    }

    fn resolve(&self, columns: &[Arc<Storage>], index: usize) -> AggregateResult<Arc<Storage>> {
        columns
            .get(index)
            .cloned()
            .ok_or_else(|| AggregateError::UnknownColumn {
                name: self.name.clone(),
                index,
                available: columns.len(),
            })
    }

    fn ordering(
        &self,
        columns: &[Arc<Storage>],
    ) -> AggregateResult<(Vec<Arc<Storage>>, Vec<SortDirection>)> {
        let mut order_by = Vec::with_capacity(self.order_by.len());
        let mut directions = Vec::with_capacity(self.order_by.len());
        for key in &self.order_by {
            order_by.push(self.resolve(columns, key.column)?);
            directions.push(key.direction);
        }
        Ok((order_by, directions))
    }
}
