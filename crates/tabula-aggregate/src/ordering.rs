use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tabula_column::{Storage, Value};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// The values of several ordering columns at one row, compared lexicographically.
///
/// Each column compares with [`Value::total_cmp`] (missing first), reversed for descending
/// columns. Keys are only comparable with keys built from the same columns and directions.
#[derive(Clone, Debug)]
pub struct OrderedMultiValueKey {
    values: Vec<Value>,
    directions: Arc<[SortDirection]>,
}

impl OrderedMultiValueKey {
    pub fn new(columns: &[Arc<Storage>], directions: Arc<[SortDirection]>, row: usize) -> Self {
        debug_assert_eq!(columns.len(), directions.len());
        Self {
            values: columns.iter().map(|column| column.get(row)).collect(),
            directions,
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Ord for OrderedMultiValueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.values
            .iter()
            .zip(&other.values)
            .zip(self.directions.iter())
            .map(|((a, b), direction)| match direction {
                SortDirection::Ascending => a.total_cmp(b),
                SortDirection::Descending => a.total_cmp(b).reverse(),
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for OrderedMultiValueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderedMultiValueKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for OrderedMultiValueKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_column::StorageType;

    fn column(storage_type: StorageType, values: Vec<Value>) -> Arc<Storage> {
        Arc::new(Storage::from_values(storage_type, values).unwrap())
    }

    #[test]
    fn later_columns_break_ties() {
        let columns = [
            column(
                StorageType::INTEGER_64,
                vec![Value::Long(1), Value::Long(1), Value::Long(0)],
            ),
            column(
                StorageType::TEXT,
                vec![Value::from("b"), Value::from("a"), Value::from("z")],
            ),
        ];
        let directions: Arc<[SortDirection]> =
            Arc::from(vec![SortDirection::Descending, SortDirection::Ascending]);
        let key = |row| OrderedMultiValueKey::new(&columns, directions.clone(), row);

        // Descending on the first column puts row 2 last.
        assert!(key(0) < key(2));
        assert!(key(1) < key(0));
        assert_eq!(key(1), key(1));
    }

    #[test]
    fn missing_values_sort_first() {
        let columns = [column(
            StorageType::FLOAT_64,
            vec![Value::Null, Value::Double(f64::NEG_INFINITY)],
        )];
        let directions: Arc<[SortDirection]> = Arc::from(vec![SortDirection::Ascending]);
        let missing = OrderedMultiValueKey::new(&columns, directions.clone(), 0);
        let low = OrderedMultiValueKey::new(&columns, directions, 1);
        assert!(missing < low);
        assert_eq!(missing.values(), &[Value::Null]);
    }
}
