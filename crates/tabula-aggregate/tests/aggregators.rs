use pretty_assertions::assert_eq;
use std::sync::Arc;
use tabula_aggregate::{
    aggregate_groups, AggregateConfig, AggregateError, Aggregator, Count, First, Last,
    SortDirection, Sum,
};
use tabula_column::{
    CancellationToken, Cancelled, NeverCancel, ProblemKind, Storage, StorageType, Value,
};

fn column<V: Into<Value>>(storage_type: StorageType, values: Vec<V>) -> Arc<Storage> {
    Arc::new(Storage::from_values(storage_type, values).unwrap())
}

fn longs(values: Vec<Option<i64>>) -> Arc<Storage> {
    column(StorageType::INTEGER_64, values)
}

fn mixed(values: Vec<Value>) -> Arc<Storage> {
    column(StorageType::AnyObject, values)
}

#[test]
fn sum_of_a_long_column_skips_missing_values() {
    let mut sum = Sum::new("total", longs(vec![Some(1), Some(2), None, Some(3)]));
    assert_eq!(sum.result_type(), StorageType::FLOAT_64);
    assert_eq!(sum.aggregate(&[0, 1, 2, 3], &NeverCancel), Ok(Value::Long(6)));
    assert!(sum.take_problems().is_empty());
}

#[test]
fn sum_of_only_missing_values_is_missing() {
    let mut sum = Sum::new("total", longs(vec![None, None, Some(5)]));
    assert_eq!(sum.aggregate(&[0, 1], &NeverCancel), Ok(Value::Null));
    assert_eq!(sum.aggregate(&[], &NeverCancel), Ok(Value::Null));
}

#[test]
fn sum_of_a_double_column() {
    let values = column(StorageType::FLOAT_64, vec![Some(0.5), None, Some(2.0)]);
    let mut sum = Sum::new("total", values);
    assert_eq!(sum.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::Double(2.5)));
}

#[test]
fn long_overflow_continues_in_floating_point() {
    let mut sum = Sum::new("total", longs(vec![Some(i64::MAX), Some(i64::MAX)]));
    assert_eq!(
        sum.aggregate(&[0, 1], &NeverCancel),
        Ok(Value::Double(i64::MAX as f64 * 2.0))
    );
}

#[test]
fn sum_of_a_mixed_column_widens_to_double() {
    let values = mixed(vec![Value::Long(1), Value::Null, Value::Double(2.5), Value::Long(2)]);
    let mut sum = Sum::new("total", values);
    assert_eq!(sum.aggregate(&[0, 1], &NeverCancel), Ok(Value::Long(1)));
    assert_eq!(
        sum.aggregate(&[0, 1, 2, 3], &NeverCancel),
        Ok(Value::Double(5.5))
    );
}

#[test]
fn non_numeric_value_voids_the_group_with_one_problem() {
    let values = mixed(vec![
        Value::Long(1),
        Value::from("x"),
        Value::Long(4),
        Value::from("y"),
    ]);
    let mut sum = Sum::new("total", values);

    assert_eq!(sum.aggregate(&[0, 1, 2, 3], &NeverCancel), Ok(Value::Null));
    let problems = sum.take_problems();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].column, "total");
    assert_eq!(problems[0].row, Some(1));
    assert_eq!(problems[0].kind, ProblemKind::InvalidAggregation);
    assert_eq!(problems[0].message, "Cannot convert to a number.");

    // Other groups are unaffected.
    assert_eq!(sum.aggregate(&[0, 2], &NeverCancel), Ok(Value::Long(5)));
    assert!(sum.take_problems().is_empty());
}

#[test]
fn booleans_are_not_summed() {
    let values = column(StorageType::Boolean, vec![true, false]);
    let mut sum = Sum::new("total", values);
    assert_eq!(sum.aggregate(&[0, 1], &NeverCancel), Ok(Value::Null));
    assert_eq!(sum.take_problems()[0].row, Some(0));
}

#[test]
fn grouped_sum_materialises_the_declared_type() {
    let values = longs(vec![Some(1), Some(2), None, Some(3), None]);
    let mut sum = Sum::new("total", values);
    let groups: Vec<Vec<usize>> = vec![vec![0, 1, 2, 3], vec![4], vec![]];

    let result = aggregate_groups(&mut sum, &groups, &NeverCancel).unwrap();
    assert!(result.problems.is_empty());
    assert_eq!(result.value.storage_type(), StorageType::FLOAT_64);
    assert_eq!(
        result.value.iter().collect::<Vec<_>>(),
        vec![Value::Double(6.0), Value::Null, Value::Null]
    );
}

#[test]
fn grouped_sum_collects_problems() {
    let values = mixed(vec![Value::Long(1), Value::from("x"), Value::Double(0.5)]);
    let mut sum = Sum::new("total", values);
    let groups = [vec![0usize, 1], vec![0, 2], vec![1]];

    let result =
        aggregate_groups(&mut sum, groups.iter().map(Vec::as_slice), &NeverCancel).unwrap();
    assert_eq!(
        result.value.iter().collect::<Vec<_>>(),
        vec![Value::Null, Value::Double(1.5), Value::Null]
    );
    assert_eq!(
        result.problems.iter().map(|p| p.row).collect::<Vec<_>>(),
        vec![Some(1), Some(1)]
    );
}

#[test]
fn first_follows_group_order() {
    let values = column(StorageType::TEXT, vec![Some("a"), None, Some("c")]);
    let mut first = First::new("first", values.clone(), false);
    assert_eq!(first.result_type(), StorageType::TEXT);
    assert_eq!(first.aggregate(&[2, 0], &NeverCancel), Ok(Value::from("c")));
    assert_eq!(first.aggregate(&[1, 0], &NeverCancel), Ok(Value::Null));
    assert_eq!(first.aggregate(&[], &NeverCancel), Ok(Value::Null));

    let mut first = First::new("first", values, true);
    assert_eq!(first.aggregate(&[1, 0], &NeverCancel), Ok(Value::from("a")));
    assert_eq!(first.aggregate(&[1], &NeverCancel), Ok(Value::Null));
}

#[test]
fn first_by_ordering_key_ignoring_missing() {
    let values = longs(vec![None, Some(20), None]);
    let keys = longs(vec![Some(3), Some(1), Some(2)]);

    let mut first = First::ordered(
        "first",
        values,
        true,
        vec![keys],
        vec![SortDirection::Ascending],
    )
    .unwrap();
    assert_eq!(first.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::Long(20)));
}

#[test]
fn ignoring_missing_changes_the_ordered_winner() {
    let values = longs(vec![Some(10), None, Some(30)]);
    let keys = longs(vec![Some(3), Some(1), Some(2)]);

    let mut keep = First::ordered(
        "first",
        values.clone(),
        false,
        vec![keys.clone()],
        vec![SortDirection::Ascending],
    )
    .unwrap();
    assert_eq!(keep.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::Null));

    let mut skip = First::ordered(
        "first",
        values,
        true,
        vec![keys],
        vec![SortDirection::Ascending],
    )
    .unwrap();
    assert_eq!(skip.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::Long(30)));
}

#[test]
fn equal_keys_resolve_by_encounter_order() {
    let values = column(StorageType::TEXT, vec!["a", "b", "c"]);
    let keys = longs(vec![Some(5), Some(5), Some(7)]);

    let mut first = First::ordered(
        "first",
        values.clone(),
        false,
        vec![keys.clone()],
        vec![SortDirection::Ascending],
    )
    .unwrap();
    assert_eq!(first.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::from("a")));
    assert_eq!(first.aggregate(&[1, 0, 2], &NeverCancel), Ok(Value::from("b")));

    let mut last = Last::ordered(
        "last",
        values,
        false,
        vec![keys],
        vec![SortDirection::Descending],
    )
    .unwrap();
    // Descending, so the maximal key is the smallest value; rows 0 and 1 tie.
    assert_eq!(last.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::from("b")));
    assert_eq!(last.aggregate(&[1, 0, 2], &NeverCancel), Ok(Value::from("a")));
}

#[test]
fn descending_keys_pick_the_largest_value_first() {
    let values = column(StorageType::TEXT, vec!["low", "high", "mid"]);
    let keys = column(StorageType::FLOAT_64, vec![1.0, 3.0, 2.0]);
    let mut first = First::ordered(
        "first",
        values,
        false,
        vec![keys],
        vec![SortDirection::Descending],
    )
    .unwrap();
    assert_eq!(first.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::from("high")));
}

#[test]
fn last_by_row_order() {
    let values = longs(vec![Some(1), Some(2), None]);
    let mut last = Last::new("last", values.clone(), false);
    assert_eq!(last.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::Null));

    let mut last = Last::new("last", values, true);
    assert_eq!(last.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::Long(2)));
    assert_eq!(last.aggregate(&[2], &NeverCancel), Ok(Value::Null));
}

#[test]
fn ordering_configuration_is_validated() {
    let values = longs(vec![Some(1), Some(2)]);

    let err = First::ordered(
        "first",
        values.clone(),
        false,
        vec![longs(vec![Some(1), Some(2)])],
        vec![],
    )
    .unwrap_err();
    assert_eq!(
        err,
        AggregateError::OrderingLengthMismatch {
            columns: 1,
            directions: 0
        }
    );

    let err = Last::ordered(
        "last",
        values,
        false,
        vec![longs(vec![Some(1)])],
        vec![SortDirection::Ascending],
    )
    .unwrap_err();
    assert_eq!(
        err,
        AggregateError::OrderingColumnTooShort {
            index: 0,
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn count_rows_and_non_missing_values() {
    let values = longs(vec![Some(1), None, Some(3)]);

    let mut rows = Count::rows("n");
    assert_eq!(rows.result_type(), StorageType::INTEGER_64);
    assert_eq!(rows.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::Long(3)));

    let mut present = Count::non_missing("n", values);
    assert_eq!(present.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::Long(2)));

    let result = aggregate_groups(&mut present, [vec![1usize], vec![0, 2]], &NeverCancel).unwrap();
    assert_eq!(
        result.value.iter().collect::<Vec<_>>(),
        vec![Value::Long(0), Value::Long(2)]
    );
}

#[test]
fn aggregators_build_from_json_configuration() {
    let columns = vec![
        column(StorageType::TEXT, vec!["a", "b", "c"]),
        longs(vec![Some(2), Some(9), Some(4)]),
    ];

    let config: AggregateConfig = serde_json::from_str(
        r#"{
            "name": "latest",
            "kind": "first",
            "column": 0,
            "order_by": [{ "column": 1, "direction": "descending" }]
        }"#,
    )
    .unwrap();
    let mut latest = config.build(&columns).unwrap();
    assert_eq!(latest.name(), "latest");
    assert_eq!(latest.aggregate(&[0, 1, 2], &NeverCancel), Ok(Value::from("b")));

    let config: AggregateConfig =
        serde_json::from_str(r#"{"name": "total", "kind": "sum", "column": 1}"#).unwrap();
    assert!(!config.ignore_missing);
    let mut total = config.build(&columns).unwrap();
    let result = aggregate_groups(total.as_mut(), [[0usize, 1, 2]], &NeverCancel).unwrap();
    assert_eq!(result.value.get(0), Value::Double(15.0));

    let config: AggregateConfig = serde_json::from_str(
        r#"{"name": "bad", "kind": "last", "column": 0, "order_by": [{"column": 5}]}"#,
    )
    .unwrap();
    assert_eq!(
        config.build(&columns).err(),
        Some(AggregateError::UnknownColumn {
            name: "bad".to_string(),
            index: 5,
            available: 2
        })
    );
}

#[test]
fn cancellation_interrupts_aggregation() {
    let values = longs(vec![Some(1), Some(2)]);
    let token = CancellationToken::new();
    token.cancel();

    let mut sum = Sum::new("total", values.clone());
    assert_eq!(sum.aggregate(&[0, 1], &token), Err(Cancelled));

    let mut first = First::new("first", values, false);
    assert_eq!(
        aggregate_groups(&mut first, [vec![0usize], vec![1]], &token).unwrap_err(),
        AggregateError::Cancelled(Cancelled)
    );

    // Nothing to poll for an empty group list.
    let result = aggregate_groups(&mut first, Vec::<Vec<usize>>::new(), &token).unwrap();
    assert!(result.value.is_empty());
}
