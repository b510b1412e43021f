use crate::aggregator::Aggregator;
use crate::error::AggregateResult;
use tabula_column::{
    Builder, CancellationSignal, Safepoint, Storage, StorageType, Value, WithProblems,
};

/// Aggregate every group into one column of the aggregator's declared type.
///
/// Integer results of a float-typed aggregator are widened here. The cancellation signal is
/// polled before each group as well as by the aggregator itself.
pub fn aggregate_groups<G>(
    aggregator: &mut dyn Aggregator,
    groups: G,
    cancel: &dyn CancellationSignal,
) -> AggregateResult<WithProblems<Storage>>
where
    G: IntoIterator,
    G::Item: AsRef<[usize]>,
{
    let groups = groups.into_iter();
    let result_type = aggregator.result_type();
    let mut builder = Builder::for_type(result_type, groups.size_hint().0)?;
    let mut safepoint = Safepoint::with_interval(cancel, 1);

    for group in groups {
        safepoint.poll()?;
        let value = aggregator.aggregate(group.as_ref(), cancel)?;
        builder.append(to_declared(result_type, value))?;
    }

    let storage = builder.seal()?;
    log::debug!(
        "aggregate {}: {} groups into a {} column",
        aggregator.name(),
        storage.len(),
        storage.storage_type()
    );
    Ok(WithProblems::new(storage, aggregator.take_problems()))
}

fn to_declared(result_type: StorageType, value: Value) -> Value {
    match (result_type, value) {
        (StorageType::Float(_), Value::Long(v)) => Value::Double(v as f64),
        (_, value) => value,
    }
}
