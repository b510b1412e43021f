use tabula_column::{CancellationSignal, Cancelled, Problem, StorageType, Value};

/// A per-group reduction over one or more columns.
///
/// Groups are given as row indices into the aggregator's columns. Per-row data errors never
/// fail the call: the group result becomes [`Value::Null`] and a problem is recorded, to be
/// drained with [`Aggregator::take_problems`].
pub trait Aggregator: Send {
    fn name(&self) -> &str;

    /// Declared type of the aggregated column.
    ///
    /// Individual [`Aggregator::aggregate`] results may be of a narrower kind; column-level
    /// drivers convert them to this type.
    fn result_type(&self) -> StorageType;

    fn aggregate(
        &mut self,
        rows: &[usize],
        cancel: &dyn CancellationSignal,
    ) -> Result<Value, Cancelled>;

    fn take_problems(&mut self) -> Vec<Problem>;
}
