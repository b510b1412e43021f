use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// A text value did not match any accepted format.
    InvalidFormat,
    /// A value could not take part in an aggregation.
    InvalidAggregation,
}

/// A recoverable, per-row diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub column: String,
    /// Row the problem refers to, when known.
    pub row: Option<usize>,
    pub kind: ProblemKind,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ProblemKind::InvalidFormat => "invalid format",
            ProblemKind::InvalidAggregation => "invalid aggregation",
        };
        match self.row {
            Some(row) => write!(f, "{kind} in {} at row {row}: {}", self.column, self.message),
            None => write!(f, "{kind} in {}: {}", self.column, self.message),
        }
    }
}

/// Append-only collector of the problems raised while processing one column.
///
/// Reporting never affects the producer: it records and returns.
#[derive(Clone, Debug, Default)]
pub struct ProblemAggregator {
    column: String,
    problems: Vec<Problem>,
}

impl ProblemAggregator {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            problems: Vec::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn report_invalid_format(&mut self, row: Option<usize>, text: &str) {
        self.report(row, ProblemKind::InvalidFormat, text.to_string());
    }

    pub fn report_invalid_aggregation(&mut self, row: usize, message: impl Into<String>) {
        self.report(Some(row), ProblemKind::InvalidAggregation, message.into());
    }

    fn report(&mut self, row: Option<usize>, kind: ProblemKind, message: String) {
        self.problems.push(Problem {
            column: self.column.clone(),
            row,
            kind,
            message,
        });
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Drain the recorded problems, keeping the aggregator usable for the next batch.
    pub fn take_problems(&mut self) -> Vec<Problem> {
        std::mem::take(&mut self.problems)
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}

/// A result paired with the problems raised while computing it.
#[derive(Clone, Debug, PartialEq)]
pub struct WithProblems<T> {
    pub value: T,
    pub problems: Vec<Problem>,
}

impl<T> WithProblems<T> {
    pub fn new(value: T, problems: Vec<Problem>) -> Self {
        Self { value, problems }
    }

    pub fn clean(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }
}
