//! Per-record outcomes of a processed batch.

use std::fmt;

use es_stream_search_client::IndexName;

use crate::error::PipelineError;

/// A record whose documents were accepted by the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRecord {
    pub bucket: String,
    pub key: String,
    pub index: IndexName,
    /// Number of documents submitted.
    pub documents: usize,
}

#[derive(Debug)]
pub enum RecordOutcome {
    Indexed(IndexedRecord),
    Failed { error: PipelineError },
    /// Skipped because an earlier record in the batch failed.
    NotAttempted,
}

impl RecordOutcome {
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed(_))
    }
}

/// Outcomes of one batch, in record order.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<RecordOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[RecordOutcome] {
        &self.outcomes
    }

    /// True when every record was indexed. An empty batch is a success.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(RecordOutcome::is_indexed)
    }

    /// The error that aborted the batch, if any.
    pub fn first_error(&self) -> Option<&PipelineError> {
        self.outcomes.iter().find_map(|outcome| match outcome {
            RecordOutcome::Failed { error } => Some(error),
            _ => None,
        })
    }

    /// Take the error that aborted the batch, if any.
    pub fn into_first_error(self) -> Option<PipelineError> {
        self.outcomes.into_iter().find_map(|outcome| match outcome {
            RecordOutcome::Failed { error } => Some(error),
            _ => None,
        })
    }

    /// Total number of documents submitted across the batch.
    pub fn indexed_documents(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                RecordOutcome::Indexed(record) => record.documents,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, predicate: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|outcome| predicate(outcome)).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} indexed ({} documents), {} failed, {} not attempted",
            self.outcomes.len(),
            self.count(RecordOutcome::is_indexed),
            self.indexed_documents(),
            self.count(|outcome| matches!(outcome, RecordOutcome::Failed { .. })),
            self.count(|outcome| matches!(outcome, RecordOutcome::NotAttempted)),
        )
    }
}
