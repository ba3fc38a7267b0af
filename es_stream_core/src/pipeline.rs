//! Batch orchestration.

use es_stream_object_store::ObjectSource;
use es_stream_observability::Diagnostics;
use es_stream_search_client::SearchClient;
use serde_json::Value;
use snafu::{OptionExt, ResultExt, ensure};

use crate::bulk::{DocumentBatchBuilder, split_lines};
use crate::error::{
    CreateIndexSnafu, EmptyObjectSnafu, FetchSnafu, NoDocumentsSnafu, Result, RoutingSnafu,
    SubmitSnafu,
};
use crate::event::{NotificationRecord, event_records};
use crate::report::{BatchReport, IndexedRecord, RecordOutcome};
use crate::router::IndexRouter;

/// Wires the object source, router, batch builder and search client together.
///
/// A pipeline holds no per-batch state and can serve overlapping invocations.
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: ObjectSource,
    router: IndexRouter,
    builder: DocumentBatchBuilder,
    client: SearchClient,
    diagnostics: Diagnostics,
}

impl Pipeline {
    pub fn new(
        source: ObjectSource,
        router: IndexRouter,
        client: SearchClient,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            source,
            router,
            builder: DocumentBatchBuilder::new(diagnostics.clone()),
            client,
            diagnostics,
        }
    }

    /// Process a raw notification event and report overall success.
    pub async fn handle_event(&self, event: &Value) -> bool {
        match self.process_event(event).await {
            Ok(report) => report.is_success(),
            Err(_) => false,
        }
    }

    /// Process a raw notification event.
    ///
    /// Fails only when the event has no `Records` list, in which case no
    /// collaborator is touched.
    pub async fn process_event(&self, event: &Value) -> Result<BatchReport> {
        let records = event_records(event).inspect_err(|err| {
            self.diagnostics.error("type_error", format!("type error: {err}"));
        })?;

        Ok(self.process_records(records).await)
    }

    /// Process records in order, stopping at the first failure.
    pub async fn process_records(&self, records: &[Value]) -> BatchReport {
        let mut outcomes = Vec::with_capacity(records.len());
        let mut remaining = records.iter();

        for (position, record) in remaining.by_ref().enumerate() {
            match self.process_record(record).await {
                Ok(indexed) => outcomes.push(RecordOutcome::Indexed(indexed)),
                Err(error) => {
                    let kind = error.kind();
                    self.diagnostics.error(
                        "batch_aborted",
                        format!(
                            "batch aborted at record {position} of {}: {kind} error, retryable: {}",
                            records.len(),
                            kind.is_retryable()
                        ),
                    );
                    outcomes.push(RecordOutcome::Failed { error });
                    break;
                }
            }
        }
        outcomes.extend(remaining.map(|_| RecordOutcome::NotAttempted));

        BatchReport::new(outcomes)
    }

    async fn process_record(&self, raw: &Value) -> Result<IndexedRecord> {
        let record = NotificationRecord::from_value(raw).inspect_err(|err| {
            self.diagnostics.error(
                "key_error",
                format!("key error: {}", snafu::Report::from_error(err)),
            );
        })?;
        let NotificationRecord { bucket, key } = record;

        let content = self
            .source
            .fetch(&bucket, &key)
            .await
            .inspect_err(|_| {
                self.diagnostics
                    .error("s3_read_error", "unable to read s3 file, cannot continue");
            })
            .context(FetchSnafu {})?;

        let lines = split_lines(&content);
        self.diagnostics
            .info("docs_to_index", format!("docs_to_index: {}", lines.len()));

        let Some(index) = self.router.route(&key) else {
            self.diagnostics.error(
                "no_index_route",
                format!(
                    "no index route for key {key}, expected {}/<YYYY-MM-DD>...",
                    self.router.producer()
                ),
            );
            return RoutingSnafu { key }.fail();
        };
        ensure!(
            !lines.is_empty(),
            EmptyObjectSnafu {
                bucket: &bucket,
                key: &key
            }
        );

        let payload = self
            .builder
            .build(&lines)
            .context(NoDocumentsSnafu { key: &key })?;

        if !self.client.index_exists(&index).await {
            self.client
                .create_index(&index)
                .await
                .inspect_err(|_| {
                    self.diagnostics.error("cannot_continue", "cannot continue");
                })
                .context(CreateIndexSnafu {
                    index: index.as_str(),
                })?;
        }

        self.client
            .bulk_index(&index, &payload)
            .await
            .inspect_err(|err| {
                self.diagnostics
                    .error("bulk_index_error", format!("bulk index error: {err}"));
            })
            .context(SubmitSnafu {
                index: index.as_str(),
            })?;

        Ok(IndexedRecord {
            bucket,
            key,
            index,
            documents: payload.documents(),
        })
    }
}
