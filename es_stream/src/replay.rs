use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use es_stream_object_store::{LocalFileSystemFactory, ObjectStoreFactory};
use es_stream_observability::Diagnostics;
use serde_json::Value;
use snafu::ResultExt;

use crate::config::StreamConfig;
use crate::error::{
    BatchFailedSnafu, InvalidEventSnafu, ObjectStoreSnafu, ParseEventSnafu, ReadEventSnafu,
    Result,
};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Notification event to process, as delivered to the Lambda handler.
    event: PathBuf,
    /// Read objects from `<LOCAL_ROOT>/<bucket>/<key>` instead of S3.
    #[arg(long)]
    local_root: Option<PathBuf>,
}

impl ReplayArgs {
    /// Run one event through the pipeline and print the batch report.
    pub async fn run(self, config: StreamConfig) -> Result<()> {
        let content = tokio::fs::read_to_string(&self.event)
            .await
            .context(ReadEventSnafu { path: &self.event })?;
        let event: Value =
            serde_json::from_str(&content).context(ParseEventSnafu { path: &self.event })?;

        let factory: Arc<dyn ObjectStoreFactory> = match &self.local_root {
            Some(root) => {
                Arc::new(LocalFileSystemFactory::new(root).context(ObjectStoreSnafu {})?)
            }
            None => Arc::new(config.s3_factory()),
        };
        let pipeline = config.pipeline(factory, Diagnostics::tracing())?;

        let report = pipeline
            .process_event(&event)
            .await
            .context(InvalidEventSnafu {})?;

        println!("{report}");

        if report.is_success() {
            return Ok(());
        }

        let summary = report.to_string();
        match report.into_first_error() {
            Some(error) => Err(error).context(BatchFailedSnafu { summary }),
            None => Ok(()),
        }
    }
}
