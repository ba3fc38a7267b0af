use std::sync::Arc;

use es_stream_core::Pipeline;
use es_stream_observability::Diagnostics;
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;
use snafu::ResultExt;
use tracing::Instrument;

use crate::config::StreamConfig;
use crate::error::{LambdaSnafu, Result};

/// Serve notification events from the Lambda runtime until it shuts down.
///
/// Each invocation answers `true` when every record in the event was indexed.
pub async fn run(config: StreamConfig) -> Result<()> {
    let diagnostics = Diagnostics::tracing();
    let pipeline = config.pipeline(Arc::new(config.s3_factory()), diagnostics)?;

    tracing::info!(
        es_base_url = %config.es_base_url,
        producer = %config.index_producer,
        "starting lambda handler"
    );

    let pipeline = &pipeline;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle(pipeline, event).await
    }))
    .await
    .context(LambdaSnafu {})
}

async fn handle(
    pipeline: &Pipeline,
    event: LambdaEvent<Value>,
) -> Result<bool, lambda_runtime::Error> {
    let span = tracing::info_span!("invocation", request_id = %event.context.request_id);

    Ok(pipeline.handle_event(&event.payload).instrument(span).await)
}
