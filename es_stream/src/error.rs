use std::path::PathBuf;

use es_stream_core::PipelineError;
use es_stream_search_client::TransportError;
use snafu::Snafu;

/// CLI error types.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CliError {
    #[snafu(display("Failed to build search transport"))]
    Transport { source: TransportError },
    #[snafu(display("Object store error"))]
    ObjectStore { source: object_store::Error },
    #[snafu(display("Failed to read event file {}", path.display()))]
    ReadEvent {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse event file {}", path.display()))]
    ParseEvent {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[snafu(display("Invalid event"))]
    InvalidEvent { source: PipelineError },
    #[snafu(display("Batch failed: {summary}"))]
    BatchFailed {
        summary: String,
        source: PipelineError,
    },
    #[snafu(display("Lambda runtime error"))]
    Lambda { source: lambda_runtime::Error },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
