use es_stream_object_store::ObjectSourceError;
use es_stream_observability::ErrorKind;
use es_stream_search_client::SearchError;
use snafu::Snafu;

/// Pipeline error types.
///
/// Any of these aborts the current batch.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    #[snafu(display("Event has no Records list"))]
    MissingRecords,
    #[snafu(display("Invalid notification record"))]
    InvalidRecord { source: serde_json::Error },
    #[snafu(display("Failed to decode object key {key}"))]
    KeyDecode {
        key: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to fetch object"))]
    Fetch { source: ObjectSourceError },
    #[snafu(display("Object s3://{bucket}/{key} is empty"))]
    EmptyObject { bucket: String, key: String },
    #[snafu(display("No index route for key {key}"))]
    Routing { key: String },
    #[snafu(display("No valid JSON record to index in {key}"))]
    NoDocuments { key: String },
    #[snafu(display("Failed to create index {index}"))]
    CreateIndex { index: String, source: SearchError },
    #[snafu(display("Failed to submit documents to index {index}"))]
    Submit { index: String, source: SearchError },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRecords
            | Self::InvalidRecord { .. }
            | Self::KeyDecode { .. }
            | Self::EmptyObject { .. }
            | Self::NoDocuments { .. } => ErrorKind::Data,
            Self::Routing { .. } => ErrorKind::Routing,
            Self::Fetch { source } => source.kind(),
            Self::CreateIndex { source, .. } | Self::Submit { source, .. } => source.kind(),
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
