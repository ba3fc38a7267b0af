use es_stream_observability::ErrorKind;
use reqwest::StatusCode;
use snafu::Snafu;

use crate::http::TransportError;

/// Search service error types.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SearchError {
    #[snafu(display("Failed {operation} on index {index}: could not connect"))]
    Unreachable {
        operation: &'static str,
        index: String,
        source: TransportError,
    },
    #[snafu(display("Failed {operation} on index {index}: status={status}, body={body}"))]
    UnexpectedStatus {
        operation: &'static str,
        index: String,
        status: StatusCode,
        body: String,
    },
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unreachable { source, .. } => source.kind(),
            Self::UnexpectedStatus { .. } => ErrorKind::Protocol,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unreachable { .. } => None,
            Self::UnexpectedStatus { status, .. } => Some(*status),
        }
    }
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
