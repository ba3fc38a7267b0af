use std::sync::Arc;

use es_stream_observability::{Diagnostics, ErrorKind};
use object_store::path::Path;
use snafu::{ResultExt, Snafu};

use crate::ObjectStoreFactory;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ObjectSourceError {
    #[snafu(display("Failed to open bucket {bucket}"))]
    Bucket {
        bucket: String,
        source: object_store::Error,
    },
    #[snafu(display("Invalid object key {key} in bucket {bucket}"))]
    InvalidKey {
        bucket: String,
        key: String,
        source: object_store::path::Error,
    },
    #[snafu(display("Failed to read s3://{bucket}/{key}"))]
    Read {
        bucket: String,
        key: String,
        source: object_store::Error,
    },
    #[snafu(display("Object s3://{bucket}/{key} is not valid UTF-8"))]
    Utf8 {
        bucket: String,
        key: String,
        source: std::string::FromUtf8Error,
    },
}

impl ObjectSourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Bucket { source, .. } | Self::Read { source, .. } => store_error_kind(source),
            Self::InvalidKey { .. } | Self::Utf8 { .. } => ErrorKind::Data,
        }
    }
}

fn store_error_kind(err: &object_store::Error) -> ErrorKind {
    match err {
        object_store::Error::NotFound { .. } | object_store::Error::InvalidPath { .. } => {
            ErrorKind::Data
        }
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => ErrorKind::Protocol,
        _ => ErrorKind::Connectivity,
    }
}

pub type Result<T, E = ObjectSourceError> = std::result::Result<T, E>;

/// Reads whole objects as text.
#[derive(Debug, Clone)]
pub struct ObjectSource {
    factory: Arc<dyn ObjectStoreFactory>,
    diagnostics: Diagnostics,
}

impl ObjectSource {
    pub fn new(factory: Arc<dyn ObjectStoreFactory>, diagnostics: Diagnostics) -> Self {
        Self {
            factory,
            diagnostics,
        }
    }

    /// Fetch the full content of `key` in `bucket`, decoded as UTF-8.
    ///
    /// Failures are logged with the `s3_error` code before being returned.
    pub async fn fetch(&self, bucket: &str, key: &str) -> Result<String> {
        let result = self.read(bucket, key).await;

        match &result {
            Ok(content) => {
                self.diagnostics.info(
                    "s3_object",
                    format!("read {} bytes from s3://{bucket}/{key}", content.len()),
                );
                self.diagnostics.debug("s3_content", format!("{content:?}"));
            }
            Err(err) => {
                self.diagnostics.error(
                    "s3_error",
                    format!("error_message: {}", snafu::Report::from_error(err)),
                );
            }
        }

        result
    }

    async fn read(&self, bucket: &str, key: &str) -> Result<String> {
        let store = self
            .factory
            .create_object_store(bucket)
            .await
            .context(BucketSnafu { bucket })?;

        // Keys are used verbatim; `Path::from` would re-encode them.
        let location = Path::parse(key).context(InvalidKeySnafu { bucket, key })?;

        let bytes = store
            .get(&location)
            .await
            .context(ReadSnafu { bucket, key })?
            .bytes()
            .await
            .context(ReadSnafu { bucket, key })?;

        String::from_utf8(bytes.to_vec()).context(Utf8Snafu { bucket, key })
    }
}
