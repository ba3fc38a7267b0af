use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use es_stream_core::{DEFAULT_PRODUCER, IndexRouter, Pipeline};
use es_stream_object_store::{ObjectSource, ObjectStoreFactory, S3ObjectStoreFactory};
use es_stream_observability::Diagnostics;
use es_stream_search_client::{HttpTransport, SearchClient};
use snafu::ResultExt;
use url::Url;

use crate::error::{Result, TransportSnafu};

/// Settings shared by every command.
///
/// Each one can be given as a flag or through its environment variable, which
/// is how the Lambda deployment configures it.
#[derive(Debug, Clone, Args)]
pub struct StreamConfig {
    /// Base URL of the search service.
    #[arg(long, env = "ES_BASE_URL", value_parser = parse_base_url)]
    pub es_base_url: Url,
    /// Region of the notification bucket. Defaults to the SDK lookup chain.
    #[arg(long, env = "AWS_REGION")]
    pub aws_region: Option<String>,
    /// S3-compatible endpoint to read objects from instead of AWS.
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,
    /// Read objects with unsigned requests (public buckets, local S3-compatible stores).
    #[arg(long, env = "S3_SKIP_SIGNATURE")]
    pub s3_skip_signature: bool,
    /// Producer prefix recognized when routing object keys to indices.
    #[arg(long, env = "INDEX_PRODUCER", default_value = DEFAULT_PRODUCER)]
    pub index_producer: String,
    /// Timeout of each request to the search service, in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,
}

impl StreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn s3_factory(&self) -> S3ObjectStoreFactory {
        let factory = S3ObjectStoreFactory::new(self.aws_region.clone())
            .with_skip_signature(self.s3_skip_signature);
        match &self.s3_endpoint {
            Some(endpoint) => factory.with_endpoint(endpoint),
            None => factory,
        }
    }

    /// Build a pipeline reading objects through `factory`.
    pub fn pipeline(
        &self,
        factory: Arc<dyn ObjectStoreFactory>,
        diagnostics: Diagnostics,
    ) -> Result<Pipeline> {
        let transport = HttpTransport::new(self.request_timeout(), diagnostics.clone())
            .context(TransportSnafu {})?;
        let client = SearchClient::new(&self.es_base_url, transport, diagnostics.clone());
        let source = ObjectSource::new(factory, diagnostics.clone());
        let router = IndexRouter::new(&self.index_producer);

        Ok(Pipeline::new(source, router, client, diagnostics))
    }
}

fn parse_base_url(value: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(value).map_err(|err| err.to_string())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!("unsupported scheme {scheme}, expected http or https")),
    }
}
