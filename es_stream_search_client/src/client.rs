//! Index lifecycle and bulk submission.

use es_stream_observability::Diagnostics;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::error::{Result, SearchError};
use crate::http::{HttpResponse, HttpTransport, TransportError};
use crate::types::{BulkPayload, IndexName};

/// Client for a single search service, addressed by its base URL.
#[derive(Debug, Clone)]
pub struct SearchClient {
    transport: HttpTransport,
    base_url: String,
    diagnostics: Diagnostics,
}

impl SearchClient {
    pub fn new(base_url: &Url, transport: HttpTransport, diagnostics: Diagnostics) -> Self {
        Self {
            transport,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            diagnostics,
        }
    }

    /// `{base}/{index}`
    pub fn index_url(&self, index: &IndexName) -> String {
        format!("{}/{}", self.base_url, index)
    }

    /// `{base}/{index}/_doc/_bulk`
    pub fn bulk_url(&self, index: &IndexName) -> String {
        format!("{}/{}/_doc/_bulk", self.base_url, index)
    }

    /// Whether the index exists.
    ///
    /// Any failure, including an unreachable service, is reported as `false`.
    pub async fn index_exists(&self, index: &IndexName) -> bool {
        let result = self
            .transport
            .head(&self.index_url(index), json_headers())
            .await;

        match self.expect_ok("index_exists", index, result) {
            Ok(_) => true,
            Err(SearchError::Unreachable { .. }) => {
                self.diagnostics
                    .error("could_not_connect", "could not connect, cannot continue");
                false
            }
            Err(err) => {
                self.diagnostics
                    .error("index_read_error", format!("error reading index: {err}"));
                false
            }
        }
    }

    pub async fn create_index(&self, index: &IndexName) -> Result<()> {
        let result = self
            .transport
            .put(&self.index_url(index), json_headers())
            .await;

        match self.expect_ok("create_index", index, result) {
            Ok(_) => {
                self.diagnostics
                    .info("index_created", format!("created index {index}"));
                Ok(())
            }
            Err(err) => {
                match &err {
                    SearchError::Unreachable { .. } => self
                        .diagnostics
                        .error("could_not_connect", "could not connect, cannot continue"),
                    SearchError::UnexpectedStatus { .. } => self
                        .diagnostics
                        .error("index_create_error", format!("error creating index: {err}")),
                }
                Err(err)
            }
        }
    }

    /// Submit `payload` to the bulk endpoint of `index`.
    ///
    /// Returns the service's response body.
    pub async fn bulk_index(&self, index: &IndexName, payload: &BulkPayload) -> Result<String> {
        let result = self
            .transport
            .post(
                &self.bulk_url(index),
                json_headers(),
                payload.as_str().to_string(),
            )
            .await;

        match self.expect_ok("bulk_index", index, result) {
            Ok(response) => {
                self.diagnostics.info("bulk_response", response.body.clone());
                Ok(response.body)
            }
            Err(err) => {
                match &err {
                    SearchError::Unreachable { .. } => self
                        .diagnostics
                        .error("could_not_connect", "could not connect, cannot continue"),
                    SearchError::UnexpectedStatus { body, .. } => self
                        .diagnostics
                        .error("docs_not_indexed", format!("docs not indexed {body}")),
                }
                Err(err)
            }
        }
    }

    /// Only `200 OK` counts as success.
    fn expect_ok(
        &self,
        operation: &'static str,
        index: &IndexName,
        result: std::result::Result<HttpResponse, TransportError>,
    ) -> Result<HttpResponse> {
        let index = index.to_string();

        match result {
            Ok(response) if response.status == StatusCode::OK => Ok(response),
            Ok(HttpResponse { status, body }) => Err(SearchError::UnexpectedStatus {
                operation,
                index,
                status,
                body,
            }),
            Err(TransportError::Status { status, body, .. }) => {
                Err(SearchError::UnexpectedStatus {
                    operation,
                    index,
                    status,
                    body,
                })
            }
            Err(source) => Err(SearchError::Unreachable {
                operation,
                index,
                source,
            }),
        }
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
