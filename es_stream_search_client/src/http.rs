//! Thin request wrappers with a fixed timeout.
//!
//! Every failure (connection, timeout, HTTP error status, anything else) is
//! logged through [`Diagnostics`] with a `<method>_<category>` code and
//! returned as a [`TransportError`]. Callers are expected to treat all of them
//! as "the operation failed".

use std::time::Duration;

use es_stream_observability::{Diagnostics, ErrorKind};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use snafu::{ResultExt, Snafu};

/// Timeout applied to every request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A completed exchange with a non-error status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    #[snafu(display("{method} {url} returned {status}"))]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("{method} {url}: connection failed"))]
    Connection {
        method: Method,
        url: String,
        source: reqwest::Error,
    },
    #[snafu(display("{method} {url}: timed out"))]
    Timeout {
        method: Method,
        url: String,
        source: reqwest::Error,
    },
    #[snafu(display("{method} {url}: request failed"))]
    Unknown {
        method: Method,
        url: String,
        source: reqwest::Error,
    },
    #[snafu(display("Failed to build HTTP client"))]
    Client { source: reqwest::Error },
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { .. } => ErrorKind::Protocol,
            Self::Connection { .. } | Self::Timeout { .. } | Self::Unknown { .. } => {
                ErrorKind::Connectivity
            }
            Self::Client { .. } => ErrorKind::Data,
        }
    }

    /// Short category used in diagnostic codes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Status { .. } => "http_error",
            Self::Connection { .. } => "connection_error",
            Self::Timeout { .. } => "timeout_error",
            Self::Unknown { .. } | Self::Client { .. } => "unknown_error",
        }
    }
}

pub type Result<T, E = TransportError> = std::result::Result<T, E>;

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    diagnostics: Diagnostics,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration, diagnostics: Diagnostics) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context(ClientSnafu {})?;

        Ok(Self {
            client,
            diagnostics,
        })
    }

    pub async fn head(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse> {
        self.request(Method::HEAD, url, headers, None).await
    }

    pub async fn put(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse> {
        self.request(Method::PUT, url, headers, None).await
    }

    pub async fn post(&self, url: &str, headers: HeaderMap, body: String) -> Result<HttpResponse> {
        self.request(Method::POST, url, headers, Some(body)).await
    }

    /// Issue a request and return the response if the status is not an error.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        let result = self.send(method.clone(), url, headers, body).await;

        if let Err(err) = &result {
            let code = format!(
                "{}_{}",
                method.as_str().to_ascii_lowercase(),
                err.category()
            );
            self.diagnostics
                .error(code, snafu::Report::from_error(err).to_string());
        }

        result
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        let mut request = self.client.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| classify(&method, url, source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| classify(&method, url, source))?;

        if status.is_client_error() || status.is_server_error() {
            return StatusSnafu {
                method,
                url,
                status,
                body,
            }
            .fail();
        }

        Ok(HttpResponse { status, body })
    }
}

fn classify(method: &Method, url: &str, source: reqwest::Error) -> TransportError {
    let method = method.clone();
    let url = url.to_string();

    if source.is_timeout() {
        TransportError::Timeout {
            method,
            url,
            source,
        }
    } else if source.is_connect() {
        TransportError::Connection {
            method,
            url,
            source,
        }
    } else {
        TransportError::Unknown {
            method,
            url,
            source,
        }
    }
}
