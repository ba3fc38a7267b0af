//! HTTP client for the search-indexing service.
//!
//! [`http::HttpTransport`] issues raw requests with a fixed timeout and
//! classifies failures. [`SearchClient`] builds the index lifecycle and bulk
//! submission calls on top of it.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::SearchClient;
pub use error::{Result, SearchError};
pub use http::{DEFAULT_REQUEST_TIMEOUT, HttpResponse, HttpTransport, TransportError};
pub use types::{BULK_ACTION_HEADER, BulkPayload, IndexName, InvalidIndexName};
