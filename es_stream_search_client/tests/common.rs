use std::sync::Arc;

use es_stream_observability::{Diagnostics, MemorySink};
use es_stream_search_client::{DEFAULT_REQUEST_TIMEOUT, HttpTransport, IndexName, SearchClient};
use url::Url;

pub fn test_index() -> IndexName {
    IndexName::new("serviceA-2020.01.01").expect("valid index name")
}

pub fn search_client(base_url: &str) -> (SearchClient, Arc<MemorySink>) {
    let (diagnostics, sink) = Diagnostics::memory();
    let transport =
        HttpTransport::new(DEFAULT_REQUEST_TIMEOUT, diagnostics.clone()).expect("transport");
    let base_url = Url::parse(base_url).expect("base url");
    (SearchClient::new(&base_url, transport, diagnostics), sink)
}

/// Base URL of a local port with no listener.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
