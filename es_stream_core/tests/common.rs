use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use es_stream_core::{IndexRouter, Pipeline};
use es_stream_object_store::{InMemoryObjectStoreFactory, ObjectSource};
use es_stream_observability::{Diagnostics, MemorySink};
use es_stream_search_client::{HttpTransport, SearchClient};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BUCKET: &str = "test-bucket";
pub const KEY: &str = "serviceA/2020-01-01T00:00:00/log001";
pub const INDEX_PATH: &str = "/serviceA-2020.01.01";
pub const BULK_PATH: &str = "/serviceA-2020.01.01/_doc/_bulk";

pub const TWO_VALID_ONE_INVALID: &str = concat!(
    "{\"timestamp\": \"2020-01-01T00:01:01\", \"url\": \"/path/page1.html\"}\n",
    "{\"timestamp\": \"2020-01-01T00:02:01\", \"url\": \"/path/page2.html\"}\n",
    "{\"timestamp\": \"2020-01-01T00:03:01\", \"url\": \n",
);

/// A pipeline wired to a mock search service and in-memory buckets.
pub struct Harness {
    pub server: MockServer,
    pub objects: Arc<InMemoryObjectStoreFactory>,
    pub pipeline: Pipeline,
    pub sink: Arc<MemorySink>,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self::with_base_url(server, &base_url)
    }

    /// Harness whose search client targets `base_url` instead of the mock server.
    pub fn with_base_url(server: MockServer, base_url: &str) -> Self {
        let (diagnostics, sink) = Diagnostics::memory();
        let objects = Arc::new(InMemoryObjectStoreFactory::new());

        let source = ObjectSource::new(objects.clone(), diagnostics.clone());
        let transport =
            HttpTransport::new(Duration::from_secs(2), diagnostics.clone()).expect("transport");
        let base_url = Url::parse(base_url).expect("base url");
        let client = SearchClient::new(&base_url, transport, diagnostics.clone());
        let pipeline = Pipeline::new(source, IndexRouter::default(), client, diagnostics);

        Self {
            server,
            objects,
            pipeline,
            sink,
        }
    }

    pub async fn put_object(&self, bucket: &str, key: &str, content: &str) {
        self.objects
            .put(bucket, key, content)
            .await
            .expect("put object");
    }

    pub async fn mock(&self, http_method: &str, url_path: &str, status: u16, expected: u64) {
        Mock::given(method(http_method))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string("{}"))
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    /// Message of the first diagnostic logged with `code`.
    pub fn message(&self, code: &str) -> Option<String> {
        self.sink
            .diagnostics()
            .into_iter()
            .find(|diagnostic| diagnostic.code == code)
            .map(|diagnostic| diagnostic.message)
    }

    /// Methods of every request the search service received, in order.
    pub async fn received_methods(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| request.method.to_string())
            .collect()
    }
}

pub fn record(bucket: &str, key: &str) -> Value {
    json!({
        "eventSource": "aws:s3",
        "eventName": "ObjectCreated:Put",
        "s3": {
            "bucket": { "name": bucket },
            "object": { "key": key }
        }
    })
}

pub fn event(records: Vec<Value>) -> Value {
    json!({ "Records": records })
}

pub fn load_event(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
        .join(name);
    let content = std::fs::read_to_string(path).expect("read event");
    serde_json::from_str(&content).expect("parse event")
}

/// Base URL of a local port with no listener.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
