use common::{search_client, test_index, unreachable_base_url};
use es_stream_observability::ErrorKind;
use es_stream_search_client::{BulkPayload, SearchError};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

const INDEX_PATH: &str = "/serviceA-2020.01.01";
const BULK_PATH: &str = "/serviceA-2020.01.01/_doc/_bulk";

async fn mock_status(server: &MockServer, http_method: &str, url_path: &str, status: u16) {
    Mock::given(method(http_method))
        .and(path(url_path))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(status).set_body_string("response body"))
        .expect(1)
        .mount(server)
        .await;
}

fn test_payload() -> BulkPayload {
    let documents = vec![json!({"id": 1}), json!({"id": 2})];
    BulkPayload::from_documents(&documents).expect("payload")
}

#[tokio::test]
async fn test_index_exists_true() {
    let server = MockServer::start().await;
    mock_status(&server, "HEAD", INDEX_PATH, 200).await;

    let (client, sink) = search_client(&server.uri());
    assert!(client.index_exists(&test_index()).await);
    assert!(sink.diagnostics().is_empty());
}

#[tokio::test]
async fn test_index_exists_false_on_missing_index() {
    let server = MockServer::start().await;
    mock_status(&server, "HEAD", INDEX_PATH, 404).await;

    let (client, sink) = search_client(&server.uri());
    assert!(!client.index_exists(&test_index()).await);
    assert!(sink.contains("index_read_error"));
    assert!(!sink.contains("could_not_connect"));
}

#[tokio::test]
async fn test_index_exists_false_on_non_200_success() {
    let server = MockServer::start().await;
    mock_status(&server, "HEAD", INDEX_PATH, 204).await;

    let (client, sink) = search_client(&server.uri());
    assert!(!client.index_exists(&test_index()).await);
    assert!(sink.contains("index_read_error"));
}

#[tokio::test]
async fn test_index_exists_false_when_unreachable() {
    let (client, sink) = search_client(&unreachable_base_url());
    assert!(!client.index_exists(&test_index()).await);
    assert_eq!(sink.codes(), vec!["head_connection_error", "could_not_connect"]);
}

#[tokio::test]
async fn test_create_index_success() {
    let server = MockServer::start().await;
    mock_status(&server, "PUT", INDEX_PATH, 200).await;

    let (client, sink) = search_client(&server.uri());
    client.create_index(&test_index()).await.unwrap();
    assert!(sink.contains("index_created"));
}

#[tokio::test]
async fn test_create_index_fails_on_error_status() {
    let server = MockServer::start().await;
    mock_status(&server, "PUT", INDEX_PATH, 404).await;

    let (client, sink) = search_client(&server.uri());
    let err = client.create_index(&test_index()).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(sink.contains("index_create_error"));
}

#[tokio::test]
async fn test_create_index_fails_when_unreachable() {
    let (client, sink) = search_client(&unreachable_base_url());
    let err = client.create_index(&test_index()).await.unwrap_err();

    assert!(matches!(err, SearchError::Unreachable { .. }));
    assert_eq!(err.kind(), ErrorKind::Connectivity);
    assert!(sink.contains("could_not_connect"));
}

#[tokio::test]
async fn test_bulk_index_success_returns_body() {
    let server = MockServer::start().await;
    let payload = test_payload();
    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .and(header("content-type", "application/json"))
        .and(body_string(payload.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("updated"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, sink) = search_client(&server.uri());
    let body = client.bulk_index(&test_index(), &payload).await.unwrap();

    assert_eq!(body, "updated");
    let logged = sink.diagnostics();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].code, "bulk_response");
    assert_eq!(logged[0].message, "updated");
}

#[tokio::test]
async fn test_bulk_index_fails_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("error indexing document"))
        .mount(&server)
        .await;

    let (client, sink) = search_client(&server.uri());
    let err = client
        .bulk_index(&test_index(), &test_payload())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    let logged = sink
        .diagnostics()
        .into_iter()
        .find(|d| d.code == "docs_not_indexed")
        .expect("docs_not_indexed diagnostic");
    assert_eq!(logged.message, "docs not indexed error indexing document");
}

#[tokio::test]
async fn test_bulk_index_fails_on_non_200_success() {
    let server = MockServer::start().await;
    mock_status(&server, "POST", BULK_PATH, 201).await;

    let (client, _sink) = search_client(&server.uri());
    let err = client
        .bulk_index(&test_index(), &test_payload())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::CREATED));
}

#[tokio::test]
async fn test_bulk_index_fails_when_unreachable() {
    let (client, sink) = search_client(&unreachable_base_url());
    let err = client
        .bulk_index(&test_index(), &test_payload())
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Unreachable { .. }));
    assert!(sink.contains("post_connection_error"));
}

#[tokio::test]
async fn test_base_url_trailing_slash() {
    let (client, _sink) = search_client("http://search.local:9200/");
    assert_eq!(
        client.index_url(&test_index()),
        "http://search.local:9200/serviceA-2020.01.01"
    );
    assert_eq!(
        client.bulk_url(&test_index()),
        "http://search.local:9200/serviceA-2020.01.01/_doc/_bulk"
    );
}
