mod common;

use common::{client_with, ScriptedTransport};
use n2c_client::{
    ClientError, ContentClient, ListingRequest, Method, Operation, QueryRequest,
    RemoteRequestError, TransportError,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const AUTH: &str = "secret_0a1b2c3d";

fn init_logging() {
    n2c_logging::initialize_for_tests();
}

fn expected_headers() -> Vec<(String, String)> {
    vec![
        ("Authorization".to_string(), format!("Bearer {AUTH}")),
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Notion-Version".to_string(), "2022-02-22".to_string()),
    ]
}

fn query_result() -> serde_json::Value {
    json!({
        "object": "list",
        "results": [{
            "object": "page",
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "archived": false,
            "properties": {}
        }],
        "next_cursor": null,
        "has_more": false,
        "type": "page_or_database",
        "page_or_database": {}
    })
}

#[tokio::test]
async fn query_collection_posts_payload_and_resolves_with_body() {
    init_logging();
    let transport = ScriptedTransport::new();
    transport.respond(200, &query_result().to_string());
    let client = client_with(transport.clone(), AUTH);

    let result = client
        .query_collection(QueryRequest::new("dummy"))
        .await
        .expect("query ok");
    assert_eq!(result, query_result());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://api.notion.com/v1/databases/dummy/query");
    assert_eq!(request.headers, expected_headers());
    assert_eq!(request.body.as_deref(), Some("{}"));
    assert!(request.mute_http_exceptions);
}

#[tokio::test]
async fn query_collection_body_keeps_filter_and_drops_database_id() {
    let transport = ScriptedTransport::new();
    transport.respond(200, "{}");
    let client = client_with(transport.clone(), AUTH);

    let request: QueryRequest = serde_json::from_value(json!({
        "database_id": "d9824bdc-8445-4327-be8b-5b47500af6ce",
        "filter": { "property": "In stock", "checkbox": { "equals": true } },
        "sorts": [{ "property": "Name", "direction": "ascending" }]
    }))
    .unwrap();
    client.query_collection(request).await.unwrap();

    let requests = transport.requests();
    assert_eq!(
        requests[0].url,
        "https://api.notion.com/v1/databases/d9824bdc-8445-4327-be8b-5b47500af6ce/query"
    );
    let body = requests[0].body.as_deref().unwrap();
    assert!(!body.contains("database_id"));
    assert_eq!(
        body,
        r#"{"filter":{"property":"In stock","checkbox":{"equals":true}},"sorts":[{"property":"Name","direction":"ascending"}]}"#
    );
}

#[tokio::test]
async fn query_collection_rejects_on_server_error() {
    let transport = ScriptedTransport::new();
    transport.respond(500, "Internal Server Error");
    let client = client_with(transport.clone(), AUTH);

    let err = client
        .query_collection(QueryRequest::new("dummy"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "queryDatabases 500, text: Internal Server Error");
    match err {
        ClientError::RemoteRequest(remote) => assert_eq!(
            remote,
            RemoteRequestError {
                operation: Operation::QueryCollection,
                status: 500,
                body: "Internal Server Error".to_string(),
            }
        ),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn list_children_gets_without_body() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"object":"list","results":[]}"#);
    let client = client_with(transport.clone(), AUTH);

    let result = client
        .list_container_children(ListingRequest::new("dummy"))
        .await
        .unwrap();
    assert_eq!(result, json!({ "object": "list", "results": [] }));

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "https://api.notion.com/v1/blocks/dummy/children");
    assert_eq!(request.headers, expected_headers());
    assert_eq!(request.body, None);
    assert!(request.mute_http_exceptions);
}

#[tokio::test]
async fn list_children_rejects_on_client_error() {
    let transport = ScriptedTransport::new();
    transport.respond(404, r#"{"object":"error","status":404}"#);
    let client = client_with(transport, AUTH);

    let err = client
        .list_container_children(ListingRequest::new("dummy"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"listContainerChildren 404, text: {"object":"error","status":404}"#
    );
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn list_children_forwards_valid_cursor_and_page_size() {
    let transport = ScriptedTransport::new();
    transport.respond(200, "{}").respond(200, "{}").respond(200, "{}");
    let client = client_with(transport.clone(), AUTH);

    client
        .list_container_children(ListingRequest::new("dummy").with_cursor("abc-123"))
        .await
        .unwrap();
    client
        .list_container_children(ListingRequest::new("dummy").with_page_size(123))
        .await
        .unwrap();
    client
        .list_container_children(
            ListingRequest::new("dummy")
                .with_cursor("Not-A-Cursor")
                .with_page_size(-4),
        )
        .await
        .unwrap();

    let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.notion.com/v1/blocks/dummy/children?start_cursor=abc-123".to_string(),
            "https://api.notion.com/v1/blocks/dummy/children?page_size=123".to_string(),
            "https://api.notion.com/v1/blocks/dummy/children".to_string(),
        ]
    );
}

#[test]
fn listing_request_tolerates_non_numeric_page_size() {
    let request: ListingRequest = serde_json::from_value(json!({
        "block_id": "dummy",
        "start_cursor": "abc",
        "page_size": "ten"
    }))
    .unwrap();
    assert_eq!(request, ListingRequest::new("dummy").with_cursor("abc"));
}

#[test]
fn redirect_and_informational_statuses_resolve() {
    let transport = ScriptedTransport::new();
    transport.respond(302, r#"{"moved":true}"#).respond(101, "[]");
    let client = client_with(transport, AUTH);

    let moved = client
        .query_collection(QueryRequest::new("dummy"))
        .into_inner()
        .unwrap();
    assert_eq!(moved, json!({ "moved": true }));
    let switching = client
        .list_container_children(ListingRequest::new("dummy"))
        .into_inner()
        .unwrap();
    assert_eq!(switching, json!([]));
}

#[test]
fn body_is_forwarded_without_schema_checks() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#""{\"results\": []}""#);
    let client = client_with(transport, AUTH);

    let value = client
        .query_collection(QueryRequest::new("dummy"))
        .into_inner()
        .unwrap();
    assert_eq!(value, json!("{\"results\": []}"));
}

#[test]
fn malformed_json_is_reported_with_operation() {
    let transport = ScriptedTransport::new();
    transport.respond(200, "<html>not json</html>");
    let client = client_with(transport, AUTH);

    let err = client
        .list_container_children(ListingRequest::new("dummy"))
        .into_inner()
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::InvalidJson {
            operation: Operation::ListContainerChildren,
            ..
        }
    ));
}

#[test]
fn transport_failures_propagate_once_without_retry() {
    let transport = ScriptedTransport::new();
    transport.fail(TransportError::Timeout("deadline exceeded".into()));
    let client = client_with(transport.clone(), AUTH);

    let err = client
        .query_collection(QueryRequest::new("dummy"))
        .into_inner()
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(TransportError::Timeout(_))));
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn debug_output_never_contains_the_token() {
    let transport = ScriptedTransport::new();
    transport.respond(200, "{}");
    let client = client_with(transport.clone(), AUTH);
    client
        .query_collection(QueryRequest::new("dummy"))
        .into_inner()
        .unwrap();

    assert!(!format!("{client:?}").contains(AUTH));
    assert!(!format!("{:?}", transport.requests()[0]).contains(AUTH));
}
