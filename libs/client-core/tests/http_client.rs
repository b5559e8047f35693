use std::sync::Arc;

use client_core::{ClientError, CredentialCell, HttpClient, SessionEvents};
use httpmock::prelude::*;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Widget {
    id: i64,
    name: String,
}

fn client_for(server: &MockServer) -> (HttpClient, Arc<CredentialCell>, Arc<SessionEvents>) {
    let credentials = Arc::new(CredentialCell::new());
    let events = Arc::new(SessionEvents::new());
    let client = HttpClient::new(server.base_url(), credentials.clone(), events.clone());
    (client, credentials, events)
}

#[tokio::test]
async fn get_decodes_json_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/widgets/7");
        then.status(200)
            .json_body(serde_json::json!({ "id": 7, "name": "spoke" }));
    });

    let (client, _, _) = client_for(&server);
    let widget: Widget = client.get("/widgets/7").await.unwrap();

    assert_eq!(
        widget,
        Widget {
            id: 7,
            name: "spoke".to_string()
        }
    );
    mock.assert();
}

#[tokio::test]
async fn attaches_authorization_header_when_credentials_present() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/widgets/1")
            .header("authorization", "Basic bWFydDptYXJ0MTIz");
        then.status(200)
            .json_body(serde_json::json!({ "id": 1, "name": "rim" }));
    });

    let (client, credentials, _) = client_for(&server);
    credentials.set("Basic bWFydDptYXJ0MTIz");
    let _: Widget = client.get("/widgets/1").await.unwrap();

    mock.assert();
}

#[tokio::test]
async fn delete_yields_no_payload_on_204() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/widgets/3");
        then.status(204);
    });

    let (client, _, _) = client_for(&server);
    client.delete("/widgets/3").await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn error_status_and_flat_validation_map_surface_verbatim() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/widgets");
        then.status(400).json_body(serde_json::json!({
            "error": "Bad Request",
            "message": "Validation failed",
            "errors": { "name": "Name is required", "quantity": "Quantity must be at least 1" }
        }));
    });

    let (client, _, _) = client_for(&server);
    let err = client
        .post::<Widget, _>("/widgets", &serde_json::json!({ "name": "" }))
        .await
        .unwrap_err();

    let api = err.as_api().expect("typed error expected");
    assert_eq!(api.status, 400);
    let map = api.validation_errors.as_ref().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("name").map(String::as_str), Some("Name is required"));
}

#[tokio::test]
async fn embedded_error_list_reduces_to_field_map() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/widgets");
        then.status(400).json_body(serde_json::json!({
            "message": "Bad Request",
            "_embedded": {
                "errors": [
                    { "path": "name", "message": "must not be blank" }
                ]
            }
        }));
    });

    let (client, _, _) = client_for(&server);
    let err = client
        .post::<Widget, _>("/widgets", &serde_json::json!({}))
        .await
        .unwrap_err();

    let api = err.as_api().unwrap();
    let map = api.validation_errors.as_ref().unwrap();
    assert_eq!(map.get("name").map(String::as_str), Some("must not be blank"));
}

#[tokio::test]
async fn unauthorized_fires_session_signal_exactly_once_per_request() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/widgets/1");
        then.status(401)
            .json_body(serde_json::json!({ "message": "Unauthorized" }));
    });

    let (client, _, events) = client_for(&server);

    let err = client.get::<Widget>("/widgets/1").await.unwrap_err();
    assert_eq!(err.as_api().unwrap().status, 401);
    assert_eq!(events.unauthorized_count(), 1);

    let _ = client.get::<Widget>("/widgets/1").await.unwrap_err();
    assert_eq!(events.unauthorized_count(), 2);
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_status_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/widgets/1");
        then.status(500).body("<html>boom</html>");
    });

    let (client, _, events) = client_for(&server);
    let err = client.get::<Widget>("/widgets/1").await.unwrap_err();

    let api = err.as_api().unwrap();
    assert_eq!(api.status, 500);
    assert_eq!(api.message, "Request failed with status 500");
    assert_eq!(events.unauthorized_count(), 0);
}

#[tokio::test]
async fn transport_failure_is_not_a_typed_api_error() {
    let credentials = Arc::new(CredentialCell::new());
    let events = Arc::new(SessionEvents::new());
    // Port 9 (discard) is not listening; the connect fails.
    let client = HttpClient::new("http://127.0.0.1:9/api", credentials, events);

    let err = client.get::<Widget>("/widgets/1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(err.as_api().is_none());
}
