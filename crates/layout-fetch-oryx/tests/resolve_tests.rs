use layout_fetch::{FetchError, LayoutRef, RevisionResolver, resolve_download_url};
use layout_fetch_oryx::{OryxClient, OryxClientConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OryxClient {
    OryxClient::new(OryxClientConfig {
        endpoint: Some(format!("{}/graphql", server.uri())),
        ..OryxClientConfig::default()
    })
    .unwrap()
}

fn layout_response(zip_url: Option<&str>) -> serde_json::Value {
    json!({
        "data": {
            "Layout": {
                "title": "freevoid main",
                "lastRevisionCompiled": true,
                "isLatestRevision": true,
                "__typename": "Layout",
                "revision": {
                    "createdAt": "2024-03-01T10:00:00Z",
                    "hashId": "AZjZE",
                    "model": "v4",
                    "title": "latest",
                    "zipUrl": zip_url,
                    "qmkVersion": "24.0",
                    "qmkUptodate": true,
                    "__typename": "Revision"
                }
            }
        }
    })
}

#[tokio::test]
async fn sends_query_variables_and_returns_zip_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": {
                "hashId": "lzxz0",
                "geometry": "ergodox-ez",
                "revisionId": "latest"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(layout_response(Some(
            "https://cdn.example.com/layouts/freevoid_main_lzxz0_AZjZE.zip",
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = resolve_download_url(&client, &LayoutRef::latest("lzxz0", "ergodox-ez"))
        .await
        .unwrap();

    assert_eq!(url, "https://cdn.example.com/layouts/freevoid_main_lzxz0_AZjZE.zip");
}

#[tokio::test]
async fn maps_revision_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(layout_response(Some("https://cdn.example.com/x.zip"))),
        )
        .mount(&server)
        .await;

    let revision = client_for(&server)
        .resolve(&LayoutRef::latest("lzxz0", "ergodox-ez"))
        .await
        .unwrap();

    assert_eq!(revision.layout_title.as_deref(), Some("freevoid main"));
    assert_eq!(revision.created_at.as_deref(), Some("2024-03-01T10:00:00Z"));
    assert_eq!(revision.model.as_deref(), Some("v4"));
}

#[tokio::test]
async fn missing_zip_url_is_remote_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(layout_response(None)))
        .mount(&server)
        .await;

    let result = resolve_download_url(
        &client_for(&server),
        &LayoutRef::latest("lzxz0", "ergodox-ez"),
    )
    .await;

    assert!(matches!(result, Err(FetchError::RemoteService(_))));
}

#[tokio::test]
async fn graphql_error_payload_is_remote_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "Layout": null },
            "errors": [{ "message": "Layout not found" }]
        })))
        .mount(&server)
        .await;

    let err = resolve_download_url(
        &client_for(&server),
        &LayoutRef::latest("missing", "ergodox-ez"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, FetchError::RemoteService(_)));
    assert!(err.to_string().contains("Layout not found"));
}

#[tokio::test]
async fn http_error_is_remote_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .resolve(&LayoutRef::latest("lzxz0", "ergodox-ez"))
        .await;

    assert!(matches!(result, Err(FetchError::RemoteService(_))));
}

#[tokio::test]
async fn non_json_body_is_remote_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .resolve(&LayoutRef::latest("lzxz0", "ergodox-ez"))
        .await;

    assert!(matches!(result, Err(FetchError::RemoteService(_))));
}

#[tokio::test]
async fn unreachable_endpoint_is_remote_service_error() {
    let client = OryxClient::new(OryxClientConfig {
        endpoint: Some("http://127.0.0.1:1/graphql".into()),
        ..OryxClientConfig::default()
    })
    .unwrap();

    let result = client.resolve(&LayoutRef::latest("lzxz0", "ergodox-ez")).await;
    assert!(matches!(result, Err(FetchError::RemoteService(_))));
}

#[tokio::test]
async fn empty_hash_id_is_rejected_without_a_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .resolve(&LayoutRef::latest("  ", "ergodox-ez"))
        .await;

    assert!(matches!(result, Err(FetchError::RemoteService(_))));
}
