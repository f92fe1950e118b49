#![allow(clippy::unwrap_used)]
// Integration tests for `PanelClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, header_exists, method, path,
};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use panel_rocket_api::{Error, PanelClient, RequestSigner, SiteDefaults};

const API_KEY: &str = "test-api-key";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PanelClient) {
    let server = MockServer::start().await;
    let client = PanelClient::with_client(
        reqwest::Client::new(),
        &server.uri(),
        SecretString::from(API_KEY.to_owned()),
        None,
    )
    .unwrap();
    (server, client)
}

fn sites_envelope(domains: &[&str]) -> serde_json::Value {
    let items: Vec<_> = domains
        .iter()
        .enumerate()
        .map(|(i, d)| {
            json!({
                "id": i + 1,
                "primaryDomain": d,
                "sitePath": format!("/opt/1panel/www/sites/{d}"),
                "status": "Running",
            })
        })
        .collect();
    json!({
        "code": 200,
        "message": "",
        "data": { "total": items.len(), "items": items }
    })
}

/// Matches requests whose token is the MD5 of `1panel + key + timestamp`.
fn signed_with(key: &'static str) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    move |req: &Request| {
        let Some(ts) = req
            .headers
            .get("1Panel-Timestamp")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
        else {
            return false;
        };
        let expected = RequestSigner::new(SecretString::from(key.to_owned()), None).sign_at(ts);
        req.headers
            .get("1Panel-Token")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|token| token == expected.token)
    }
}

// ── Signing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_requests_carry_signing_headers() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/websites/search"))
        .and(header_exists("1Panel-Timestamp"))
        .and(header("Accept-Language", "en"))
        .and(signed_with(API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(sites_envelope(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let sites = client.list_websites().await.unwrap();
    assert!(sites.is_empty());
}

#[tokio::test]
async fn test_language_header_is_configurable() {
    let server = MockServer::start().await;
    let client = PanelClient::with_client(
        reqwest::Client::new(),
        &server.uri(),
        SecretString::from(API_KEY.to_owned()),
        Some("zh"),
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(header("Accept-Language", "zh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sites_envelope(&[])))
        .expect(1)
        .mount(&server)
        .await;

    client.list_websites().await.unwrap();
}

// ── Websites ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_websites_requests_one_large_page() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/websites/search"))
        .and(body_partial_json(json!({
            "page": 1,
            "pageSize": 999_999,
            "orderBy": "created_at",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(sites_envelope(&["a.com", "b.com"])),
        )
        .mount(&server)
        .await;

    let sites = client.list_websites().await.unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].primary_domain, "a.com");
    assert_eq!(sites[1].root_path(), Some("/opt/1panel/www/sites/b.com"));
}

#[tokio::test]
async fn test_find_website_matches_exact_domain() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/websites/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(sites_envelope(&["a.com", "x.com"])),
        )
        .mount(&server)
        .await;

    let found = client.find_website("x.com").await.unwrap().unwrap();
    assert_eq!(found.primary_domain, "x.com");

    assert!(client.find_website("X.COM").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_website_missing_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/websites/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sites_envelope(&["a.com"])))
        .mount(&server)
        .await;

    assert!(client.find_website("x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_website_sends_defaults() {
    let (server, client) = setup().await;
    let client = client.with_site_defaults(SiteDefaults {
        group_id: 5,
        ..SiteDefaults::default()
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/websites"))
        .and(body_partial_json(json!({
            "primaryDomain": "new.com",
            "alias": "new.com",
            "type": "static",
            "appType": "installed",
            "webSiteGroupId": 5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200, "message": "", "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.create_website("new.com").await.unwrap();
}

// ── Files ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_file_sends_multipart_form() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("index.html");
    std::fs::write(&file, "<h1>hello</h1>").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/files/upload"))
        .and(header_exists("1Panel-Token"))
        .and(body_string_contains("name=\"file\"; filename=\"index.html\""))
        .and(body_string_contains("<h1>hello</h1>"))
        .and(body_string_contains("/www/sites/x.com/index/"))
        .and(body_string_contains("True"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200, "message": "", "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .upload_file(&file, "/www/sites/x.com/index/")
        .await
        .unwrap();

    assert_eq!(result, json!({ "message": "Upload success" }));
}

#[tokio::test]
async fn test_upload_file_returns_payload() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("app.js");
    std::fs::write(&file, "console.log(1)").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/files/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200, "message": "", "data": { "name": "app.js" }
        })))
        .mount(&server)
        .await;

    let result = client.upload_file(&file, "/r/assets").await.unwrap();
    assert_eq!(result["name"], "app.js");
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let (_server, client) = setup().await;

    let result = client
        .upload_file(std::path::Path::new("/definitely/not/here.txt"), "/r")
        .await;

    assert!(
        matches!(result, Err(Error::Io { .. })),
        "expected Io error, got: {result:?}"
    );
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401, "message": "invalid api key"
        })))
        .mount(&server)
        .await;

    let result = client.list_websites().await;

    let err = result.unwrap_err();
    assert!(err.is_auth_rejected(), "expected auth rejection, got: {err:?}");
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid api key"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_envelope_error_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/websites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 500, "message": "domain already exists", "data": null
        })))
        .mount(&server)
        .await;

    let result = client.create_website("dup.com").await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("already exists"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let result = client.list_websites().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
