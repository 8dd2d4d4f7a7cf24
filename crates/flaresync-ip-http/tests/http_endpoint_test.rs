// Tests for `HttpIpEndpoint` and the connectivity probe using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flaresync_core::traits::{IpEndpoint, ResponseFormat};
use flaresync_core::{Error, IpResolver, RetryPolicy};
use flaresync_ip_http::{HttpIpEndpoint, probe_connectivity};

// ── Helpers ─────────────────────────────────────────────────────────

fn endpoint(server: &MockServer, route: &str, format: ResponseFormat) -> HttpIpEndpoint {
    HttpIpEndpoint::new(
        format!("{}{}", server.uri(), route),
        format,
        Duration::from_secs(5),
    )
    .unwrap()
}

// ── fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_returns_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("203.0.113.5\n"))
        .mount(&server)
        .await;

    let ep = endpoint(&server, "/ip", ResponseFormat::PlainText);
    let body = ep.fetch().await.unwrap();

    assert_eq!(body, "203.0.113.5\n");
    assert_eq!(ep.format().extract(&body).as_deref(), Some("203.0.113.5"));
}

#[tokio::test]
async fn test_fetch_non_success_status_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let ep = endpoint(&server, "/json", ResponseFormat::json_ip());
    let err = ep.fetch().await.unwrap_err();

    assert!(matches!(err, Error::Http(ref msg) if msg.contains("429")));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("1.2.3.4")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let ep = HttpIpEndpoint::new(
        format!("{}/slow", server.uri()),
        ResponseFormat::PlainText,
        Duration::from_millis(200),
    )
    .unwrap();

    assert!(matches!(ep.fetch().await, Err(Error::Http(_))));
}

// ── resolver over HTTP ──────────────────────────────────────────────

#[tokio::test]
async fn test_resolver_falls_back_across_http_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>portal</html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ip": "198.51.100.23", "country": "NL" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = IpResolver::new(
        vec![
            Box::new(endpoint(&server, "/down", ResponseFormat::json_ip())),
            Box::new(endpoint(&server, "/html", ResponseFormat::PlainText)),
            Box::new(endpoint(&server, "/json", ResponseFormat::json_ip())),
        ],
        RetryPolicy::once(),
    )
    .unwrap();

    let ip = resolver.resolve_public_ip().await.unwrap();
    assert_eq!(ip.as_str(), "198.51.100.23");
}

// ── connectivity probe ──────────────────────────────────────────────

#[tokio::test]
async fn test_probe_accepts_any_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(probe_connectivity(&server.uri(), Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_probe_fails_when_nothing_listens() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    assert!(!probe_connectivity(&uri, Duration::from_secs(1)).await);
}
