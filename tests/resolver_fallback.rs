//! Tests for the fetch resolver's variant × transport fallback matrix and
//! the relay fetch path.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use safespace::fetch::relay::relay_fetch;
use safespace::fetch::Resolver;
use safespace::normalize::normalize_url;
use safespace::FetchError;

fn test_client(timeout: Duration) -> Arc<reqwest::Client> {
    Arc::new(
        reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("safespace-test/1.0")
            .build()
            .expect("client should build"),
    )
}

#[tokio::test]
async fn test_direct_fetch_success_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1) // exactly one attempt: first success wins
        .mount(&server)
        .await;

    let resolver = Resolver::new(test_client(Duration::from_secs(5)));
    let target = normalize_url(&server.uri()).expect("mock URI should normalize");

    let page = resolver.fetch(&target).await.expect("fetch should succeed");
    assert_eq!(page.body, "<html>ok</html>");
    assert!(page.final_url.starts_with("http://"));
}

#[tokio::test]
async fn test_exhaustion_reports_attempts_in_matrix_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = Resolver::new(test_client(Duration::from_secs(5)));
    // Explicit http scheme: the matrix is direct(http), relay(http),
    // direct(https), relay(https).
    let target = normalize_url(&server.uri()).expect("mock URI should normalize");

    let err = resolver.fetch(&target).await.expect_err("all attempts fail");
    match err {
        FetchError::Exhausted { summary, attempts } => {
            assert_eq!(attempts.len(), 4);
            let http_variant = format!("{}/", server.uri());
            let https_variant = http_variant.replacen("http://", "https://", 1);
            assert_eq!(attempts[0].url, http_variant);
            assert_eq!(attempts[1].url, http_variant);
            assert_eq!(attempts[2].url, https_variant);
            assert_eq!(attempts[3].url, https_variant);

            let direct_at = summary.find("direct(").expect("direct attempt in summary");
            let relay_at = summary.find("relay(").expect("relay attempt in summary");
            assert!(direct_at < relay_at, "direct is tried before relay");
            assert!(summary.contains("HTTP 500"));
        }
        other => panic!("expected Exhausted, got: {other}"),
    }
}

#[tokio::test]
async fn test_relay_fetch_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("relayed"))
        .mount(&server)
        .await;

    let client = test_client(Duration::from_secs(5));
    let body = relay_fetch(
        &client,
        &format!("{}/page", server.uri()),
        Duration::from_secs(5),
    )
    .await
    .expect("relay fetch should succeed");
    assert_eq!(body, "relayed");
}

#[tokio::test]
async fn test_relay_fetch_rejects_oversized_body() {
    let server = MockServer::start().await;
    let eleven_mib = "x".repeat(11 * 1024 * 1024);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(eleven_mib))
        .mount(&server)
        .await;

    let client = test_client(Duration::from_secs(30));
    let err = relay_fetch(&client, &server.uri(), Duration::from_secs(30))
        .await
        .expect_err("oversized body must be rejected");
    assert!(matches!(err, FetchError::PayloadTooLarge { .. }));
}

#[tokio::test]
async fn test_relay_fetch_times_out_and_reports_distinctly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = test_client(Duration::from_secs(30));
    let err = relay_fetch(&client, &server.uri(), Duration::from_millis(300))
        .await
        .expect_err("delayed response must time out");
    assert!(matches!(err, FetchError::Timeout(_)));
}

#[tokio::test]
async fn test_relay_fetch_rejects_non_http_scheme() {
    let client = test_client(Duration::from_secs(5));
    let err = relay_fetch(&client, "ftp://example.com", Duration::from_secs(5))
        .await
        .expect_err("ftp must be rejected");
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_relay_error_carries_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(Duration::from_secs(5));
    let err = relay_fetch(&client, &server.uri(), Duration::from_secs(5))
        .await
        .expect_err("403 must fail");
    assert!(err.to_string().contains("HTTP 403"));
}
