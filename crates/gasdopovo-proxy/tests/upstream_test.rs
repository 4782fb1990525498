//! HttpUpstream against a local stand-in for the lookup site

use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::post;
use axum::Router;
use gasdopovo_core::{Error, Identifier};
use gasdopovo_proxy::{HttpUpstream, Upstream, UpstreamConfig};
use std::net::SocketAddr;
use std::time::Duration;

async fn lookup_page(headers: HeaderMap, body: String) -> (StatusCode, Html<String>) {
    let form_ok = body == "cpf=12345678909";
    let content_type_ok = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with("application/x-www-form-urlencoded"));
    let referer = headers
        .get("referer")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if form_ok && content_type_ok {
        (
            StatusCode::OK,
            Html(format!(r#"<div class="br-message success">recebido de {}</div>"#, referer)),
        )
    } else {
        (StatusCode::OK, Html(format!("<p>unexpected body: {}</p>", body)))
    }
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "late"
}

async fn spawn_site() -> SocketAddr {
    let app = Router::new()
        .route("/consultar", post(lookup_page))
        .route("/broken", post(broken))
        .route("/slow", post(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(url: String) -> UpstreamConfig {
    UpstreamConfig {
        url,
        referer: Some("https://gasdopovo.mds.gov.br/".to_string()),
        timeout_secs: 1,
        allow_http: true,
        ..Default::default()
    }
}

fn cpf() -> Identifier {
    Identifier::parse("123.456.789-09").unwrap()
}

#[tokio::test]
async fn test_posts_form_with_headers() {
    let addr = spawn_site().await;
    let upstream = HttpUpstream::new(&config(format!("http://{}/consultar", addr))).unwrap();

    let body = upstream.fetch(&cpf()).await.unwrap();
    assert_eq!(
        body,
        r#"<div class="br-message success">recebido de https://gasdopovo.mds.gov.br/</div>"#
    );
}

#[tokio::test]
async fn test_failure_status_is_transport_error() {
    let addr = spawn_site().await;
    let upstream = HttpUpstream::new(&config(format!("http://{}/broken", addr))).unwrap();

    let err = upstream.fetch(&cpf()).await.unwrap_err();
    assert!(matches!(err, Error::Upstream(ref msg) if msg.contains("500")));
}

#[tokio::test]
async fn test_timeout() {
    let addr = spawn_site().await;
    let upstream = HttpUpstream::new(&config(format!("http://{}/slow", addr))).unwrap();

    let err = upstream.fetch(&cpf()).await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
}

#[tokio::test]
async fn test_unreachable_host() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let upstream = HttpUpstream::new(&config(format!("http://{}/consultar", addr))).unwrap();
    let err = upstream.fetch(&cpf()).await.unwrap_err();
    assert!(matches!(err, Error::Upstream(_)));
}
