//! Index loading over HTTP against a minimal in-process server.

use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use semsearch_index::{fetch_index_with, IndexError, IndexSource};

/// Serve one HTTP response on an ephemeral port and return the base URL.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{}", addr)
}

/// Client that ignores proxy environment variables, so loopback requests
/// reach the test server directly.
fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_fetch_index_over_http() {
    let base = serve_once(
        "200 OK",
        r#"[{"id":1,"title":"first","v":[127,0,0]},{"id":2,"v":[0,127,0]}]"#,
    )
    .await;

    let source = IndexSource::parse(&format!("{}/data/index.json", base));
    let IndexSource::Url(url) = source else {
        panic!("expected a URL source");
    };

    let index = fetch_index_with(&client(), &url).await.unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.entries()[0].embedding(), &[127, 0, 0]);
    assert_eq!(
        index.entries()[0].get("title"),
        Some(&serde_json::json!("first"))
    );
}

#[tokio::test]
async fn test_fetch_index_http_error_status() {
    let base = serve_once("404 Not Found", "missing").await;

    let err = fetch_index_with(&client(), &format!("{}/data/index.json", base))
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::Http(_)));
}

#[tokio::test]
async fn test_fetch_index_malformed_body() {
    let base = serve_once("200 OK", r#"[{"id":1}]"#).await;

    let err = fetch_index_with(&client(), &format!("{}/index.json", base))
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::Json(_)));
}
