//! Exercises HttpA2aService against a minimal in-process HTTP server.

use std::time::Duration;

use chatcanvas_core::a2a::{A2aService, Part};
use chatcanvas_core::error::ChatCanvasError;
use chatcanvas_interaction::HttpA2aService;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct Captured {
    request_line: String,
    body: Value,
}

/// Reads one HTTP/1.1 request (headers plus Content-Length body).
async fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = &buf[header_end..header_end + content_length];
    Captured {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(body).unwrap()
        },
    }
}

async fn write_response(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
}

/// Serves the scripted responses in order, one connection each, and
/// reports every captured request.
async fn serve(responses: Vec<(&'static str, String)>) -> (String, mpsc::UnboundedReceiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            let captured = read_request(&mut stream).await;
            tx.send(captured).ok();
            write_response(&mut stream, status, &body).await;
        }
    });

    (format!("http://{addr}"), rx)
}

fn message_reply(text: &str, context_id: &str) -> String {
    json!({
        "result": {
            "kind": "message",
            "messageId": "m-1",
            "role": "agent",
            "parts": [{ "kind": "text", "text": text }]
        },
        "context_id": context_id
    })
    .to_string()
}

#[tokio::test]
async fn test_request_shape_and_context_tracking() {
    let (base, mut requests) = serve(vec![
        ("200 OK", message_reply("hello", "ctx-42")),
        ("200 OK", message_reply("again", "ctx-42")),
    ])
    .await;

    let service = HttpA2aService::new(base)
        .with_supported_catalog_ids(vec!["catalog://standard".to_string()]);

    let first = service
        .send_message(vec![Part::text("hi")], CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first.parts(), vec![Part::text("hello")]);
    assert_eq!(service.context_id().await.as_deref(), Some("ctx-42"));

    let captured = requests.recv().await.unwrap();
    assert_eq!(captured.request_line, "POST /a2a HTTP/1.1");
    assert_eq!(captured.body["parts"], json!([{ "kind": "text", "text": "hi" }]));
    assert_eq!(
        captured.body["metadata"]["a2uiClientCapabilities"]["supportedCatalogIds"],
        json!(["catalog://standard"])
    );
    assert!(captured.body.get("context_id").is_none());

    service
        .send_message(vec![Part::text("more")], CancellationToken::new())
        .await
        .unwrap();
    let captured = requests.recv().await.unwrap();
    assert_eq!(captured.body["context_id"], json!("ctx-42"));
}

#[tokio::test]
async fn test_error_body_maps_to_upstream() {
    let (base, _requests) = serve(vec![(
        "500 Internal Server Error",
        json!({ "error": "agent exploded" }).to_string(),
    )])
    .await;

    let service = HttpA2aService::new(base);
    let err = service
        .send_message(vec![Part::text("hi")], CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ChatCanvasError::Upstream { status: 500, ref message } if message == "agent exploded"
    ));
}

#[tokio::test]
async fn test_cancel_aborts_hanging_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    // Accept and read, but never answer.
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let service = HttpA2aService::new(base);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        service.send_message(vec![Part::text("hi")], cancel),
    )
    .await
    .expect("cancellation should end the request");

    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_agent_card_fetch() {
    let (base, mut requests) = serve(vec![
        (
            "200 OK",
            json!({ "name": "Rizz Agent", "iconUrl": "remote.svg", "version": "1.0.0" }).to_string(),
        ),
        ("404 Not Found", String::new()),
    ])
    .await;

    let service = HttpA2aService::new(base).with_icon_url_override("local.svg");

    let card = service.get_agent_card().await.unwrap();
    assert_eq!(card.name, "Rizz Agent");
    assert_eq!(card.icon_url.as_deref(), Some("local.svg"));
    assert_eq!(
        requests.recv().await.unwrap().request_line,
        "GET /a2a/agent-card HTTP/1.1"
    );

    let err = service.get_agent_card().await.unwrap_err();
    assert!(matches!(err, ChatCanvasError::Upstream { status: 404, .. }));
}
