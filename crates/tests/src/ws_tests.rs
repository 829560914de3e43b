use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::fixtures::test_app::TestApp;

pub(crate) type Socket = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Reads messages until one of type `wanted` arrives.
pub(crate) async fn next_of_type(socket: &mut Socket, wanted: &str) -> Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let msg = socket.next().await.expect("socket closed").expect("socket error");
            if let Message::Text(text) = msg {
                let json: Value = serde_json::from_str(&text).unwrap();
                if json["type"] == wanted {
                    return json;
                }
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no {} message", wanted))
}

/// Opens a socket and waits until the server has attached its session.
pub(crate) async fn open_session(app: &TestApp, token: &str, session: &str) -> Socket {
    let (mut socket, _) = connect_async(app.ws_url(token, session)).await.unwrap();
    next_of_type(&mut socket, "connected").await;
    socket
}

#[tokio::test]
async fn invalid_token_is_refused() {
    let app = TestApp::spawn_without_db(|_| {}).await;
    assert!(connect_async(app.ws_url("not-a-token", "tab-1")).await.is_err());
}

#[tokio::test]
async fn connected_then_ping_pong() {
    let app = TestApp::spawn_without_db(|_| {}).await;
    let token = app.token_for("u1", "Ada");

    let (mut socket, _) = connect_async(app.ws_url(&token, "tab-1")).await.unwrap();

    let connected = next_of_type(&mut socket, "connected").await;
    assert_eq!(connected["data"]["uid"], "u1");
    assert_eq!(connected["data"]["sessionId"], "tab-1");

    socket
        .send(Message::text(r#"{"type":"ping"}"#))
        .await
        .unwrap();
    next_of_type(&mut socket, "pong").await;
}

#[tokio::test]
async fn failing_feed_reports_feed_error() {
    let app = TestApp::spawn_without_db(|_| {}).await;
    let token = app.token_for("u1", "Ada");

    let (mut socket, _) = connect_async(app.ws_url(&token, "tab-1")).await.unwrap();

    let error = next_of_type(&mut socket, "feed:error").await;
    let feed = error["data"]["feed"].as_str().unwrap();
    assert!(["roster", "chat", "announcements"].contains(&feed));
}
