//! Shared helpers for end-to-end tests: a real server on an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use flashchat_server::{
    bootstrap::{self, AppConfig},
    domain::UserId,
    infrastructure::identity::{DEFAULT_TOKEN_TTL_SECS, JwtIdentityProvider},
};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

pub struct TestServer {
    pub addr: SocketAddr,
    pub identity: Arc<JwtIdentityProvider>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server seeded with the demo fixtures
    pub async fn start() -> Self {
        let app = bootstrap::build(&AppConfig {
            jwt_secret: "integration-secret".to_string(),
            node_id: Some("node-it".to_string()),
            fixtures: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        })
        .expect("Failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = app.server;
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            server
                .serve(listener, shutdown)
                .await
                .expect("Server error");
        });

        TestServer {
            addr,
            identity: app.identity,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn token(&self, user_id: i64) -> String {
        self.identity
            .issue_token(UserId::new(user_id).unwrap())
            .unwrap()
    }

    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/ws?token={}", self.addr, token)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Connect as a demo user and consume the welcome event
    pub async fn connect(&self, user_id: i64) -> WsClient {
        let (stream, _response) = tokio_tungstenite::connect_async(self.ws_url(&self.token(user_id)))
            .await
            .expect("Failed to connect");
        let mut client = WsClient::from_stream(stream);
        client.expect_event("connected").await;
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub fn from_stream(stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self { stream }
    }

    pub async fn send(&mut self, frame: Value) {
        self.stream
            .send(Message::Text(frame.to_string().into()))
            .await
            .expect("Failed to send");
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send");
    }

    /// Next text frame, parsed
    pub async fn next_event(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for an event")
                .expect("Stream ended")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON frame");
            }
        }
    }

    /// Next event, asserting its name; returns its data
    pub async fn expect_event(&mut self, name: &str) -> Value {
        let event = self.next_event().await;
        assert_eq!(event["event"], name, "unexpected event: {event}");
        event["data"].clone()
    }

    /// Assert that nothing arrives for a short while
    pub async fn expect_silence(&mut self) {
        let result = tokio::time::timeout(Duration::from_millis(200), self.stream.next()).await;
        assert!(result.is_err(), "unexpected frame: {:?}", result);
    }

    pub async fn join(&mut self, room_id: i64) {
        self.send(serde_json::json!({"event": "join_room", "data": {"room_id": room_id}}))
            .await;
        self.expect_event("room_joined").await;
        self.expect_event("user_joined").await;
    }

    pub async fn send_message(&mut self, room_id: i64, content: &str) {
        self.send(serde_json::json!({
            "event": "send_message",
            "data": {"room_id": room_id, "content": content}
        }))
        .await;
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
