//! End-to-end tests of the WebSocket protocol.

mod common;

use common::TestServer;
use serde_json::json;
use tokio_tungstenite::tungstenite;

#[tokio::test]
async fn test_connect_without_valid_token_is_rejected_before_upgrade() {
    // テスト項目: トークンが不正・欠落している接続は 401 で拒否される
    // given (前提条件):
    let server = TestServer::start().await;

    for url in [
        server.ws_url("not-a-jwt"),
        format!("ws://{}/ws", server.addr),
    ] {
        // when (操作):
        let result = tokio_tungstenite::connect_async(url).await;

        // then (期待する結果):
        match result {
            Err(tungstenite::Error::Http(response)) => {
                assert_eq!(response.status().as_u16(), 401)
            }
            other => panic!("expected 401, got {:?}", other.map(|(_, r)| r.status())),
        }
    }
}

#[tokio::test]
async fn test_connect_sends_welcome() {
    // テスト項目: 接続すると表示名入りの歓迎メッセージが届く
    let server = TestServer::start().await;
    let (stream, _) = tokio_tungstenite::connect_async(server.ws_url(&server.token(1)))
        .await
        .unwrap();
    let mut client = common::WsClient::from_stream(stream);

    let welcome = client.next_event().await;

    assert_eq!(
        welcome,
        json!({"event": "connected", "data": {"message": "Welcome, Alice!"}})
    );
}

#[tokio::test]
async fn test_room_seven_scenario_over_websocket() {
    // テスト項目: A がルーム 7 で "hi" → B 参加後 "again" → B 切断後 "solo"
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect(1).await;
    let mut b = server.connect(2).await;
    a.join(7).await;

    // when (操作): A が "hi"
    a.send_message(7, "hi").await;

    // then (期待する結果): A だけが受け取る
    let hi = a.expect_event("message").await;
    assert_eq!(hi["content"], "hi");
    assert_eq!(hi["username"], "alice");
    assert_eq!(hi["room_id"], 7);
    b.expect_silence().await;

    // when (操作): B が参加し、A が "again"
    b.join(7).await;
    assert_eq!(a.expect_event("user_joined").await["username"], "bob");
    a.send_message(7, "again").await;

    // then (期待する結果): 両方に同じメッセージが 1 回ずつ届く
    let a_again = a.expect_event("message").await;
    let b_again = b.expect_event("message").await;
    assert_eq!(a_again, b_again);
    assert!(a_again["id"].as_i64() > hi["id"].as_i64());

    // when (操作): B が切断し、A が "solo"
    b.close().await;
    assert_eq!(a.expect_event("user_left").await["username"], "bob");
    a.send_message(7, "solo").await;

    // then (期待する結果):
    assert_eq!(a.expect_event("message").await["content"], "solo");
    a.expect_silence().await;
}

#[tokio::test]
async fn test_join_unknown_room_reports_error() {
    // テスト項目: 存在しないルームへの参加は "Room not found"
    let server = TestServer::start().await;
    let mut a = server.connect(1).await;

    a.send(json!({"event": "join_room", "data": {"room_id": 9999}}))
        .await;

    assert_eq!(
        a.expect_event("error").await,
        json!({"message": "Room not found"})
    );
}

#[tokio::test]
async fn test_join_non_positive_room_reports_room_not_found() {
    // テスト項目: ルーム ID 0 への参加も "Room not found"
    let server = TestServer::start().await;
    let mut a = server.connect(1).await;

    a.send(json!({"event": "join_room", "data": {"room_id": 0}}))
        .await;

    assert_eq!(
        a.expect_event("error").await,
        json!({"message": "Room not found"})
    );
}

#[tokio::test]
async fn test_typing_with_invalid_room_is_silent() {
    // テスト項目: 不正なルーム ID の typing には何も返らず、接続は維持される
    let server = TestServer::start().await;
    let mut a = server.connect(1).await;

    a.send(json!({"event": "typing", "data": {"room_id": -3, "is_typing": true}}))
        .await;

    a.expect_silence().await;
    a.join(7).await;
}

#[tokio::test]
async fn test_whitespace_message_reports_error() {
    // テスト項目: 空白のみのメッセージはエラーで、ルームには配信されない
    let server = TestServer::start().await;
    let mut a = server.connect(1).await;
    let mut b = server.connect(2).await;
    a.join(7).await;
    b.join(7).await;
    a.expect_event("user_joined").await;

    a.send_message(7, "   ").await;

    assert_eq!(
        a.expect_event("error").await["message"],
        "Message cannot be empty"
    );
    b.expect_silence().await;
}

#[tokio::test]
async fn test_malformed_frame_reports_error_and_keeps_connection() {
    // テスト項目: 解釈できないフレームにはエラーを返し、接続は維持される
    let server = TestServer::start().await;
    let mut a = server.connect(1).await;

    a.send_raw("this is not json").await;
    let error = a.expect_event("error").await;
    assert!(error["message"].as_str().unwrap().starts_with("Invalid event"));

    a.join(7).await;
}

#[tokio::test]
async fn test_typing_reaches_other_members_only() {
    // テスト項目: typing は送信者以外に届く
    let server = TestServer::start().await;
    let mut a = server.connect(1).await;
    let mut b = server.connect(2).await;
    a.join(7).await;
    b.join(7).await;
    a.expect_event("user_joined").await;

    a.send(json!({"event": "typing", "data": {"room_id": 7, "is_typing": true}}))
        .await;

    assert_eq!(
        b.expect_event("typing").await,
        json!({"username": "alice", "is_typing": true})
    );
    a.expect_silence().await;
}
