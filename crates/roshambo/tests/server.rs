//! Integration tests for the relay: HTTP surface and full WebSocket flows.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures_util::{SinkExt, StreamExt};
use http_body_util::BodyExt;
use roshambo::{router, AppState, ServerBuilder};
use roshambo_protocol::ServerMessage;
use roshambo_room::{RegistryConfig, RoomStatus};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tower::ServiceExt;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a relay on a random port and returns its address.
async fn start_server() -> String {
    let server = ServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the serve loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// Opens a game session for `player` in `room`.
async fn connect(addr: &str, room: &str, player: &str) -> ClientWs {
    let (ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/{room}/{player}"))
            .await
            .expect("should connect");
    ws
}

/// Receives the next text frame as JSON, or panics after a deadline.
async fn recv_json(ws: &mut ClientWs) -> Value {
    let msg = tokio::time::timeout(Duration::from_secs(1), ws.next())
        .await
        .expect("frame should arrive within a second")
        .expect("stream should stay open")
        .expect("frame should be readable");
    serde_json::from_str(msg.into_text().expect("text frame").as_str())
        .expect("frame should be JSON")
}

/// Skips frames until one with the given `"type"` arrives.
async fn recv_type(ws: &mut ClientWs, msg_type: &str) -> Value {
    loop {
        let value = recv_json(ws).await;
        if value["type"] == msg_type {
            return value;
        }
    }
}

/// Submits a move.
async fn send_move(ws: &mut ClientWs, mv: &str) {
    let frame = format!(r#"{{"type":"move","move":"{mv}"}}"#);
    ws.send(Message::Text(frame.into()))
        .await
        .expect("send should succeed");
}

/// An in-process router plus its state, for socketless HTTP tests.
fn test_app() -> (AppState, axum::Router) {
    let state = AppState::new(RegistryConfig::default());
    (state.clone(), router(state))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// =========================================================================
// HTTP surface
// =========================================================================

#[tokio::test]
async fn test_health_check() {
    let (_state, app) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_create_room_returns_short_url_safe_id() {
    let (state, app) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/create_room")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let room_id = body["room_id"].as_str().expect("room_id should be a string");
    assert_eq!(room_id.len(), 6);
    assert!(room_id.chars().all(|c| c.is_ascii_alphanumeric()));

    // The freshly minted room exists with empty state.
    let status = state
        .registry
        .status(&roshambo_protocol::RoomId(room_id.to_string()))
        .await;
    assert_eq!(status, RoomStatus::Available);
}

#[tokio::test]
async fn test_room_status_reports_not_found() {
    let (_state, app) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/rooms/zzzzzz/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "not_found" }));
}

#[tokio::test]
async fn test_room_status_reports_full() {
    let (state, app) = test_app();
    let room = state.registry.create_room().await;

    // Fill the room through the registry directly.
    for player in ["alice", "bob"] {
        let (tx, _rx) = mpsc::unbounded_channel::<ServerMessage>();
        state
            .registry
            .join(&room, roshambo_protocol::PlayerId::from(player), tx)
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/rooms/{room}/status"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(body_json(response).await, json!({ "status": "full" }));
}

// =========================================================================
// WebSocket flows
// =========================================================================

#[tokio::test]
async fn test_join_notifications_carry_participant_counts() {
    let addr = start_server().await;

    let mut alice = connect(&addr, "lobby", "alice").await;
    assert_eq!(
        recv_json(&mut alice).await,
        json!({ "type": "player_join", "player_id": "alice", "player_count": 1 })
    );

    let mut bob = connect(&addr, "lobby", "bob").await;
    assert_eq!(
        recv_json(&mut alice).await,
        json!({ "type": "player_join", "player_id": "bob", "player_count": 2 })
    );
    // The newcomer hears their own join too.
    assert_eq!(
        recv_json(&mut bob).await,
        json!({ "type": "player_join", "player_id": "bob", "player_count": 2 })
    );
}

#[tokio::test]
async fn test_full_round_scenario() {
    // create → alice joins → bob joins → rock vs scissors → both clients
    // receive the identical result.
    let addr = start_server().await;

    let mut alice = connect(&addr, "duel42", "alice").await;
    let mut bob = connect(&addr, "duel42", "bob").await;

    send_move(&mut alice, "rock").await;
    send_move(&mut bob, "scissors").await;

    let expected = json!({
        "type": "result",
        "winner": "alice",
        "moves": { "alice": "rock", "bob": "scissors" }
    });
    assert_eq!(recv_type(&mut alice, "result").await, expected);
    assert_eq!(recv_type(&mut bob, "result").await, expected);
}

#[tokio::test]
async fn test_draw_has_null_winner() {
    let addr = start_server().await;

    let mut alice = connect(&addr, "mirror", "alice").await;
    let mut bob = connect(&addr, "mirror", "bob").await;

    send_move(&mut alice, "paper").await;
    send_move(&mut bob, "paper").await;

    let result = recv_type(&mut alice, "result").await;
    assert!(result["winner"].is_null());
    assert_eq!(result["moves"]["alice"], "paper");
    assert_eq!(result["moves"]["bob"], "paper");
}

#[tokio::test]
async fn test_lone_player_move_never_resolves() {
    let addr = start_server().await;

    let mut alice = connect(&addr, "solo", "alice").await;
    let _ = recv_type(&mut alice, "player_join").await;

    send_move(&mut alice, "rock").await;

    // No result may arrive until a second distinct player moves.
    let silence =
        tokio::time::timeout(Duration::from_millis(200), alice.next()).await;
    assert!(silence.is_err(), "expected no broadcast, got {silence:?}");
}

#[tokio::test]
async fn test_disconnect_broadcasts_player_leave() {
    let addr = start_server().await;

    let mut alice = connect(&addr, "flaky", "alice").await;
    let mut bob = connect(&addr, "flaky", "bob").await;

    bob.close(None).await.expect("close should succeed");

    assert_eq!(
        recv_type(&mut alice, "player_leave").await,
        json!({ "type": "player_leave", "player_id": "bob", "player_count": 1 })
    );
}

#[tokio::test]
async fn test_full_room_rejects_third_upgrade() {
    let addr = start_server().await;

    let _alice = connect(&addr, "packed", "alice").await;
    let _bob = connect(&addr, "packed", "bob").await;
    // Let both joins land before the third knock.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = tokio_tungstenite::connect_async(format!(
        "ws://{addr}/ws/packed/carol"
    ))
    .await
    .expect_err("third join should be refused");

    match err {
        tungstenite::Error::Http(response) => {
            assert_eq!(response.status().as_u16(), 409);
        }
        other => panic!("expected HTTP rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_duplicate_player_id_is_closed_not_admitted() {
    let addr = start_server().await;

    let mut alice = connect(&addr, "twins", "alice").await;
    let _ = recv_type(&mut alice, "player_join").await;

    // The upgrade itself succeeds (the room isn't full), but the join is
    // refused and the socket closed with a policy frame.
    let mut imposter = connect(&addr, "twins", "alice").await;
    let frame = tokio::time::timeout(Duration::from_secs(1), imposter.next())
        .await
        .expect("close should arrive")
        .expect("stream should yield a frame")
        .expect("frame should be readable");
    assert!(matches!(frame, Message::Close(_)));
}

#[tokio::test]
async fn test_garbage_and_irrelevant_frames_are_ignored() {
    let addr = start_server().await;

    let mut alice = connect(&addr, "noisy", "alice").await;
    let mut bob = connect(&addr, "noisy", "bob").await;

    // None of these are fatal, and none count as a move.
    for junk in [
        "not json at all",
        r#"{"type":"chat","text":"gl hf"}"#,
        r#"{"type":"move","move":"lizard"}"#,
        r#"{"move":"rock"}"#,
    ] {
        alice
            .send(Message::Text(junk.into()))
            .await
            .expect("send should succeed");
    }

    // The connection is still alive and a clean round still resolves.
    send_move(&mut alice, "scissors").await;
    send_move(&mut bob, "paper").await;

    let result = recv_type(&mut alice, "result").await;
    assert_eq!(result["winner"], "alice");
}

#[tokio::test]
async fn test_room_ceases_to_exist_after_last_disconnect() {
    let addr = start_server().await;

    {
        let mut alice = connect(&addr, "fleeting", "alice").await;
        let _ = recv_type(&mut alice, "player_join").await;
        alice.close(None).await.expect("close should succeed");
    }
    // Let the teardown propagate through the registry.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (ws, _) = tokio_tungstenite::connect_async(format!(
        "ws://{addr}/ws/fresh-check/probe"
    ))
    .await
    .expect("relay should still accept connections");
    drop(ws);
}

#[tokio::test]
async fn test_status_endpoint_tracks_live_sessions() {
    let server = ServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");
    let state = server.state();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let room = roshambo_protocol::RoomId::from("tracked");
    assert_eq!(state.registry.status(&room).await, RoomStatus::NotFound);

    let mut alice = connect(&addr, "tracked", "alice").await;
    let _ = recv_type(&mut alice, "player_join").await;
    assert_eq!(state.registry.status(&room).await, RoomStatus::Available);

    let _bob = connect(&addr, "tracked", "bob").await;
    let _ = recv_type(&mut alice, "player_join").await;
    assert_eq!(state.registry.status(&room).await, RoomStatus::Full);

    alice.close(None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(state.registry.status(&room).await, RoomStatus::Available);
}
