use std::sync::Arc;

use chrono::Duration;
use rendezvous_core::{Config, Engine, ManualClock};
use rendezvous_server::{serve, ServerContext};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

struct TestServer {
    base: String,
    client: Client,
    clock: Arc<ManualClock>,
}

impl TestServer {
    async fn spawn() -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let engine = Arc::new(Engine::with_clock(Config::default(), clock.clone()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, ServerContext::new(engine)));

        Self {
            base: format!("http://{addr}"),
            client: Client::new(),
            clock,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .unwrap();

        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();

        let status = response.status();
        (status, response.json().await.unwrap())
    }
}

#[tokio::test]
async fn heartbeat_lists_user_until_they_go_quiet() {
    let server = TestServer::spawn().await;

    let (status, body) = server
        .post("/heartbeat", json!({ "username": "alice", "p2p_port": 4000 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (_, users) = server.get("/users").await;
    assert_eq!(users, json!([{ "username": "alice" }]));

    server.clock.advance(Duration::seconds(16));

    let (_, users) = server.get("/users").await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn room_host_address_falls_back_to_the_caller() {
    let server = TestServer::spawn().await;

    let (status, created) = server
        .post(
            "/create-room",
            json!({ "username": "alice", "p2p_port": 4000, "game_type": "chess" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let room_id = created["room_id"].as_str().unwrap().to_string();
    assert_eq!(room_id.len(), 5);

    let (status, found) = server
        .post("/join-room", json!({ "room_id": room_id, "username": "bob" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        found,
        json!({
            "status": "found",
            "host_ip": "127.0.0.1",
            "host_port": 4000,
            "host_username": "alice",
            "game_type": "chess"
        })
    );

    // Joining again works, the room is not consumed
    let (status, _) = server.post("/join-room", json!({ "room_id": room_id })).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn declared_and_forwarded_addresses() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .post(format!("{}/create-room", server.base))
        .header("X-Forwarded-For", "203.0.113.7, 10.1.1.1")
        .json(&json!({ "username": "alice", "p2p_port": 4000 }))
        .send()
        .await
        .unwrap();
    let created: Value = response.json().await.unwrap();

    let (_, found) = server
        .post("/join-room", json!({ "room_id": created["room_id"] }))
        .await;
    assert_eq!(found["host_ip"], "203.0.113.7");

    let (_, created) = server
        .post(
            "/create-room",
            json!({ "username": "bob", "p2p_port": 5000, "ip": "100.64.0.9" }),
        )
        .await;
    let (_, found) = server
        .post("/join-room", json!({ "room_id": created["room_id"] }))
        .await;
    assert_eq!(found["host_ip"], "100.64.0.9");
}

#[tokio::test]
async fn unknown_and_expired_rooms_are_not_found() {
    let server = TestServer::spawn().await;

    let (status, body) = server.post("/join-room", json!({ "room_id": "12345" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());

    let (status, _) = server.post("/join-room", json!({ "room_id": "abc" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, created) = server
        .post("/create-room", json!({ "username": "alice", "p2p_port": 4000 }))
        .await;

    server.clock.advance(Duration::seconds(1801));

    let (status, _) = server
        .post("/join-room", json!({ "room_id": created["room_id"] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invites_are_handed_out_once() {
    let server = TestServer::spawn().await;

    let (status, _) = server
        .post(
            "/send-invite",
            json!({ "challenger": "alice", "target": "bob", "room_id": "12345" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    server
        .post("/heartbeat", json!({ "username": "bob", "p2p_port": 4001 }))
        .await;

    let (status, body) = server
        .post(
            "/send-invite",
            json!({
                "challenger": "alice",
                "target": "bob",
                "room_id": "12345",
                "game_type": "chess"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "sent" }));

    let (_, invite) = server.get("/check-invite/bob").await;
    assert_eq!(
        invite,
        json!({
            "status": "invite",
            "from": "alice",
            "room_id": "12345",
            "game_type": "chess"
        })
    );

    let (_, invite) = server.get("/check-invite/bob").await;
    assert_eq!(invite, json!({ "status": "none" }));
}

#[tokio::test]
async fn matchmaking_pairs_two_players() {
    let server = TestServer::spawn().await;

    let (_, alice) = server
        .post(
            "/matchmaking/register",
            json!({ "username": "alice", "p2p_port": 4000 }),
        )
        .await;
    let alice = alice["session_id"].as_str().unwrap().to_string();

    let (_, waiting) = server
        .get(&format!("/matchmaking/status/{alice}"))
        .await;
    assert_eq!(waiting, json!({ "status": "waiting" }));

    let (_, bob) = server
        .post(
            "/matchmaking/register",
            json!({ "username": "bob", "ip": "100.64.0.2" }),
        )
        .await;
    let bob = bob["session_id"].as_str().unwrap().to_string();

    let (_, alice_view) = server
        .get(&format!("/matchmaking/status/{alice}"))
        .await;
    assert_eq!(
        alice_view,
        json!({ "status": "matched", "peer_username": "bob", "peer_ip": "100.64.0.2" })
    );

    let (_, bob_view) = server.get(&format!("/matchmaking/status/{bob}")).await;
    assert_eq!(
        bob_view,
        json!({
            "status": "matched",
            "peer_username": "alice",
            "peer_ip": "127.0.0.1",
            "peer_port": 4000
        })
    );

    let (status, _) = server.get("/matchmaking/status/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unregister_always_succeeds() {
    let server = TestServer::spawn().await;

    let (_, carol) = server
        .post("/matchmaking/register", json!({ "username": "carol" }))
        .await;
    let carol = carol["session_id"].as_str().unwrap().to_string();

    for username in ["nobody", "carol", "carol"] {
        let (status, body) = server
            .post("/matchmaking/unregister", json!({ "username": username }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    let (status, _) = server
        .get(&format!("/matchmaking/status/{carol}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_counts() {
    let server = TestServer::spawn().await;

    server
        .post("/heartbeat", json!({ "username": "alice", "p2p_port": 4000 }))
        .await;
    server
        .post("/create-room", json!({ "username": "alice", "p2p_port": 4000 }))
        .await;
    server
        .post("/matchmaking/register", json!({ "username": "bob" }))
        .await;

    let (status, health) = server.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        health,
        json!({ "status": "Server is running", "users": 1, "rooms": 1, "waiting": 1 })
    );
}

#[tokio::test]
async fn invalid_bodies_are_rejected() {
    let server = TestServer::spawn().await;

    let (status, _) = server
        .post("/heartbeat", json!({ "username": "", "p2p_port": 4000 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post("/heartbeat", json!({ "username": "alice" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post(
            "/send-invite",
            json!({ "challenger": "alice", "target": "bob", "room_id": "1234x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn serves_an_api_document() {
    let server = TestServer::spawn().await;

    let (status, doc) = server.get("/api.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/create-room"].is_object());
    assert!(doc["paths"]["/matchmaking/status/{session_id}"].is_object());
}
