//! WebSocket session tests over a live server with in-memory stores.

use super::*;
use crate::inbound::http::api_scope;
use crate::inbound::http::test_utils::memory_ports;
use crate::inbound::ws;
use crate::inbound::ws::state::{AllowedOrigins, WsState};
use crate::outbound::realtime::RoomRegistry;
use crate::services::DrivenPorts;
use actix_web::http::StatusCode;
use actix_web::{App, HttpServer, dev::ServerHandle, http::header, web};
use awc::error::WsClientError;
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message};
use futures_util::{SinkExt, StreamExt};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

const ORIGIN: &str = "http://localhost:3000";

struct TestServer {
    url: String,
    rooms: Arc<RoomRegistry>,
    _handle: ServerHandle,
}

impl TestServer {
    async fn register(&self, name: &str, email: &str) -> (String, String) {
        let mut response = awc::Client::default()
            .post(format!("{}/api/auth/register", self.url))
            .send_json(&json!({"name": name, "email": email, "password": "secret1"}))
            .await
            .expect("register request");
        let body: Value = response.json().await.expect("register body");
        let token = body["token"].as_str().expect("token").to_owned();
        let id = body["user"]["id"].as_str().expect("user id").to_owned();
        (token, id)
    }

    async fn send(&self, request: awc::ClientRequest, token: &str, body: Value) -> Value {
        let mut response = request
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .send_json(&body)
            .await
            .expect("api request");
        response.json().await.expect("api body")
    }

    async fn create_job(&self, token: &str) -> String {
        let request = awc::Client::default().post(format!("{}/api/jobs", self.url));
        let job = json!({"company": "Acme", "title": "Engineer", "appliedDate": "2024-01-01"});
        let body = self.send(request, token, job).await;
        body["data"]["id"].as_str().expect("job id").to_owned()
    }

    async fn change_status(&self, token: &str, job_id: &str, status: &str) {
        let request = awc::Client::default().put(format!("{}/api/jobs/{job_id}", self.url));
        let body = self.send(request, token, json!({"status": status})).await;
        assert_eq!(body["data"]["status"], status);
    }

    async fn try_connect(&self, query: &str) -> Result<Socket, WsClientError> {
        awc::Client::default()
            .ws(format!("{}/ws{query}", self.url))
            .set_header(header::ORIGIN, ORIGIN)
            .connect()
            .await
            .map(|(_response, socket)| socket)
    }

    async fn connect(&self, token: &str) -> Socket {
        self.try_connect(&format!("?token={token}"))
            .await
            .expect("websocket connect")
    }
}

#[fixture]
async fn server() -> TestServer {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let rooms = Arc::new(RoomRegistry::new());
    let ports = DrivenPorts {
        publisher: rooms.clone(),
        ..memory_ports()
    };
    let http_state = ports.http_state();
    let ws_state = WsState::new(ports.authenticator(), rooms.clone(), AllowedOrigins::default());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(http_state.clone()))
            .app_data(web::Data::new(ws_state.clone()))
            .service(api_scope())
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    TestServer {
        url: format!("http://{addr}"),
        rooms,
        _handle: handle,
    }
}

/// Next text frame as JSON, answering heartbeats meanwhile.
async fn next_json(socket: &mut Socket) -> Value {
    let frame = tokio::time::timeout(std::time::Duration::from_secs(2), async {
        loop {
            match socket.next().await.expect("response frame").expect("frame") {
                Frame::Text(bytes) => return bytes,
                Frame::Ping(payload) => {
                    socket.send(Message::Pong(payload)).await.expect("pong");
                }
                Frame::Pong(_) => {}
                other => panic!("expected text frame, got {other:?}"),
            }
        }
    })
    .await
    .expect("text frame before timeout");
    serde_json::from_slice(&frame).expect("json")
}

/// Fail if a text frame arrives within `window`.
async fn assert_silent(socket: &mut Socket, window: std::time::Duration) {
    let outcome = tokio::time::timeout(window, async {
        loop {
            match socket.next().await.expect("response frame").expect("frame") {
                Frame::Ping(payload) => {
                    socket.send(Message::Pong(payload)).await.expect("pong");
                }
                Frame::Pong(_) => {}
                other => return other,
            }
        }
    })
    .await;
    if let Ok(frame) = outcome {
        panic!("expected no frames, got {frame:?}");
    }
}

async fn next_close(socket: &mut Socket) -> Option<CloseReason> {
    tokio::time::timeout(std::time::Duration::from_secs(2), async {
        loop {
            match socket.next().await.expect("response frame").expect("frame") {
                Frame::Close(reason) => return reason,
                Frame::Ping(_) | Frame::Pong(_) => {}
                other => panic!("expected close frame, got {other:?}"),
            }
        }
    })
    .await
    .expect("close frame before timeout")
}

#[rstest]
#[actix_rt::test]
async fn pushes_job_notifications_only_to_the_owner(#[future] server: TestServer) {
    let server = server.await;
    let (alice, _) = server.register("Alice", "alice@example.com").await;
    let (bob, _) = server.register("Bob", "bob@example.com").await;
    let mut alice_socket = server.connect(&alice).await;
    let mut bob_socket = server.connect(&bob).await;

    let job_id = server.create_job(&alice).await;
    let added = next_json(&mut alice_socket).await;
    assert_eq!(added["event"], "notification");
    assert_eq!(added["data"]["type"], "new_job");

    server.change_status(&alice, &job_id, "Interview").await;
    let changed = next_json(&mut alice_socket).await;
    assert_eq!(
        changed,
        json!({
            "event": "notification",
            "data": {
                "type": "status_change",
                "title": "Application Status Changed",
                "message": "Your application for Engineer at Acme has changed from Applied to Interview",
            },
        })
    );

    assert_silent(&mut bob_socket, std::time::Duration::from_millis(300)).await;
}

#[rstest]
#[actix_rt::test]
async fn acknowledges_join_for_own_room(#[future] server: TestServer) {
    let server = server.await;
    let (token, user_id) = server.register("Alice", "alice@example.com").await;
    let mut socket = server.connect(&token).await;

    socket
        .send(Message::Text(
            json!({"event": "joinRoom", "userId": user_id}).to_string().into(),
        ))
        .await
        .expect("send text");

    assert_eq!(
        next_json(&mut socket).await,
        json!({"event": "joined", "userId": user_id})
    );
}

#[rstest]
#[actix_rt::test]
async fn rejects_join_for_another_room(#[future] server: TestServer) {
    let server = server.await;
    let (token, _) = server.register("Alice", "alice@example.com").await;
    let (_, bob_id) = server.register("Bob", "bob@example.com").await;
    let mut socket = server.connect(&token).await;

    socket
        .send(Message::Text(
            json!({"event": "joinRoom", "userId": bob_id}).to_string().into(),
        ))
        .await
        .expect("send text");

    let reply = next_json(&mut socket).await;
    assert_eq!(reply["event"], "error");
    assert_eq!(reply["code"], "forbidden");
    let bob_id = crate::domain::UserId::parse(&bob_id).expect("uuid");
    assert_eq!(server.rooms.connections(&bob_id), 0);
}

#[rstest]
#[actix_rt::test]
async fn accepts_bearer_header_at_upgrade(#[future] server: TestServer) {
    let server = server.await;
    let (token, user_id) = server.register("Alice", "alice@example.com").await;
    let (_response, _socket) = awc::Client::default()
        .ws(format!("{}/ws", server.url))
        .set_header(header::ORIGIN, ORIGIN)
        .bearer_auth(&token)
        .connect()
        .await
        .expect("websocket connect");

    let user_id = crate::domain::UserId::parse(&user_id).expect("uuid");
    assert_eq!(server.rooms.connections(&user_id), 1);
}

#[rstest]
#[case("")]
#[case("?token=forged")]
#[actix_rt::test]
async fn rejects_upgrade_without_valid_token(#[future] server: TestServer, #[case] query: &str) {
    let server = server.await;
    let error = server
        .try_connect(query)
        .await
        .err()
        .expect("upgrade should be refused");
    assert!(
        matches!(error, WsClientError::InvalidResponseStatus(StatusCode::UNAUTHORIZED)),
        "unexpected error: {error:?}"
    );
}

#[rstest]
#[actix_rt::test]
async fn leaves_room_when_client_disconnects(#[future] server: TestServer) {
    let server = server.await;
    let (token, user_id) = server.register("Alice", "alice@example.com").await;
    let user_id = crate::domain::UserId::parse(&user_id).expect("uuid");
    let mut socket = server.connect(&token).await;
    assert_eq!(server.rooms.connections(&user_id), 1);

    socket
        .send(Message::Close(Some(CloseCode::Normal.into())))
        .await
        .expect("send close");
    let _ = next_close(&mut socket).await;
    tokio::time::sleep(HEARTBEAT_INTERVAL).await;

    assert_eq!(server.rooms.connections(&user_id), 0);
}

#[rstest]
#[actix_rt::test]
async fn closes_on_malformed_json(#[future] server: TestServer) {
    let server = server.await;
    let (token, _) = server.register("Alice", "alice@example.com").await;
    let mut socket = server.connect(&token).await;
    socket
        .send(Message::Text("not-json".into()))
        .await
        .expect("send text");

    let reason = next_close(&mut socket).await.expect("close reason");
    assert_eq!(reason.code, CloseCode::Policy);
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages(#[future] server: TestServer) {
    let server = server.await;
    let (token, _) = server.register("Alice", "alice@example.com").await;
    let mut socket = server.connect(&token).await;
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 2).await;

    let reason = next_close(&mut socket).await.expect("close reason");
    assert_eq!(reason.code, CloseCode::Normal);
}
