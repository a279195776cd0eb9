//! WebSocket upgrade checks: origin allow-list and bearer token.

mod support;

use actix_http::Request;
use actix_web::http::header::HeaderValue;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test::{self, TestRequest},
    web,
};
use rstest::{fixture, rstest};
use std::sync::Arc;

use jobtrack::inbound::http::api_scope;
use jobtrack::inbound::ws;
use jobtrack::inbound::ws::state::{AllowedOrigins, WsState};
use jobtrack::outbound::realtime::RoomRegistry;
use jobtrack::services::DrivenPorts;
use support::{memory_ports, register};

// Example Sec-WebSocket-Key from RFC 6455 section 1.3 used to satisfy handshake requirements.
const RFC6455_SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

#[fixture]
fn ports() -> DrivenPorts {
    memory_ports()
}

async fn init_app(
    ports: &DrivenPorts,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let ws_state = WsState::new(
        ports.authenticator(),
        Arc::new(RoomRegistry::new()),
        AllowedOrigins::new(["http://localhost:3000", "https://jobs.example.com"]),
    );
    test::init_service(
        App::new()
            .app_data(web::Data::new(ports.http_state()))
            .app_data(web::Data::new(ws_state))
            .service(api_scope())
            .service(ws::ws_entry),
    )
    .await
}

fn handshake_request(uri: &str) -> TestRequest {
    TestRequest::get()
        .uri(uri)
        .insert_header((header::UPGRADE, "websocket"))
        .insert_header((header::CONNECTION, "Upgrade"))
        .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
        .insert_header((header::SEC_WEBSOCKET_KEY, RFC6455_SAMPLE_KEY))
}

#[derive(Debug, Clone, Copy)]
/// Origin header variants that must stop the upgrade.
enum OriginHeaderCase {
    /// No Origin header present.
    Missing,
    /// Origin not in the allowlist.
    Unlisted,
    /// Multiple Origin headers (forbidden by RFC 6455).
    Multiple,
    /// Malformed Origin header (invalid UTF-8).
    Malformed,
    /// Allowed host on the wrong scheme.
    WrongScheme,
}

fn with_origin_case(request: TestRequest, origin_case: OriginHeaderCase) -> Request {
    match origin_case {
        OriginHeaderCase::Missing => request.to_request(),
        OriginHeaderCase::Unlisted => request
            .append_header((header::ORIGIN, "https://example.com"))
            .to_request(),
        OriginHeaderCase::Multiple => request
            .append_header((header::ORIGIN, "http://localhost:3000"))
            .append_header((header::ORIGIN, "https://example.com"))
            .to_request(),
        OriginHeaderCase::Malformed => {
            let invalid = HeaderValue::from_bytes(&[0x80]).expect("opaque Origin header value");
            request.insert_header((header::ORIGIN, invalid)).to_request()
        }
        OriginHeaderCase::WrongScheme => request
            .insert_header((header::ORIGIN, "http://jobs.example.com"))
            .to_request(),
    }
}

#[rstest]
#[case("http://localhost:3000")]
#[case("https://jobs.example.com")]
#[actix_web::test]
async fn upgrades_with_allowed_origin_and_token(ports: DrivenPorts, #[case] origin: &str) {
    let app = init_app(&ports).await;
    let token = register(&app, "Alice", "alice@example.com").await.token;

    let req = handshake_request(&format!("/ws?token={token}"))
        .insert_header((header::ORIGIN, origin))
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS, "origin {origin}");
}

#[rstest]
#[actix_web::test]
async fn upgrades_with_bearer_header(ports: DrivenPorts) {
    let app = init_app(&ports).await;
    let token = register(&app, "Alice", "alice@example.com").await.token;

    let req = handshake_request("/ws")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
}

#[rstest]
#[case("/ws")]
#[case("/ws?token=not-a-jwt")]
#[actix_web::test]
async fn rejects_missing_or_invalid_tokens(ports: DrivenPorts, #[case] uri: &str) {
    let app = init_app(&ports).await;

    let req = handshake_request(uri)
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(OriginHeaderCase::Missing, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Unlisted, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Multiple, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::Malformed, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::WrongScheme, StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn rejects_disallowed_origin_headers(
    ports: DrivenPorts,
    #[case] origin_case: OriginHeaderCase,
    #[case] expected: StatusCode,
) {
    let app = init_app(&ports).await;
    let token = register(&app, "Alice", "alice@example.com").await.token;

    let req = with_origin_case(handshake_request(&format!("/ws?token={token}")), origin_case);
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), expected, "{origin_case:?}");
}
