//! Shared fixtures for jobtrack integration tests.
//!
//! Integration tests compile as separate crates, so the in-memory service
//! graph and request helpers live here rather than in each test file.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use jobtrack::domain::AdminInviteCodes;
use jobtrack::domain::ports::{NoOpNotificationPublisher, NotificationPublisher};
use jobtrack::inbound::http::api_scope;
use jobtrack::inbound::http::state::HttpState;
use jobtrack::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use jobtrack::services::{DrivenPorts, Repositories};

pub const INVITE_SECRET: &str = "integration-invite-secret";
pub const PASSWORD: &str = "secret1";

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// In-memory ports with a pinned clock and the given publisher.
pub fn memory_ports_with(publisher: Arc<dyn NotificationPublisher>) -> DrivenPorts {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
    DrivenPorts {
        repositories: Repositories::in_memory(),
        publisher,
        hasher: Arc::new(Argon2PasswordHasher::default()),
        tokens: Arc::new(JwtTokenService::new(
            b"integration-secret",
            TimeDelta::days(30),
            clock.clone(),
        )),
        invites: AdminInviteCodes::new(Some(INVITE_SECRET.to_owned()), clock.clone()),
        clock,
    }
}

pub fn memory_ports() -> DrivenPorts {
    memory_ports_with(Arc::new(NoOpNotificationPublisher))
}

pub async fn init_api(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(api_scope()),
    )
    .await
}

/// Call the app, optionally as `token`, and decode the JSON body.
pub async fn send<S>(app: &S, request: TestRequest, token: Option<&str>) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let request = match token {
        Some(token) => request.insert_header((header::AUTHORIZATION, format!("Bearer {token}"))),
        None => request,
    };
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

/// A registered account's token and id.
pub struct Account {
    pub token: String,
    pub id: String,
}

pub async fn register<S>(app: &S, name: &str, email: &str) -> Account
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"name": name, "email": email, "password": PASSWORD})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {email}: {body}");
    Account {
        token: body["token"].as_str().expect("token").to_owned(),
        id: body["user"]["id"].as_str().expect("user id").to_owned(),
    }
}

/// Register an admin through the invite flow of an existing admin-free app.
pub async fn register_admin<S>(app: &S, ports: &DrivenPorts, name: &str, email: &str) -> Account
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let invite = ports.invites.generate().expect("invite code");
    let (status, body) = send(
        app,
        TestRequest::post().uri("/api/auth/register-admin").set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "inviteCode": invite.code,
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register admin {email}: {body}");
    assert_eq!(body["user"]["role"], "admin");
    Account {
        token: body["token"].as_str().expect("token").to_owned(),
        id: body["user"]["id"].as_str().expect("user id").to_owned(),
    }
}

pub async fn create_job<S>(app: &S, token: &str, company: &str, status: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (code, body) = send(
        app,
        TestRequest::post().uri("/api/jobs").set_json(json!({
            "company": company,
            "title": "Engineer",
            "appliedDate": "2024-01-01",
            "status": status,
        })),
        Some(token),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "create job: {body}");
    body["data"].clone()
}
