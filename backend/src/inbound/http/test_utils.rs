//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::TimeDelta;
use serde_json::{Value, json};

use crate::domain::ports::{
    MockAccountService, MockAuthenticator, MockJobCommand, MockJobQuery,
    MockNotificationCommand, MockNotificationQuery, MockUserAdministration,
    NoOpNotificationPublisher,
};
use crate::domain::{AdminInviteCodes, Caller, Error, Role, UserId};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use crate::services::{DrivenPorts, Repositories};
use crate::test_support::{FixtureClock, utc_date};

use super::api_scope;
use super::state::HttpState;

pub const TEST_TOKEN: &str = "valid-token";
pub const INVITE_SECRET: &str = "invite-secret";

/// Mocked driving ports; set expectations before calling [`Self::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountService,
    pub authenticator: MockAuthenticator,
    pub jobs: MockJobCommand,
    pub jobs_query: MockJobQuery,
    pub notifications: MockNotificationCommand,
    pub notifications_query: MockNotificationQuery,
    pub users: MockUserAdministration,
}

impl MockPorts {
    /// Accept [`TEST_TOKEN`] as `caller` and reject every other token.
    pub fn authenticated_as(caller: Caller) -> Self {
        let mut ports = Self::default();
        ports
            .authenticator
            .expect_authenticate()
            .returning(move |token| {
                if token == TEST_TOKEN {
                    Ok(caller)
                } else {
                    Err(Error::unauthorized("Not authorized to access this route"))
                }
            });
        ports
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            accounts: Arc::new(self.accounts),
            authenticator: Arc::new(self.authenticator),
            jobs: Arc::new(self.jobs),
            jobs_query: Arc::new(self.jobs_query),
            notifications: Arc::new(self.notifications),
            notifications_query: Arc::new(self.notifications_query),
            users: Arc::new(self.users),
        }
    }
}

pub fn caller(role: Role) -> Caller {
    Caller {
        user_id: UserId::random(),
        role,
    }
}

/// Real services over in-memory stores with a pinned clock.
pub fn memory_ports() -> DrivenPorts {
    let clock = Arc::new(FixtureClock::at(utc_date(2024, 3, 15)));
    DrivenPorts {
        repositories: Repositories::in_memory(),
        publisher: Arc::new(NoOpNotificationPublisher),
        hasher: Arc::new(Argon2PasswordHasher::default()),
        tokens: Arc::new(JwtTokenService::new(
            b"test-secret",
            TimeDelta::days(30),
            clock.clone(),
        )),
        invites: AdminInviteCodes::new(Some(INVITE_SECRET.to_owned()), clock.clone()),
        clock,
    }
}

/// Mount the `/api` scope over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(api_scope())
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Register an applicant and return its token.
pub async fn register<S, B>(app: &S, name: &str, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"name": name, "email": email, "password": "secret1"}))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    body["token"]
        .as_str()
        .expect("registration returns a token")
        .to_owned()
}
