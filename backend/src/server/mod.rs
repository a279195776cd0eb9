//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig, SettingsError};
pub use state_builders::{build_ports, build_repositories};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use jobtrack::Trace;
#[cfg(debug_assertions)]
use jobtrack::doc::ApiDoc;
use jobtrack::inbound::http::api_scope;
use jobtrack::inbound::http::health::{HealthState, live, ready};
use jobtrack::inbound::http::state::HttpState;
use jobtrack::inbound::ws;
use jobtrack::inbound::ws::state::WsState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(Trace)
        .service(api_scope())
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        ports,
        rooms,
        allowed_origins,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    let http_state = web::Data::new(ports.http_state());
    let ws_state = web::Data::new(WsState::new(
        ports.authenticator(),
        rooms,
        allowed_origins,
    ));

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(actix_web::middleware::Condition::from_option(
            prometheus.clone(),
        ));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::TimeDelta;
    use jobtrack::domain::AdminInviteCodes;
    use jobtrack::domain::TRACE_ID_HEADER;
    use jobtrack::domain::ports::NoOpNotificationPublisher;
    use jobtrack::inbound::ws::state::AllowedOrigins;
    use jobtrack::outbound::realtime::RoomRegistry;
    use jobtrack::outbound::security::{Argon2PasswordHasher, JwtTokenService};
    use jobtrack::services::{DrivenPorts, Repositories};
    use mockable::DefaultClock;
    use rstest::rstest;
    use std::sync::Arc;

    fn deps() -> AppDependencies {
        let clock = Arc::new(DefaultClock);
        let ports = DrivenPorts {
            repositories: Repositories::in_memory(),
            publisher: Arc::new(NoOpNotificationPublisher),
            hasher: Arc::new(Argon2PasswordHasher::default()),
            tokens: Arc::new(JwtTokenService::new(
                b"test-secret",
                TimeDelta::days(1),
                clock.clone(),
            )),
            invites: AdminInviteCodes::new(None, clock.clone()),
            clock,
        };
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(ports.http_state()),
            ws_state: web::Data::new(WsState::new(
                ports.authenticator(),
                Arc::new(RoomRegistry::new()),
                AllowedOrigins::default(),
            )),
        }
    }

    #[rstest]
    #[case("/api/health", StatusCode::OK)]
    #[case("/health/live", StatusCode::OK)]
    #[case("/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case("/api/jobs", StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn routes_are_mounted(#[case] uri: &str, #[case] expected: StatusCode) {
        let app = test::init_service(build_app(deps())).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), expected);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_follows_health_state() {
        let deps = deps();
        let health = deps.health_state.clone();
        let app = test::init_service(build_app(deps)).await;
        health.mark_ready();
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
