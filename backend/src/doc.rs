//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` endpoint plus the health probes, the
//! schema wrappers that describe domain types without coupling them to
//! utoipa, and the bearer security scheme. Swagger UI serves it in debug
//! builds and `cargo run --bin openapi-dump` exports it for tooling.

use crate::inbound::http::accounts::{
    AuthResponse, InviteResponse, LoginRequest, RegisterAdminRequest, RegisterRequest,
    UserResponse,
};
use crate::inbound::http::jobs::{JobListResponse, JobRequest, JobResponse};
use crate::inbound::http::notifications::{NotificationListResponse, NotificationResponse};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, JobStatusSchema, NotificationKindSchema, RoleSchema,
};
use crate::inbound::http::users::{
    DashboardResponse, ProfileRequest, RoleRequest, StatsResponse, UserListResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer scheme referenced by secured operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/auth/register or POST /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Jobtrack API",
        description = "Track job applications, receive status notifications and administer users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::admin_invite,
        crate::inbound::http::accounts::register_admin,
        crate::inbound::http::jobs::list_jobs,
        crate::inbound::http::jobs::create_job,
        crate::inbound::http::jobs::get_job,
        crate::inbound::http::jobs::update_job,
        crate::inbound::http::jobs::delete_job,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::delete_notification,
        crate::inbound::http::users::dashboard,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::system_stats,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_admin,
        crate::inbound::http::users::update_role,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        JobStatusSchema,
        RoleSchema,
        NotificationKindSchema,
        UserResponse,
        AuthResponse,
        RegisterRequest,
        RegisterAdminRequest,
        LoginRequest,
        InviteResponse,
        JobRequest,
        JobResponse,
        JobListResponse,
        NotificationResponse,
        NotificationListResponse,
        DashboardResponse,
        StatsResponse,
        ProfileRequest,
        RoleRequest,
        UserListResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and the current account"),
        (name = "jobs", description = "Job applications owned by the caller"),
        (name = "notifications", description = "Notification feed and read state"),
        (name = "users", description = "Dashboard and profile of the caller"),
        (name = "admin", description = "User management and system statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
