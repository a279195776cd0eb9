//! Registration, login and session endpoints.
//!
//! ```text
//! POST /api/auth/register {"name":"Ada","email":"ada@example.com","password":"secret1"}
//! POST /api/auth/login {"email":"ada@example.com","password":"secret1"}
//! GET /api/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{LoginCredentials, Registration};
use crate::domain::{AuthSession, EmailAddress, InviteCode, Password, Role, User, UserId, UserName};

use super::auth::AuthenticatedCaller;
use super::schemas::{ErrorSchema, RoleSchema};
use super::state::HttpState;
use super::validation::user_validation_error;
use super::{ApiResult, DataResponse, SuccessResponse};

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(value_type = RoleSchema)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Token and user returned after registering or logging in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            success: true,
            token: session.token.token,
            user: session.user.into(),
        }
    }
}

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/auth/register-admin`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[schema(example = "63b27e275fe6")]
    pub invite_code: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Current admin invite code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub invite_code: String,
    pub valid_until: DateTime<Utc>,
}

impl From<InviteCode> for InviteResponse {
    fn from(value: InviteCode) -> Self {
        Self {
            invite_code: value.code,
            valid_until: value.valid_until,
        }
    }
}

/// Validate the three registration fields in client order.
pub(crate) fn registration(
    name: &str,
    email: &str,
    password: String,
) -> ApiResult<Registration> {
    Ok(Registration {
        name: UserName::new(name).map_err(user_validation_error)?,
        email: EmailAddress::new(email).map_err(user_validation_error)?,
        password: Password::new(password).map_err(user_validation_error)?,
    })
}

/// Create an applicant account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request or user already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let session = state
        .accounts
        .register(registration(&name, &email, password)?)
        .await?;
    Ok(web::Json(session.into()))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let session = state
        .accounts
        .login(LoginCredentials {
            email,
            password: Password::unchecked(password),
        })
        .await?;
    Ok(web::Json(session.into()))
}

/// The authenticated user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = DataResponse<UserResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<DataResponse<UserResponse>>> {
    let user = state.accounts.current_user(&caller.into_inner()).await?;
    Ok(web::Json(DataResponse::new(user.into())))
}

/// Tokens are stateless, so logging out only acknowledges the request.
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out", body = SuccessResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/auth/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(SuccessResponse::ok())
}

/// Current month's admin invite code.
#[utoipa::path(
    get,
    path = "/api/auth/admin-invite",
    responses(
        (status = 200, description = "Invite code", body = DataResponse<InviteResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admins only", body = ErrorSchema),
        (status = 500, description = "No invite secret configured", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "adminInvite"
)]
#[get("/auth/admin-invite")]
pub async fn admin_invite(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<DataResponse<InviteResponse>>> {
    let invite = state.accounts.admin_invite(&caller.into_inner()).await?;
    Ok(web::Json(DataResponse::new(invite.into())))
}

/// Create an admin account with a valid invite code.
#[utoipa::path(
    post,
    path = "/api/auth/register-admin",
    request_body = RegisterAdminRequest,
    responses(
        (status = 200, description = "Admin created", body = AuthResponse),
        (status = 400, description = "Invalid request or invite code", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "registerAdmin",
    security([])
)]
#[post("/auth/register-admin")]
pub async fn register_admin(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterAdminRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let RegisterAdminRequest {
        name,
        email,
        password,
        invite_code,
    } = payload.into_inner();
    let session = state
        .accounts
        .register_admin(registration(&name, &email, password)?, invite_code)
        .await?;
    Ok(web::Json(session.into()))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
