//! Dashboard, profile and user administration endpoints.
//!
//! ```text
//! GET /api/users/dashboard
//! PUT /api/users/profile {"name":"Ada","email":"ada@example.com"}
//! PUT /api/users/{id}/role {"role":"admin"}
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{DashboardSummary, ProfileChanges, SystemStats};
use crate::domain::{EmailAddress, JobStatus, Password, Role, UserId, UserName};

use super::accounts::{RegisterRequest, UserResponse, registration};
use super::auth::AuthenticatedCaller;
use super::jobs::JobResponse;
use super::schemas::ErrorSchema;
use super::state::HttpState;
use super::validation::{parse_path_id, user_validation_error};
use super::{ApiResult, DataResponse, Empty};

const USER_NOT_FOUND: &str = "User not found";

/// Summary of the caller's own applications.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_jobs: u64,
    /// Count per status; statuses without jobs are omitted.
    #[schema(value_type = Object)]
    pub status_counts: BTreeMap<JobStatus, u64>,
    pub recent_jobs: Vec<JobResponse>,
    pub upcoming_interviews: Vec<JobResponse>,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(value: DashboardSummary) -> Self {
        Self {
            total_jobs: value.total_jobs,
            status_counts: value.status_counts,
            recent_jobs: value.recent_jobs.into_iter().map(Into::into).collect(),
            upcoming_interviews: value
                .upcoming_interviews
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// System-wide totals for administrators.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: u64,
    pub total_admins: u64,
    pub total_jobs: u64,
    #[schema(value_type = Object)]
    pub status_counts: BTreeMap<JobStatus, u64>,
}

impl From<SystemStats> for StatsResponse {
    fn from(value: SystemStats) -> Self {
        Self {
            total_users: value.total_users,
            total_admins: value.total_admins,
            total_jobs: value.total_jobs,
            status_counts: value.status_counts,
        }
    }
}

/// Request body for `PUT /api/users/profile`. Absent fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// New password; an empty string leaves the password unchanged.
    pub password: Option<String>,
}

impl ProfileRequest {
    fn into_changes(self) -> ApiResult<ProfileChanges> {
        Ok(ProfileChanges {
            name: self
                .name
                .map(|name| UserName::new(name).map_err(user_validation_error))
                .transpose()?,
            email: self
                .email
                .map(|email| EmailAddress::new(email).map_err(user_validation_error))
                .transpose()?,
            password: self
                .password
                .filter(|password| !password.is_empty())
                .map(|password| Password::new(password).map_err(user_validation_error))
                .transpose()?,
        })
    }
}

/// Request body for `PUT /api/users/{id}/role`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct RoleRequest {
    #[schema(example = "admin")]
    pub role: String,
}

/// All users with their count.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<UserResponse>,
}

fn user_id(raw: &str) -> ApiResult<UserId> {
    parse_path_id(raw, USER_NOT_FOUND).map(UserId::from_uuid)
}

#[utoipa::path(
    get,
    path = "/api/users/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DataResponse<DashboardResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "dashboard"
)]
#[get("/users/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<DataResponse<DashboardResponse>>> {
    let summary = state.jobs_query.dashboard(&caller.into_inner()).await?;
    Ok(web::Json(DataResponse::new(summary.into())))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = DataResponse<UserResponse>),
        (status = 400, description = "Invalid request or email in use", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<DataResponse<UserResponse>>> {
    let changes = payload.into_inner().into_changes()?;
    let user = state
        .accounts
        .update_profile(&caller.into_inner(), changes)
        .await?;
    Ok(web::Json(DataResponse::new(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/users/stats",
    responses(
        (status = 200, description = "System statistics", body = DataResponse<StatsResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admins only", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "systemStats"
)]
#[get("/users/stats")]
pub async fn system_stats(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<DataResponse<StatsResponse>>> {
    let stats = state.users.stats(&caller.into_inner()).await?;
    Ok(web::Json(DataResponse::new(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = UserListResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admins only", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<web::Json<UserListResponse>> {
    let users = state.users.list_users(&caller.into_inner()).await?;
    let data: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok(web::Json(UserListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

#[utoipa::path(
    post,
    path = "/api/users/admin",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Admin created", body = DataResponse<UserResponse>),
        (status = 400, description = "Invalid request or user already exists", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admins only", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createAdmin"
)]
#[post("/users/admin")]
pub async fn create_admin(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let caller = caller.into_inner();
    caller.authorize(Role::Admin)?;
    let user = state
        .users
        .create_admin(&caller, registration(&name, &email, password)?)
        .await?;
    Ok(HttpResponse::Created().json(DataResponse::new(UserResponse::from(user))))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    params(("id" = String, Path, description = "User identifier")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Updated user", body = DataResponse<UserResponse>),
        (status = 400, description = "Unknown role or self-demotion", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admins only", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "updateUserRole"
)]
#[put("/users/{id}/role")]
pub async fn update_role(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<web::Json<DataResponse<UserResponse>>> {
    let caller = caller.into_inner();
    caller.authorize(Role::Admin)?;
    let id = user_id(&path)?;
    let role: Role = payload
        .role
        .trim()
        .parse()
        .map_err(user_validation_error)?;
    let user = state.users.update_role(&caller, &id, role).await?;
    Ok(web::Json(DataResponse::new(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User and their data deleted", body = DataResponse<Empty>),
        (status = 400, description = "Self-deletion", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admins only", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DataResponse<Empty>>> {
    let caller = caller.into_inner();
    caller.authorize(Role::Admin)?;
    let id = user_id(&path)?;
    state.users.delete_user(&caller, &id).await?;
    Ok(web::Json(DataResponse::new(Empty::default())))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
