//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every REST route lives under `/api`. Successful bodies carry
//! `success: true`; failures use the error envelope from [`error`].

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::{Scope, web};
use serde::Serialize;
use utoipa::ToSchema;

pub use error::ApiResult;

/// Body of `{ "success": true, "data": ... }` responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of responses that only acknowledge success.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    #[schema(example = true)]
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Empty object returned as `data` by delete endpoints.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct Empty {}

/// The `/api` scope with every REST handler registered.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(health::health)
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::current_user)
        .service(accounts::logout)
        .service(accounts::admin_invite)
        .service(accounts::register_admin)
        .service(jobs::list_jobs)
        .service(jobs::create_job)
        .service(jobs::get_job)
        .service(jobs::update_job)
        .service(jobs::delete_job)
        .service(notifications::list_notifications)
        .service(notifications::mark_all_read)
        .service(notifications::mark_read)
        .service(notifications::delete_notification)
        .service(users::dashboard)
        .service(users::update_profile)
        .service(users::system_stats)
        .service(users::list_users)
        .service(users::create_admin)
        .service(users::update_role)
        .service(users::delete_user)
}
