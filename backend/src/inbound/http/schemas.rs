//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape and register under the domain
//! type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`], the failure envelope.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Human-readable message returned to clients.
    #[schema(example = "Please add a company name")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::JobStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::JobStatus)]
pub enum JobStatusSchema {
    Applied,
    Interview,
    Offer,
    Rejected,
    Accepted,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    #[schema(rename = "applicant")]
    Applicant,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::NotificationKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::NotificationKind)]
pub enum NotificationKindSchema {
    #[schema(rename = "status_change")]
    StatusChange,
    #[schema(rename = "new_job")]
    NewJob,
    #[schema(rename = "reminder")]
    Reminder,
    #[schema(rename = "system")]
    System,
}
