//! Job application endpoints.
//!
//! ```text
//! GET /api/jobs?status=Interview&sort=asc&page=2&limit=10
//! POST /api/jobs {"company":"Acme","title":"Engineer","appliedDate":"2024-01-01"}
//! PUT /api/jobs/{id} {"status":"Interview"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{PageLinks, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::JobFilter;
use crate::domain::{Job, JobDetails, JobDraft, JobId, JobPatch, JobStatus, SortDirection, UserId};

use super::auth::AuthenticatedCaller;
use super::schemas::{ErrorSchema, JobStatusSchema};
use super::state::HttpState;
use super::validation::{
    parse_optional_applied_date, parse_optional_status, parse_path_id, status_filter,
};
use super::{ApiResult, DataResponse, Empty};

const JOB_NOT_FOUND: &str = "Job not found";

/// A stored job application.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    #[schema(value_type = String)]
    pub id: JobId,
    /// Owning user.
    #[schema(value_type = String)]
    pub user: UserId,
    #[schema(example = "Acme")]
    pub company: String,
    #[schema(example = "Engineer")]
    pub title: String,
    #[schema(value_type = JobStatusSchema)]
    pub status: JobStatus,
    pub applied_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        let JobDetails {
            location,
            notes,
            contact_name,
            contact_email,
            contact_phone,
            salary,
            link,
        } = job.details;
        Self {
            id: job.id,
            user: job.owner,
            company: job.company,
            title: job.title,
            status: job.status,
            applied_date: job.applied_date,
            location,
            notes,
            contact_name,
            contact_email,
            contact_phone,
            salary,
            link,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Request body for creating or updating a job.
///
/// On update, absent fields keep their stored value and an empty detail
/// string clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct JobRequest {
    pub company: Option<String>,
    pub title: Option<String>,
    #[schema(example = "Applied")]
    pub status: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2024-01-01")]
    pub applied_date: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub salary: Option<String>,
    pub link: Option<String>,
}

impl JobRequest {
    fn into_draft(self) -> ApiResult<JobDraft> {
        Ok(JobDraft {
            status: parse_optional_status(self.status)?,
            applied_date: parse_optional_applied_date(self.applied_date)?,
            company: self.company.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            details: JobDetails {
                location: self.location,
                notes: self.notes,
                contact_name: self.contact_name,
                contact_email: self.contact_email,
                contact_phone: self.contact_phone,
                salary: self.salary,
                link: self.link,
            },
        })
    }

    fn into_patch(self) -> ApiResult<JobPatch> {
        Ok(JobPatch {
            status: parse_optional_status(self.status)?,
            applied_date: parse_optional_applied_date(self.applied_date)?,
            company: self.company,
            title: self.title,
            location: self.location,
            notes: self.notes,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            salary: self.salary,
            link: self.link,
        })
    }
}

/// Query string for `GET /api/jobs`. Values are parsed leniently.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobListParams {
    /// Exact status to match; unknown values are ignored.
    pub status: Option<String>,
    /// `asc` for oldest first; anything else sorts newest first.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size, at most 100.
    pub limit: Option<String>,
}

impl JobListParams {
    fn filter(&self) -> JobFilter {
        JobFilter {
            status: status_filter(self.status.as_deref()),
            sort: SortDirection::from_query(self.sort.as_deref()),
            page: PageRequest::from_query(self.page.as_deref(), self.limit.as_deref()),
        }
    }
}

/// One page of jobs.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobListResponse {
    pub success: bool,
    /// Items on this page.
    pub count: usize,
    /// Matching jobs across all pages.
    pub total: u64,
    #[schema(value_type = Object)]
    pub pagination: PageLinks,
    pub data: Vec<JobResponse>,
}

fn job_id(raw: &str) -> ApiResult<JobId> {
    parse_path_id(raw, JOB_NOT_FOUND).map(JobId::from_uuid)
}

/// List the caller's jobs, or every job for an admin.
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobListParams),
    responses(
        (status = 200, description = "Jobs", body = JobListResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "listJobs"
)]
#[get("/jobs")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    params: web::Query<JobListParams>,
) -> ApiResult<web::Json<JobListResponse>> {
    let page = state
        .jobs_query
        .list(&caller.into_inner(), params.filter())
        .await?;
    let pagination = page.links();
    let total = page.total();
    let data: Vec<JobResponse> = page.into_items().into_iter().map(Into::into).collect();
    Ok(web::Json(JobListResponse {
        success: true,
        count: data.len(),
        total,
        pagination,
        data,
    }))
}

/// Record a new application.
#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = JobRequest,
    responses(
        (status = 201, description = "Job created", body = DataResponse<JobResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "createJob"
)]
#[post("/jobs")]
pub async fn create_job(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<JobRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let job = state.jobs.create(&caller.into_inner(), draft).await?;
    Ok(HttpResponse::Created().json(DataResponse::new(JobResponse::from(job))))
}

/// Fetch one job.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "Job", body = DataResponse<JobResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Job not found", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "getJob"
)]
#[get("/jobs/{id}")]
pub async fn get_job(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DataResponse<JobResponse>>> {
    let id = job_id(&path)?;
    let job = state.jobs_query.get(&caller.into_inner(), &id).await?;
    Ok(web::Json(DataResponse::new(job.into())))
}

/// Patch a job. A status change notifies the owner.
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job identifier")),
    request_body = JobRequest,
    responses(
        (status = 200, description = "Updated job", body = DataResponse<JobResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Job not found", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "updateJob"
)]
#[put("/jobs/{id}")]
pub async fn update_job(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<JobRequest>,
) -> ApiResult<web::Json<DataResponse<JobResponse>>> {
    let id = job_id(&path)?;
    let patch = payload.into_inner().into_patch()?;
    let job = state.jobs.update(&caller.into_inner(), &id, patch).await?;
    Ok(web::Json(DataResponse::new(job.into())))
}

/// Delete a job and its notifications.
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "Job deleted", body = DataResponse<Empty>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Job not found", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "deleteJob"
)]
#[delete("/jobs/{id}")]
pub async fn delete_job(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DataResponse<Empty>>> {
    let id = job_id(&path)?;
    state.jobs.delete(&caller.into_inner(), &id).await?;
    Ok(web::Json(DataResponse::new(Empty::default())))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
