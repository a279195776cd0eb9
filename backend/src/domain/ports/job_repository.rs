//! Port abstraction for job persistence adapters.

use std::collections::BTreeMap;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Job, JobId, JobStatus, SortDirection, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by job repository adapters.
    pub enum JobRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "job repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "job repository query failed: {message}",
    }
}

/// Filters applied when listing jobs.
///
/// `owner` of `None` lists every user's jobs and is reserved for admins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListQuery {
    pub owner: Option<UserId>,
    pub status: Option<JobStatus>,
    pub sort: SortDirection,
    pub page: PageRequest,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persist a new job.
    async fn insert(&self, job: &Job) -> Result<(), JobRepositoryError>;

    /// Fetch a job by identifier.
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobRepositoryError>;

    /// Overwrite a stored job, reporting whether it still existed.
    async fn update(&self, job: &Job) -> Result<bool, JobRepositoryError>;

    /// Remove a job, reporting whether it existed.
    async fn delete(&self, id: &JobId) -> Result<bool, JobRepositoryError>;

    /// Remove every job owned by `owner`.
    async fn delete_for_owner(&self, owner: &UserId) -> Result<u64, JobRepositoryError>;

    /// One page of jobs ordered by applied date, plus the unpaged total.
    async fn list(&self, query: &JobListQuery) -> Result<Page<Job>, JobRepositoryError>;

    /// Job count per status. Statuses with no jobs may be absent.
    async fn status_counts(
        &self,
        owner: Option<UserId>,
    ) -> Result<BTreeMap<JobStatus, u64>, JobRepositoryError>;

    /// Up to `limit` of the owner's jobs, newest applied date first.
    async fn recent(&self, owner: &UserId, limit: usize) -> Result<Vec<Job>, JobRepositoryError>;

    /// The owner's jobs in `status`, most recently updated first.
    async fn with_status_by_update(
        &self,
        owner: &UserId,
        status: JobStatus,
    ) -> Result<Vec<Job>, JobRepositoryError>;
}
