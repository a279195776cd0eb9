//! Driving port for job reads and the dashboard summary.

use std::collections::BTreeMap;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Caller, Error, Job, JobId, JobStatus, SortDirection};

/// Number of jobs listed under `recentJobs`.
pub const DASHBOARD_RECENT_JOBS: usize = 5;

/// Listing options accepted from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub sort: SortDirection,
    pub page: PageRequest,
}

/// Aggregate view over the caller's own jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_jobs: u64,
    /// Count per status; statuses with no jobs are absent.
    pub status_counts: BTreeMap<JobStatus, u64>,
    pub recent_jobs: Vec<Job>,
    pub upcoming_interviews: Vec<Job>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobQuery: Send + Sync {
    /// Page through the caller's jobs, or everyone's for admins.
    async fn list(&self, caller: &Caller, filter: JobFilter) -> Result<Page<Job>, Error>;

    /// Fetch one job. Owners and admins only.
    async fn get(&self, caller: &Caller, id: &JobId) -> Result<Job, Error>;

    /// Summarise the caller's own jobs.
    async fn dashboard(&self, caller: &Caller) -> Result<DashboardSummary, Error>;
}
