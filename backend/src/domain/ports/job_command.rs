//! Driving port for job mutations.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Job, JobDraft, JobId, JobPatch};

/// Domain use-case port for creating, updating and deleting jobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobCommand: Send + Sync {
    /// Record a new application owned by the caller.
    async fn create(&self, caller: &Caller, draft: JobDraft) -> Result<Job, Error>;

    /// Apply a partial update. Owners and admins only.
    async fn update(&self, caller: &Caller, id: &JobId, patch: JobPatch) -> Result<Job, Error>;

    /// Delete a job and its notifications. Owners and admins only.
    async fn delete(&self, caller: &Caller, id: &JobId) -> Result<(), Error>;
}
