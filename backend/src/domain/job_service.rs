//! Job use-cases: ownership checks, listing and status-change notifications.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use serde_json::json;
use tracing::{error, info, warn};

use super::ports::{
    DASHBOARD_RECENT_JOBS, DashboardSummary, JobCommand, JobFilter, JobListQuery, JobQuery,
    JobRepository, JobRepositoryError, NotificationRepository,
};
use super::{
    Caller, Error, Job, JobDraft, JobId, JobPatch, JobStatus, JobValidationError,
    NewNotification, NotificationEmitter,
};

fn map_repository_error(error: JobRepositoryError) -> Error {
    error!(%error, "job repository failure");
    Error::internal(format!("job repository error: {error}"))
}

fn map_job_validation_error(error: JobValidationError) -> Error {
    let field = error.field();
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_job",
    }))
}

/// Which mutation an ownership check guards; selects the 403 message.
#[derive(Debug, Clone, Copy)]
enum JobAccess {
    View,
    Update,
    Delete,
}

impl JobAccess {
    const fn verb(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Implements [`JobCommand`] and [`JobQuery`].
#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    notifications: Arc<dyn NotificationRepository>,
    emitter: NotificationEmitter,
    clock: Arc<dyn Clock>,
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        notifications: Arc<dyn NotificationRepository>,
        emitter: NotificationEmitter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            jobs,
            notifications,
            emitter,
            clock,
        }
    }

    async fn load_accessible(
        &self,
        caller: &Caller,
        id: &JobId,
        access: JobAccess,
    ) -> Result<Job, Error> {
        let job = self
            .jobs
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Job not found"))?;
        if !caller.can_access(&job.owner) {
            return Err(Error::forbidden(format!(
                "Not authorized to {} this job",
                access.verb()
            )));
        }
        Ok(job)
    }

    /// Emit without failing the surrounding mutation.
    async fn emit_quietly(&self, notification: NewNotification) {
        let kind = notification.kind;
        if let Err(error) = self.emitter.emit(notification).await {
            warn!(%error, %kind, "notification could not be recorded");
        }
    }
}

#[async_trait]
impl JobCommand for JobService {
    async fn create(&self, caller: &Caller, draft: JobDraft) -> Result<Job, Error> {
        let job = Job::create(JobId::random(), caller.user_id, draft, self.clock.utc())
            .map_err(map_job_validation_error)?;
        self.jobs.insert(&job).await.map_err(map_repository_error)?;
        info!(job_id = %job.id, user_id = %job.owner, "job created");

        self.emit_quietly(NewNotification::job_added(&job)).await;
        Ok(job)
    }

    async fn update(&self, caller: &Caller, id: &JobId, patch: JobPatch) -> Result<Job, Error> {
        let stored = self.load_accessible(caller, id, JobAccess::Update).await?;
        let (updated, transition) = stored
            .apply(patch, self.clock.utc())
            .map_err(map_job_validation_error)?;
        let still_stored = self
            .jobs
            .update(&updated)
            .await
            .map_err(map_repository_error)?;
        if !still_stored {
            // Deleted since it was loaded.
            return Err(Error::not_found("Job not found"));
        }

        if let Some(transition) = transition {
            info!(
                job_id = %updated.id,
                from = %transition.from,
                to = %transition.to,
                "job status changed"
            );
            self.emit_quietly(NewNotification::status_changed(&updated, transition))
                .await;
        }
        Ok(updated)
    }

    async fn delete(&self, caller: &Caller, id: &JobId) -> Result<(), Error> {
        let job = self.load_accessible(caller, id, JobAccess::Delete).await?;
        self.jobs.delete(&job.id).await.map_err(map_repository_error)?;
        let removed = self
            .notifications
            .delete_for_job(&job.id)
            .await
            .map_err(|error| {
                error!(%error, job_id = %job.id, "job notifications not removed");
                Error::internal(format!("notification repository error: {error}"))
            })?;
        info!(job_id = %job.id, notifications = removed, "job deleted");
        Ok(())
    }
}

#[async_trait]
impl JobQuery for JobService {
    async fn list(&self, caller: &Caller, filter: JobFilter) -> Result<Page<Job>, Error> {
        let query = JobListQuery {
            owner: (!caller.is_admin()).then_some(caller.user_id),
            status: filter.status,
            sort: filter.sort,
            page: filter.page,
        };
        self.jobs.list(&query).await.map_err(map_repository_error)
    }

    async fn get(&self, caller: &Caller, id: &JobId) -> Result<Job, Error> {
        self.load_accessible(caller, id, JobAccess::View).await
    }

    async fn dashboard(&self, caller: &Caller) -> Result<DashboardSummary, Error> {
        let owner = caller.user_id;
        let status_counts = self
            .jobs
            .status_counts(Some(owner))
            .await
            .map_err(map_repository_error)?;
        let recent_jobs = self
            .jobs
            .recent(&owner, DASHBOARD_RECENT_JOBS)
            .await
            .map_err(map_repository_error)?;
        let upcoming_interviews = self
            .jobs
            .with_status_by_update(&owner, JobStatus::Interview)
            .await
            .map_err(map_repository_error)?;
        Ok(DashboardSummary {
            total_jobs: status_counts.values().sum(),
            status_counts,
            recent_jobs,
            upcoming_interviews,
        })
    }
}

#[cfg(test)]
#[path = "job_service_tests.rs"]
mod tests;
