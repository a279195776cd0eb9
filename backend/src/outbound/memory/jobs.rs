use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use pagination::Page;

use crate::domain::ports::{JobListQuery, JobRepository, JobRepositoryError};
use crate::domain::{Job, JobId, JobStatus, SortDirection, UserId};

use super::lock;

/// Job store keyed by id.
#[derive(Debug, Default)]
pub struct MemoryJobRepository {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl MemoryJobRepository {
    fn snapshot<F>(&self, keep: F) -> Result<Vec<Job>, JobRepositoryError>
    where
        F: Fn(&Job) -> bool,
    {
        let guard = lock(&self.jobs, "job", JobRepositoryError::query)?;
        Ok(guard.values().filter(|job| keep(job)).cloned().collect())
    }
}

fn by_applied_date(jobs: &mut [Job], sort: SortDirection) {
    jobs.sort_by(|left, right| {
        let ordering = left
            .applied_date
            .cmp(&right.applied_date)
            .then_with(|| left.created_at.cmp(&right.created_at));
        match sort {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn insert(&self, job: &Job) -> Result<(), JobRepositoryError> {
        let mut guard = lock(&self.jobs, "job", JobRepositoryError::query)?;
        guard.insert(job.id, job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobRepositoryError> {
        let guard = lock(&self.jobs, "job", JobRepositoryError::query)?;
        Ok(guard.get(id).cloned())
    }

    async fn update(&self, job: &Job) -> Result<bool, JobRepositoryError> {
        let mut guard = lock(&self.jobs, "job", JobRepositoryError::query)?;
        let Some(slot) = guard.get_mut(&job.id) else {
            return Ok(false);
        };
        *slot = job.clone();
        Ok(true)
    }

    async fn delete(&self, id: &JobId) -> Result<bool, JobRepositoryError> {
        let mut guard = lock(&self.jobs, "job", JobRepositoryError::query)?;
        Ok(guard.remove(id).is_some())
    }

    async fn delete_for_owner(&self, owner: &UserId) -> Result<u64, JobRepositoryError> {
        let mut guard = lock(&self.jobs, "job", JobRepositoryError::query)?;
        let before = guard.len();
        guard.retain(|_, job| job.owner != *owner);
        Ok((before - guard.len()) as u64)
    }

    async fn list(&self, query: &JobListQuery) -> Result<Page<Job>, JobRepositoryError> {
        let mut matching = self.snapshot(|job| {
            query.owner.is_none_or(|owner| job.owner == owner)
                && query.status.is_none_or(|status| job.status == status)
        })?;
        by_applied_date(&mut matching, query.sort);
        let total = matching.len() as u64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(query.page.limit() as usize)
            .collect();
        Ok(Page::new(items, total, query.page))
    }

    async fn status_counts(
        &self,
        owner: Option<UserId>,
    ) -> Result<BTreeMap<JobStatus, u64>, JobRepositoryError> {
        let jobs = self.snapshot(|job| owner.is_none_or(|owner| job.owner == owner))?;
        let mut counts = BTreeMap::new();
        for job in jobs {
            *counts.entry(job.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn recent(&self, owner: &UserId, limit: usize) -> Result<Vec<Job>, JobRepositoryError> {
        let mut jobs = self.snapshot(|job| job.owner == *owner)?;
        by_applied_date(&mut jobs, SortDirection::Descending);
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn with_status_by_update(
        &self,
        owner: &UserId,
        status: JobStatus,
    ) -> Result<Vec<Job>, JobRepositoryError> {
        let mut jobs = self.snapshot(|job| job.owner == *owner && job.status == status)?;
        jobs.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        Ok(jobs)
    }
}
