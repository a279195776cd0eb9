//! PostgreSQL-backed `JobRepository` implementation using Diesel ORM.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::ports::{JobListQuery, JobRepository, JobRepositoryError};
use crate::domain::{Job, JobDetails, JobId, JobStatus, SortDirection, UserId};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::JobRow;
use super::pool::{DbPool, PoolError};
use super::schema::jobs;

/// Diesel-backed implementation of the job repository port.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> JobRepositoryError {
    JobRepositoryError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> JobRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => JobRepositoryError::connection(message),
        DieselFailure::Query(message) => JobRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => JobRepositoryError::query("job already exists"),
    }
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn parse_status(raw: &str) -> Result<JobStatus, JobRepositoryError> {
    raw.parse::<JobStatus>()
        .map_err(|_| JobRepositoryError::query(format!("unknown stored job status: {raw}")))
}

fn row_to_job(row: JobRow) -> Result<Job, JobRepositoryError> {
    let JobRow {
        id,
        user_id,
        company,
        title,
        status,
        applied_date,
        location,
        notes,
        contact_name,
        contact_email,
        contact_phone,
        salary,
        link,
        created_at,
        updated_at,
    } = row;
    let details = JobDetails {
        location,
        notes,
        contact_name,
        contact_email,
        contact_phone,
        salary,
        link,
    }
    .normalised()
    .map_err(|err| JobRepositoryError::query(format!("stored job {id} is invalid: {err}")))?;
    Ok(Job {
        id: JobId::from_uuid(id),
        owner: UserId::from_uuid(user_id),
        company,
        title,
        status: parse_status(&status)?,
        applied_date,
        details,
        created_at,
        updated_at,
    })
}

fn job_to_row(job: &Job) -> JobRow {
    let details = job.details.clone();
    JobRow {
        id: *job.id.as_uuid(),
        user_id: *job.owner.as_uuid(),
        company: job.company.clone(),
        title: job.title.clone(),
        status: job.status.as_str().to_owned(),
        applied_date: job.applied_date,
        location: details.location,
        notes: details.notes,
        contact_name: details.contact_name,
        contact_email: details.contact_email,
        contact_phone: details.contact_phone,
        salary: details.salary,
        link: details.link,
        created_at: job.created_at,
        updated_at: job.updated_at,
    }
}

/// Owner and status filters shared by the page and total queries.
fn filtered(owner: Option<UserId>, status: Option<JobStatus>) -> jobs::BoxedQuery<'static, Pg> {
    let mut query = jobs::table.into_boxed();
    if let Some(owner) = owner {
        query = query.filter(jobs::user_id.eq(*owner.as_uuid()));
    }
    if let Some(status) = status {
        query = query.filter(jobs::status.eq(status.as_str()));
    }
    query
}

fn load_rows(rows: Vec<JobRow>) -> Result<Vec<Job>, JobRepositoryError> {
    rows.into_iter().map(row_to_job).collect()
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn insert(&self, job: &Job) -> Result<(), JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(jobs::table)
            .values(&job_to_row(job))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<JobRow> = jobs::table
            .filter(jobs::id.eq(id.as_uuid()))
            .select(JobRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_job).transpose()
    }

    async fn update(&self, job: &Job) -> Result<bool, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(jobs::table.filter(jobs::id.eq(job.id.as_uuid())))
            .set(&job_to_row(job))
            .execute(&mut conn)
            .await
            .map(|updated| updated > 0)
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &JobId) -> Result<bool, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(jobs::table.filter(jobs::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }

    async fn delete_for_owner(&self, owner: &UserId) -> Result<u64, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(jobs::table.filter(jobs::user_id.eq(owner.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|deleted| u64::try_from(deleted).unwrap_or(u64::MAX))
            .map_err(map_diesel_error)
    }

    async fn list(&self, query: &JobListQuery) -> Result<Page<Job>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(query.owner, query.status)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ordered = match query.sort {
            SortDirection::Ascending => filtered(query.owner, query.status)
                .order((jobs::applied_date.asc(), jobs::created_at.asc())),
            SortDirection::Descending => filtered(query.owner, query.status)
                .order((jobs::applied_date.desc(), jobs::created_at.desc())),
        };
        let rows: Vec<JobRow> = ordered
            .limit(i64::from(query.page.limit()))
            .offset(to_i64(query.page.offset()))
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Page::new(load_rows(rows)?, to_u64(total), query.page))
    }

    async fn status_counts(
        &self,
        owner: Option<UserId>,
    ) -> Result<BTreeMap<JobStatus, u64>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let grouped: Vec<(String, i64)> = match owner {
            Some(owner) => {
                jobs::table
                    .filter(jobs::user_id.eq(*owner.as_uuid()))
                    .group_by(jobs::status)
                    .select((jobs::status, count_star()))
                    .load(&mut conn)
                    .await
            }
            None => {
                jobs::table
                    .group_by(jobs::status)
                    .select((jobs::status, count_star()))
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        grouped
            .into_iter()
            .map(|(status, total)| Ok((parse_status(&status)?, to_u64(total))))
            .collect()
    }

    async fn recent(&self, owner: &UserId, limit: usize) -> Result<Vec<Job>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JobRow> = filtered(Some(*owner), None)
            .order((jobs::applied_date.desc(), jobs::created_at.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_rows(rows)
    }

    async fn with_status_by_update(
        &self,
        owner: &UserId,
        status: JobStatus,
    ) -> Result<Vec<Job>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JobRow> = filtered(Some(*owner), Some(status))
            .order(jobs::updated_at.desc())
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_rows(rows)
    }
}
