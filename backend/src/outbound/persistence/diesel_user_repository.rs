//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileUpdate, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Role, User, UserAccount, UserId, UserName, UserValidationError};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_message(error))
}

/// Map Diesel errors, reporting unique violations against `email`.
fn map_write_error(error: diesel::result::Error, email: &EmailAddress) -> UserPersistenceError {
    map_write_failure(classify(error), email)
}

fn map_write_failure(failure: DieselFailure, email: &EmailAddress) -> UserPersistenceError {
    match failure {
        DieselFailure::UniqueViolation { .. } => UserPersistenceError::duplicate_email(email.as_str()),
        failure => map_failure(failure),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_failure(classify(error))
}

fn map_failure(failure: DieselFailure) -> UserPersistenceError {
    match failure {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation { constraint } => UserPersistenceError::query(format!(
            "unique constraint violated: {}",
            constraint.as_deref().unwrap_or("unknown")
        )),
    }
}

/// Convert a database row into a validated account.
fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let UserRow {
        id,
        name,
        email,
        password_hash,
        role,
        created_at,
    } = row;
    let invalid = |err: UserValidationError| {
        UserPersistenceError::query(format!("stored user {id} is invalid: {err}"))
    };
    Ok(UserAccount {
        user: User {
            id: UserId::from_uuid(id),
            name: UserName::new(name).map_err(invalid)?,
            email: EmailAddress::new(email).map_err(invalid)?,
            role: role.parse::<Role>().map_err(invalid)?,
            created_at,
        },
        password_hash,
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row_to_account(row).map(|account| account.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = &account.user;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            name: user.name.as_str(),
            email: user.email.as_str(),
            password_hash: &account.password_hash,
            role: user.role.as_str(),
            created_at: user.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, &user.email))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileUpdate {
            name: update.name.as_str(),
            email: update.email.as_str(),
            password_hash: update.password_hash.as_deref(),
        };
        let row: Option<UserRow> = diesel::update(users::table.filter(users::id.eq(update.id.as_uuid())))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, &update.email))?;
        row.map(row_to_user).transpose()
    }

    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(users::role.eq(role.as_str()))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn count(&self, role: Option<Role>) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = users::table.into_boxed();
        if let Some(role) = role {
            query = query.filter(users::role.eq(role.as_str()));
        }
        let total: i64 = query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
