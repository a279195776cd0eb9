//! Admin-only user management and system statistics.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use super::account_service::{create_account, map_user_persistence_error};
use super::ports::{
    JobRepository, NotificationRepository, PasswordHasher, Registration, SystemStats,
    UserAdministration, UserRepository,
};
use super::{Caller, Error, Role, User, UserId};

/// Implements [`UserAdministration`].
#[derive(Clone)]
pub struct UserAdminService {
    users: Arc<dyn UserRepository>,
    jobs: Arc<dyn JobRepository>,
    notifications: Arc<dyn NotificationRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl UserAdminService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jobs: Arc<dyn JobRepository>,
        notifications: Arc<dyn NotificationRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            jobs,
            notifications,
            hasher,
            clock,
        }
    }
}

fn internal(context: &str, error: impl std::fmt::Display) -> Error {
    error!(%error, context, "user administration failure");
    Error::internal(format!("{context}: {error}"))
}

#[async_trait]
impl UserAdministration for UserAdminService {
    async fn list_users(&self, caller: &Caller) -> Result<Vec<User>, Error> {
        caller.authorize(Role::Admin)?;
        self.users.list().await.map_err(map_user_persistence_error)
    }

    async fn create_admin(
        &self,
        caller: &Caller,
        registration: Registration,
    ) -> Result<User, Error> {
        caller.authorize(Role::Admin)?;
        create_account(
            &self.users,
            &self.hasher,
            &self.clock,
            registration,
            Role::Admin,
        )
        .await
    }

    async fn update_role(&self, caller: &Caller, id: &UserId, role: Role) -> Result<User, Error> {
        caller.authorize(Role::Admin)?;
        if caller.user_id == *id && role != Role::Admin {
            return Err(Error::invalid_request("Admins cannot demote themselves"));
        }
        let user = self
            .users
            .update_role(id, role)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        info!(user_id = %user.id, %role, by = %caller.user_id, "role changed");
        Ok(user)
    }

    async fn delete_user(&self, caller: &Caller, id: &UserId) -> Result<(), Error> {
        caller.authorize(Role::Admin)?;
        if caller.user_id == *id {
            return Err(Error::invalid_request("Admins cannot delete themselves"));
        }
        if self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .is_none()
        {
            return Err(Error::not_found("User not found"));
        }

        let notifications = self
            .notifications
            .delete_for_user(id)
            .await
            .map_err(|error| internal("notification cleanup failed", error))?;
        let jobs = self
            .jobs
            .delete_for_owner(id)
            .await
            .map_err(|error| internal("job cleanup failed", error))?;
        self.users
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %id, jobs, notifications, by = %caller.user_id, "user deleted");
        Ok(())
    }

    async fn stats(&self, caller: &Caller) -> Result<SystemStats, Error> {
        caller.authorize(Role::Admin)?;
        let total_users = self
            .users
            .count(None)
            .await
            .map_err(map_user_persistence_error)?;
        let total_admins = self
            .users
            .count(Some(Role::Admin))
            .await
            .map_err(map_user_persistence_error)?;
        let status_counts = self
            .jobs
            .status_counts(None)
            .await
            .map_err(|error| internal("job statistics failed", error))?;
        Ok(SystemStats {
            total_users,
            total_admins,
            total_jobs: status_counts.values().sum(),
            status_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{JobCommand, MockPasswordHasher, NoOpNotificationPublisher};
    use crate::domain::{
        EmailAddress, ErrorCode, JobDraft, JobService, JobStatus, NotificationEmitter, Password,
        UserAccount, UserName,
    };
    use crate::outbound::memory::{
        MemoryJobRepository, MemoryNotificationRepository, MemoryUserRepository,
    };
    use crate::test_support::{FixtureClock, utc_date};
    use rstest::{fixture, rstest};

    struct Harness {
        admin: UserAdminService,
        jobs: JobService,
        users: Arc<MemoryUserRepository>,
        notifications: Arc<MemoryNotificationRepository>,
    }

    #[fixture]
    fn harness() -> Harness {
        let clock: Arc<dyn Clock> = Arc::new(FixtureClock::at(utc_date(2024, 4, 1)));
        let users = Arc::new(MemoryUserRepository::default());
        let jobs = Arc::new(MemoryJobRepository::default());
        let notifications = Arc::new(MemoryNotificationRepository::default());
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|_| Ok("hashed".to_owned()));
        let emitter = NotificationEmitter::new(
            notifications.clone(),
            Arc::new(NoOpNotificationPublisher),
            clock.clone(),
        );
        Harness {
            admin: UserAdminService::new(
                users.clone(),
                jobs.clone(),
                notifications.clone(),
                Arc::new(hasher),
                clock.clone(),
            ),
            jobs: JobService::new(jobs, notifications.clone(), emitter, clock),
            users,
            notifications,
        }
    }

    async fn seed_user(users: &MemoryUserRepository, email: &str, role: Role) -> Caller {
        let user = User {
            id: UserId::random(),
            name: UserName::new("Seed").expect("valid name"),
            email: EmailAddress::new(email).expect("valid email"),
            role,
            created_at: utc_date(2024, 1, 1),
        };
        users
            .insert(&UserAccount {
                user: user.clone(),
                password_hash: "hashed".to_owned(),
            })
            .await
            .expect("insert");
        Caller::from_user(&user)
    }

    fn registration(email: &str) -> Registration {
        Registration {
            name: UserName::new("New Admin").expect("valid name"),
            email: EmailAddress::new(email).expect("valid email"),
            password: Password::new("secret123".to_owned()).expect("valid password"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn applicants_are_forbidden(harness: Harness) {
        let applicant = seed_user(&harness.users, "a@example.com", Role::Applicant).await;
        let error = harness
            .admin
            .list_users(&applicant)
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(
            error.message(),
            "User role applicant is not authorized to access this route"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn create_admin_rejects_duplicates(harness: Harness) {
        let admin = seed_user(&harness.users, "root@example.com", Role::Admin).await;
        let created = harness
            .admin
            .create_admin(&admin, registration("ops@example.com"))
            .await
            .expect("create");
        assert_eq!(created.role, Role::Admin);
        let error = harness
            .admin
            .create_admin(&admin, registration("ops@example.com"))
            .await
            .expect_err("duplicate");
        assert_eq!(error.message(), "User already exists");
    }

    #[rstest]
    #[tokio::test]
    async fn admins_cannot_demote_or_delete_themselves(harness: Harness) {
        let admin = seed_user(&harness.users, "root@example.com", Role::Admin).await;
        let demote = harness
            .admin
            .update_role(&admin, &admin.user_id, Role::Applicant)
            .await
            .expect_err("self demotion");
        assert_eq!(demote.code(), ErrorCode::InvalidRequest);
        let delete = harness
            .admin
            .delete_user(&admin, &admin.user_id)
            .await
            .expect_err("self deletion");
        assert_eq!(delete.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_user_cascades(harness: Harness) {
        let admin = seed_user(&harness.users, "root@example.com", Role::Admin).await;
        let applicant = seed_user(&harness.users, "a@example.com", Role::Applicant).await;
        harness
            .jobs
            .create(
                &applicant,
                JobDraft {
                    company: "Acme".to_owned(),
                    title: "Engineer".to_owned(),
                    applied_date: Some(utc_date(2024, 1, 5)),
                    ..JobDraft::default()
                },
            )
            .await
            .expect("create job");

        harness
            .admin
            .delete_user(&admin, &applicant.user_id)
            .await
            .expect("delete");
        assert!(
            harness
                .users
                .find_by_id(&applicant.user_id)
                .await
                .expect("find")
                .is_none()
        );
        assert!(
            harness
                .notifications
                .list_for_user(&applicant.user_id)
                .await
                .expect("list")
                .is_empty()
        );
        let stats = harness.admin.stats(&admin).await.expect("stats");
        assert_eq!(stats.total_jobs, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn stats_cover_every_user(harness: Harness) {
        let admin = seed_user(&harness.users, "root@example.com", Role::Admin).await;
        for email in ["a@example.com", "b@example.com"] {
            let applicant = seed_user(&harness.users, email, Role::Applicant).await;
            harness
                .jobs
                .create(
                    &applicant,
                    JobDraft {
                        company: "Acme".to_owned(),
                        title: "Engineer".to_owned(),
                        applied_date: Some(utc_date(2024, 1, 5)),
                        ..JobDraft::default()
                    },
                )
                .await
                .expect("create job");
        }
        let promoted = seed_user(&harness.users, "c@example.com", Role::Applicant).await;
        harness
            .admin
            .update_role(&admin, &promoted.user_id, Role::Admin)
            .await
            .expect("promote");

        let stats = harness.admin.stats(&admin).await.expect("stats");
        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.total_admins, 2);
        assert_eq!(stats.total_jobs, 2);
        assert_eq!(stats.status_counts.get(&JobStatus::Applied), Some(&2));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_users_are_not_found(harness: Harness) {
        let admin = seed_user(&harness.users, "root@example.com", Role::Admin).await;
        let error = harness
            .admin
            .update_role(&admin, &UserId::random(), Role::Admin)
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
