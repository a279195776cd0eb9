use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{ProfileUpdate, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Role, User, UserAccount, UserId};

use super::lock;

/// Account store keyed by id. Email uniqueness is checked on every write.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    accounts: Mutex<HashMap<UserId, UserAccount>>,
}

fn email_taken(
    accounts: &HashMap<UserId, UserAccount>,
    email: &EmailAddress,
    except: Option<&UserId>,
) -> bool {
    accounts
        .values()
        .any(|account| account.user.email == *email && Some(&account.user.id) != except)
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut guard = lock(&self.accounts, "user", UserPersistenceError::query)?;
        if email_taken(&guard, &account.user.email, None) {
            return Err(UserPersistenceError::duplicate_email(
                account.user.email.as_str(),
            ));
        }
        guard.insert(account.user.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let guard = lock(&self.accounts, "user", UserPersistenceError::query)?;
        Ok(guard.get(id).map(|account| account.user.clone()))
    }

    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let guard = lock(&self.accounts, "user", UserPersistenceError::query)?;
        Ok(guard
            .values()
            .find(|account| account.user.email == *email)
            .cloned())
    }

    async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut guard = lock(&self.accounts, "user", UserPersistenceError::query)?;
        if email_taken(&guard, &update.email, Some(&update.id)) {
            return Err(UserPersistenceError::duplicate_email(update.email.as_str()));
        }
        Ok(guard.get_mut(&update.id).map(|account| {
            account.user.name = update.name.clone();
            account.user.email = update.email.clone();
            if let Some(hash) = &update.password_hash {
                account.password_hash = hash.clone();
            }
            account.user.clone()
        }))
    }

    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut guard = lock(&self.accounts, "user", UserPersistenceError::query)?;
        Ok(guard.get_mut(id).map(|account| {
            account.user.role = role;
            account.user.clone()
        }))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut guard = lock(&self.accounts, "user", UserPersistenceError::query)?;
        Ok(guard.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let guard = lock(&self.accounts, "user", UserPersistenceError::query)?;
        let mut users: Vec<_> = guard.values().map(|account| account.user.clone()).collect();
        users.sort_by(|left, right| left.created_at.cmp(&right.created_at));
        Ok(users)
    }

    async fn count(&self, role: Option<Role>) -> Result<u64, UserPersistenceError> {
        let guard = lock(&self.accounts, "user", UserPersistenceError::query)?;
        Ok(guard
            .values()
            .filter(|account| role.is_none_or(|role| account.user.role == role))
            .count() as u64)
    }
}
