//! User directory service.
//!
//! `UserDirectory` is what the dashboard talks to. It validates input, hashes
//! passwords, and delegates persistence to whichever [`UserStore`] was selected
//! at construction.

use std::sync::Arc;

use serde::Serialize;
use studio_common::{NewUser, Role, UserPatch, UserRecord};

use crate::config::DirectoryConfig;
use crate::error::{Error, Result};
use crate::password::PasswordHasher;
use crate::store::{open_store, RecordPatch, UserDraft, UserStore};

/// User counts shown on the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectoryStats {
    pub total_users: usize,
    pub active_users: usize,
    pub admins: usize,
    pub moderators: usize,
    pub users: usize,
}

pub struct UserDirectory {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Select the backend from configuration and build the directory.
    pub fn from_config(config: &DirectoryConfig) -> Result<Self> {
        let store = open_store(config)?;
        Ok(Self::new(store, PasswordHasher::new(config.password_cost)))
    }

    pub fn backend_kind(&self) -> &'static str {
        self.store.backend_kind()
    }

    pub async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let name = required("name", &user.name)?;
        let email = required("email", &user.email)?;
        if user.password.is_empty() {
            return Err(Error::InvalidInput("password is required".to_string()));
        }

        let password_hash = self.hash_password(user.password).await?;
        let draft = UserDraft {
            name,
            email,
            password_hash,
            role: user.role,
            status: user.status,
        };

        let record = self
            .store
            .insert(draft)
            .await
            .map_err(|e| logged("create user", e))?;

        tracing::info!("Created user {} ({}, {})", record.id, record.email, record.role);
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        self.store.list().await.map_err(|e| logged("list users", e))
    }

    pub async fn get(&self, id: &str) -> Result<UserRecord> {
        self.store
            .get(id)
            .await
            .map_err(|e| logged("load user", e))?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Merge the given fields into an existing user.
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<UserRecord> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let password_hash = match patch.password {
            Some(password) if password.is_empty() => {
                return Err(Error::InvalidInput("password must not be empty".to_string()))
            }
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let changes = RecordPatch {
            name: patch.name.as_deref().map(|n| required("name", n)).transpose()?,
            email: patch.email.as_deref().map(|e| required("email", e)).transpose()?,
            password_hash,
            role: patch.role,
            status: patch.status,
        };

        let record = self
            .store
            .update(id, &changes)
            .await
            .map_err(|e| logged("update user", e))?;

        tracing::info!("Updated user {}", record.id);
        Ok(record)
    }

    /// Remove a user. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| logged("delete user", e))?;

        tracing::info!("Deleted user {}", id);
        Ok(deleted)
    }

    /// Check a login. Unknown email, wrong password, and inactive accounts all
    /// fail with the same `InvalidCredentials` error.
    ///
    /// Emails are not unique in storage, so every account with the email is
    /// tried and the first active one whose password matches wins.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord> {
        let email = email.trim();
        let candidates: Vec<UserRecord> = self
            .list()
            .await?
            .into_iter()
            .filter(|u| u.email == email)
            .collect();

        if candidates.is_empty() {
            tracing::debug!("Login rejected: unknown email");
            return Err(Error::InvalidCredentials);
        }

        let hasher = self.hasher;
        let plain = password.to_string();
        let matched = tokio::task::spawn_blocking(move || {
            candidates
                .into_iter()
                .find(|u| u.is_active() && hasher.verify(&plain, &u.password_hash))
        })
        .await
        .map_err(|e| Error::PasswordHash(e.to_string()))?;

        matched.ok_or_else(|| {
            tracing::debug!("Login rejected for {}", email);
            Error::InvalidCredentials
        })
    }

    /// Create the given account as an admin if the directory is empty.
    pub async fn ensure_admin(&self, mut bootstrap: NewUser) -> Result<Option<UserRecord>> {
        if !self.list().await?.is_empty() {
            return Ok(None);
        }

        bootstrap.role = Role::Admin;
        let admin = self.create(bootstrap).await?;
        tracing::info!("Seeded bootstrap admin {}", admin.email);
        Ok(Some(admin))
    }

    pub async fn stats(&self) -> Result<DirectoryStats> {
        let users = self.list().await?;
        let count_role = |role: Role| users.iter().filter(|u| u.role == role).count();

        Ok(DirectoryStats {
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.is_active()).count(),
            admins: count_role(Role::Admin),
            moderators: count_role(Role::Moderator),
            users: count_role(Role::User),
        })
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| Error::PasswordHash(e.to_string()))?
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn logged(operation: &str, error: Error) -> Error {
    match &error {
        Error::NotFound(id) => tracing::warn!("Failed to {}: no user {}", operation, id),
        _ => tracing::error!("Failed to {}: {}", operation, error),
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use studio_common::UserStatus;

    fn directory() -> UserDirectory {
        let store = Arc::new(LocalStore::open(":memory:").unwrap());
        UserDirectory::new(store, PasswordHasher::new(crate::password::MIN_COST))
    }

    fn ana() -> NewUser {
        NewUser::new("Ana", "ana@x.com", "p1", Role::User, UserStatus::Active)
    }

    #[tokio::test]
    async fn test_scenario_create_update_delete() {
        let directory = directory();

        let created = directory.create(ana()).await.unwrap();
        let users = directory.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "ana@x.com");
        assert_eq!(users[0].role, Role::User);

        directory
            .update(&created.id, UserPatch::default().with_role(Role::Moderator))
            .await
            .unwrap();
        let users = directory.list().await.unwrap();
        assert_eq!(users[0].role, Role::Moderator);

        assert!(directory.delete(&created.id).await.unwrap());
        assert!(directory.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_stores_hash_not_password() {
        let directory = directory();
        let created = directory.create(ana()).await.unwrap();

        assert_ne!(created.password_hash, "p1");
        assert!(created.password_hash.starts_with("$2"));
        assert_eq!(created.created_at, created.last_seen_at);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let directory = directory();
        let mut user = ana();
        user.name = "   ".to_string();
        assert!(matches!(directory.create(user).await, Err(Error::InvalidInput(_))));

        let mut user = ana();
        user.password = String::new();
        assert!(matches!(directory.create(user).await, Err(Error::InvalidInput(_))));

        assert!(directory.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_keeps_other_fields() {
        let directory = directory();
        let created = directory.create(ana()).await.unwrap();

        let updated = directory
            .update(&created.id, UserPatch::default().with_status(UserStatus::Inactive))
            .await
            .unwrap();

        assert_eq!(updated.status, UserStatus::Inactive);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.role, created.role);
        assert_eq!(updated.password_hash, created.password_hash);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_user_fails() {
        let directory = directory();
        let err = directory
            .update("nope", UserPatch::default().with_status(UserStatus::Inactive))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = directory.update("nope", UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_twice_is_idempotent() {
        let directory = directory();
        let created = directory.create(ana()).await.unwrap();

        assert!(directory.delete(&created.id).await.unwrap());
        assert!(directory.delete(&created.id).await.unwrap());
        assert!(directory.list().await.unwrap().iter().all(|u| u.id != created.id));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let directory = directory();
        let created = directory.create(ana()).await.unwrap();

        let user = directory.authenticate("ana@x.com", "p1").await.unwrap();
        assert_eq!(user.id, created.id);

        assert!(matches!(
            directory.authenticate("ana@x.com", "wrong").await,
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            directory.authenticate("nobody@x.com", "p1").await,
            Err(Error::InvalidCredentials)
        ));

        directory
            .update(&created.id, UserPatch::default().with_status(UserStatus::Inactive))
            .await
            .unwrap();
        assert!(matches!(
            directory.authenticate("ana@x.com", "p1").await,
            Err(Error::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_tries_every_account_with_email() {
        let directory = directory();
        let first = directory.create(ana()).await.unwrap();
        let second = directory
            .create(NewUser::new("Ana B", "ana@x.com", "p2", Role::Moderator, UserStatus::Active))
            .await
            .unwrap();

        let user = directory.authenticate("ana@x.com", "p2").await.unwrap();
        assert_eq!(user.id, second.id);
        let user = directory.authenticate("ana@x.com", "p1").await.unwrap();
        assert_eq!(user.id, first.id);

        directory
            .update(&second.id, UserPatch::default().with_status(UserStatus::Inactive))
            .await
            .unwrap();
        assert!(matches!(
            directory.authenticate("ana@x.com", "p2").await,
            Err(Error::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_password_change_rehashes() {
        let directory = directory();
        let created = directory.create(ana()).await.unwrap();

        directory
            .update(&created.id, UserPatch::default().with_password("new-pass"))
            .await
            .unwrap();

        assert!(directory.authenticate("ana@x.com", "new-pass").await.is_ok());
        assert!(directory.authenticate("ana@x.com", "p1").await.is_err());
    }

    #[tokio::test]
    async fn test_ensure_admin_only_seeds_empty_directory() {
        let directory = directory();
        let bootstrap = NewUser::new("Admin", "admin@studio.com", "admin123", Role::User, UserStatus::Active);

        let seeded = directory.ensure_admin(bootstrap.clone()).await.unwrap().unwrap();
        assert_eq!(seeded.role, Role::Admin);

        assert!(directory.ensure_admin(bootstrap).await.unwrap().is_none());
        assert_eq!(directory.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stats() {
        let directory = directory();
        directory.create(ana()).await.unwrap();
        directory
            .create(NewUser::new("Carlos Silva", "carlos@x.com", "c", Role::Admin, UserStatus::Active))
            .await
            .unwrap();
        directory
            .create(NewUser::new("Bia", "bia@x.com", "b", Role::Moderator, UserStatus::Inactive))
            .await
            .unwrap();

        let stats = directory.stats().await.unwrap();
        assert_eq!(
            stats,
            DirectoryStats {
                total_users: 3,
                active_users: 2,
                admins: 1,
                moderators: 1,
                users: 1,
            }
        );
    }
}
