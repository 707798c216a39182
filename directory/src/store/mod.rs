//! User store abstraction layer.
//!
//! This module defines the `UserStore` trait that abstracts the two persistence
//! backends (remote record store, local SQLite slot) behind a common interface.
//! Callers never learn which one is active.

mod local;
mod remote;

pub use local::{LocalStore, USERS_SLOT_KEY};
pub use remote::RemoteStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use studio_common::{Role, UserRecord, UserStatus};

use crate::config::{DirectoryConfig, StoreSelection};
use crate::error::Result;

/// A user ready to be persisted. The password is already hashed.
#[derive(Debug, Clone, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
}

/// Column changes for an update. Serialized as-is for the remote PATCH body,
/// so absent fields are skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.status.is_none()
    }

    /// Merge the changed columns into a record. `id` and `created_at` are
    /// never touched.
    pub fn apply_to(&self, record: &mut UserRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(hash) = &self.password_hash {
            record.password_hash = hash.clone();
        }
        if let Some(role) = self.role {
            record.role = role;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}

/// Persistence backend for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Short name of the backend ("remote", "local").
    fn backend_kind(&self) -> &'static str;

    /// Persist a new record; the store assigns id and timestamps.
    async fn insert(&self, draft: UserDraft) -> Result<UserRecord>;

    /// All records. Empty store yields an empty vec.
    async fn list(&self) -> Result<Vec<UserRecord>>;

    async fn get(&self, id: &str) -> Result<Option<UserRecord>>;

    /// Merge `patch` into the record. Fails with `NotFound` if `id` is missing.
    async fn update(&self, id: &str, patch: &RecordPatch) -> Result<UserRecord>;

    /// Remove the record. Deleting a missing id is not an error.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Build the store selected by the configuration.
pub fn open_store(config: &DirectoryConfig) -> Result<Arc<dyn UserStore>> {
    match config.selection() {
        StoreSelection::Remote {
            base_url,
            api_key,
            timeout,
        } => {
            tracing::info!("Using remote user store at {}", base_url);
            Ok(Arc::new(RemoteStore::new(&base_url, &api_key, timeout)?))
        }
        StoreSelection::Local { path } => {
            tracing::info!("Using local user store at {}", path);
            Ok(Arc::new(LocalStore::open(&path)?))
        }
    }
}
