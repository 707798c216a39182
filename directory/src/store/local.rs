use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use studio_common::UserRecord;

use super::{RecordPatch, UserDraft, UserStore};
use crate::error::{Error, Result};

/// Key of the single slot holding the whole user collection.
pub const USERS_SLOT_KEY: &str = "studio_users_db";

/// Local fallback store.
///
/// SQLite is used as a plain key-value store: the full record collection is
/// kept as one JSON array under [`USERS_SLOT_KEY`] and rewritten on every
/// mutation.
///
/// The read-modify-write cycle is serialized within this process by the
/// connection mutex, but not across processes. Two processes sharing one
/// database file can lose updates; the dashboard has a single writer.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    pub fn open(database_url: &str) -> Result<Self> {
        // Parse sqlite: prefix if present
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
            }
            Connection::open(path)?
        };

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        tracing::info!("Local user store initialized with database: {}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| Error::Storage(e.to_string()))
    }

    /// Raw JSON currently stored in the slot, if any.
    pub fn raw_slot(&self) -> Result<Option<String>> {
        let conn = self.lock()?;
        read_slot(&conn)
    }
}

fn read_slot(conn: &Connection) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![USERS_SLOT_KEY],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

fn load_all(conn: &Connection) -> Result<Vec<UserRecord>> {
    match read_slot(conn)? {
        Some(json) => serde_json::from_str(&json).map_err(|e| {
            tracing::error!("Stored user collection is corrupt: {}", e);
            Error::Serialization(e.to_string())
        }),
        None => Ok(Vec::new()),
    }
}

fn save_all(conn: &Connection, users: &[UserRecord]) -> Result<()> {
    let json = serde_json::to_string(users)?;
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![USERS_SLOT_KEY, json],
    )?;
    tracing::debug!("Saved {} users to local slot", users.len());
    Ok(())
}

#[async_trait]
impl UserStore for LocalStore {
    fn backend_kind(&self) -> &'static str {
        "local"
    }

    async fn insert(&self, draft: UserDraft) -> Result<UserRecord> {
        let conn = self.lock()?;
        let now = Utc::now();

        let record = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            email: draft.email,
            password_hash: draft.password_hash,
            role: draft.role,
            status: draft.status,
            created_at: now,
            last_seen_at: now,
        };

        let mut users = load_all(&conn)?;
        users.push(record.clone());
        save_all(&conn, &users)?;

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let conn = self.lock()?;
        load_all(&conn)
    }

    async fn get(&self, id: &str) -> Result<Option<UserRecord>> {
        let conn = self.lock()?;
        Ok(load_all(&conn)?.into_iter().find(|u| u.id == id))
    }

    async fn update(&self, id: &str, patch: &RecordPatch) -> Result<UserRecord> {
        let conn = self.lock()?;
        let mut users = load_all(&conn)?;

        let record = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        patch.apply_to(record);
        let updated = record.clone();

        save_all(&conn, &users)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let mut users = load_all(&conn)?;

        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            tracing::debug!("Delete of unknown user {} is a no-op", id);
        }

        save_all(&conn, &users)?;
        Ok(true)
    }
}
