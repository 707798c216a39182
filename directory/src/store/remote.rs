//! Remote record store backend (PostgREST-style table API).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use studio_common::{Role, UserRecord, UserStatus};

use super::{RecordPatch, UserDraft, UserStore};
use crate::error::{Error, Result};

const USERS_TABLE: &str = "users";

/// Remote user store.
///
/// Maps each operation onto exactly one insert/select/update/delete call
/// against the `users` table. Requests are bounded by a timeout and never
/// retried.
pub struct RemoteStore {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Backend(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, USERS_TABLE)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Backend(format!("request timed out: {}", e))
            } else {
                Error::Backend(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("{}: {}", status, body)));
        }

        Ok(response)
    }

    async fn rows(&self, response: Response) -> Result<Vec<UserRecord>> {
        let rows: Vec<RemoteRow> = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(rows.into_iter().map(UserRecord::from).collect())
    }
}

// ============================================================================
// Remote row format
// ============================================================================

/// Row ids come back as text (uuid columns) or numbers (serial columns).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowId::Text(s) => write!(f, "{}", s),
            RowId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteRow {
    id: RowId,
    name: String,
    email: String,
    password_hash: String,
    role: Role,
    status: UserStatus,
    created_at: DateTime<Utc>,
    #[serde(default)]
    last_seen: Option<DateTime<Utc>>,
}

impl From<RemoteRow> for UserRecord {
    fn from(row: RemoteRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            status: row.status,
            created_at: row.created_at,
            last_seen_at: row.last_seen.unwrap_or(row.created_at),
        }
    }
}

// ============================================================================
// UserStore implementation
// ============================================================================

#[async_trait]
impl UserStore for RemoteStore {
    fn backend_kind(&self) -> &'static str {
        "remote"
    }

    async fn insert(&self, draft: UserDraft) -> Result<UserRecord> {
        tracing::debug!("Inserting user {} into remote store", draft.email);

        let request = self
            .http_client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&[&draft]);

        let response = self.send(request).await?;
        self.rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Backend("insert returned no rows".to_string()))
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let request = self
            .http_client
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let response = self.send(request).await?;
        self.rows(response).await
    }

    async fn get(&self, id: &str) -> Result<Option<UserRecord>> {
        let filter = format!("eq.{}", id);
        let request = self
            .http_client
            .get(self.table_url())
            .query(&[("select", "*"), ("id", filter.as_str())]);

        let response = self.send(request).await?;
        Ok(self.rows(response).await?.into_iter().next())
    }

    async fn update(&self, id: &str, patch: &RecordPatch) -> Result<UserRecord> {
        let filter = format!("eq.{}", id);
        let request = self
            .http_client
            .patch(self.table_url())
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation")
            .json(patch);

        let response = self.send(request).await?;
        self.rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let filter = format!("eq.{}", id);
        let request = self
            .http_client
            .delete(self.table_url())
            .query(&[("id", filter.as_str())]);

        self.send(request).await?;
        Ok(true)
    }
}
