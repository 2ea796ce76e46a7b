//! Host profile, credential and event-type persistence

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use goca_core::{EventTypeStore, ProfileStore};
use goca_domain::{
    EventType, GocaError, HostProfile, ProviderCredential, ProviderKind, Result as DomainResult,
};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::manager::{map_join_error, map_sql_error, DbConnection, DbManager};

/// SQLite-backed implementation of [`ProfileStore`] and [`EventTypeStore`]
pub struct SqliteHostRepository {
    db: Arc<DbManager>,
}

impl SqliteHostRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert a host and return its id.
    pub async fn create_host(
        &self,
        username: &str,
        display_name: Option<&str>,
        email: Option<&str>,
    ) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);
        let username = username.trim().to_string();
        let display_name = display_name.map(str::to_string);
        let email = email.map(str::to_string);

        task::spawn_blocking(move || -> DomainResult<i64> {
            if username.is_empty() {
                return Err(GocaError::Validation("username is required".into()));
            }
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO hosts (username, display_name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![username, display_name, email, Utc::now().timestamp()],
            )
            .map_err(map_sql_error)?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Store (or replace) the host's credential for one provider.
    pub async fn save_credential(
        &self,
        host_id: i64,
        credential: ProviderCredential,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO provider_credentials (host_id, provider, valid, token, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (host_id, provider) DO UPDATE SET
                    valid = excluded.valid,
                    token = excluded.token,
                    updated_at = excluded.updated_at",
                params![
                    host_id,
                    credential.provider.as_str(),
                    credential.valid,
                    credential.token,
                    Utc::now().timestamp()
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Add an event type to the host's catalog.
    pub async fn add_event_type(
        &self,
        host_id: i64,
        title: &str,
        duration_minutes: u32,
        timezone: &str,
    ) -> DomainResult<EventType> {
        if duration_minutes == 0 {
            return Err(GocaError::Validation("duration must be greater than zero".into()));
        }

        let db = Arc::clone(&self.db);
        let title = title.to_string();
        let timezone = timezone.to_string();

        task::spawn_blocking(move || -> DomainResult<EventType> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO event_types (host_id, title, duration_minutes, timezone) VALUES (?1, ?2, ?3, ?4)",
                params![host_id, title, duration_minutes, timezone],
            )
            .map_err(map_sql_error)?;
            Ok(EventType { id: conn.last_insert_rowid(), title, duration_minutes, timezone })
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl ProfileStore for SqliteHostRepository {
    async fn get_by_username(&self, username: &str) -> DomainResult<Option<HostProfile>> {
        let db = Arc::clone(&self.db);
        let username = username.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<HostProfile>> {
            let conn = db.get_connection()?;

            let host = conn
                .query_row(
                    "SELECT id, username, display_name, email FROM hosts WHERE username = ?1",
                    params![username],
                    map_host_row,
                )
                .optional()
                .map_err(map_sql_error)?;

            match host {
                Some(mut host) => {
                    host.credentials = load_credentials(&conn, host.id)?;
                    Ok(Some(host))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl EventTypeStore for SqliteHostRepository {
    async fn list_for_host(&self, host_id: i64) -> DomainResult<Vec<EventType>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<EventType>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, title, duration_minutes, timezone FROM event_types
                     WHERE host_id = ?1 ORDER BY id",
                )
                .map_err(map_sql_error)?;

            let rows = stmt
                .query_map(params![host_id], |row| {
                    Ok(EventType {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        duration_minutes: row.get(2)?,
                        timezone: row.get(3)?,
                    })
                })
                .map_err(map_sql_error)?;

            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn map_host_row(row: &Row<'_>) -> rusqlite::Result<HostProfile> {
    Ok(HostProfile {
        id: row.get(0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        email: row.get(3)?,
        credentials: Vec::new(),
    })
}

fn load_credentials(conn: &DbConnection, host_id: i64) -> DomainResult<Vec<ProviderCredential>> {
    let mut stmt = conn
        .prepare(
            "SELECT provider, valid, token FROM provider_credentials
             WHERE host_id = ?1 ORDER BY provider",
        )
        .map_err(map_sql_error)?;

    let rows = stmt
        .query_map(params![host_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?, row.get::<_, String>(2)?))
        })
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;

    rows.into_iter()
        .map(|(provider, valid, token)| {
            let provider = provider.parse::<ProviderKind>().map_err(|err| {
                GocaError::Database(format!("host {host_id} has unknown provider: {err}"))
            })?;
            Ok(ProviderCredential { provider, valid, token })
        })
        .collect()
}
