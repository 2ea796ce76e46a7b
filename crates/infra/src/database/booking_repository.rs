//! Booking persistence
//!
//! The request snapshot and meeting descriptor are stored as JSON columns so
//! the record reads back exactly as it was written.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use goca_core::BookingStore;
use goca_domain::{
    Booking, BookingId, BookingRecord, BookingRequest, GocaError, MeetingDescriptor,
    Result as DomainResult,
};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::debug;

use super::manager::{map_join_error, map_sql_error, DbManager};
use crate::errors::InfraError;

/// SQLite-backed implementation of [`BookingStore`]
pub struct SqliteBookingRepository {
    db: Arc<DbManager>,
}

impl SqliteBookingRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for SqliteBookingRepository {
    async fn create(&self, record: BookingRecord) -> DomainResult<BookingId> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<BookingId> {
            let request_json = serde_json::to_string(&record.request).map_err(InfraError::from)?;
            let meeting_json = record
                .meeting
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(InfraError::from)?;

            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO bookings (host_id, summary, request_json, meeting_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.host_id,
                    record.summary,
                    request_json,
                    meeting_json,
                    Utc::now().timestamp()
                ],
            )
            .map_err(map_sql_error)?;

            let id = BookingId(conn.last_insert_rowid());
            debug!(booking_id = %id, host_id = record.host_id, "booking row inserted");
            Ok(id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: BookingId) -> DomainResult<Option<Booking>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Booking>> {
            let conn = db.get_connection()?;

            let row = conn
                .query_row(
                    "SELECT host_id, summary, request_json, meeting_json, created_at
                     FROM bookings WHERE id = ?1",
                    params![id.0],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, Option<String>>(3)?,
                            row.get::<_, i64>(4)?,
                        ))
                    },
                )
                .optional()
                .map_err(map_sql_error)?;

            let Some((host_id, summary, request_json, meeting_json, created_at)) = row else {
                return Ok(None);
            };

            let request: BookingRequest =
                serde_json::from_str(&request_json).map_err(InfraError::from)?;
            let meeting: Option<MeetingDescriptor> = meeting_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(InfraError::from)?;
            let created_at = DateTime::<Utc>::from_timestamp(created_at, 0).ok_or_else(|| {
                GocaError::Database(format!("booking {id} has invalid created_at {created_at}"))
            })?;

            Ok(Some(Booking {
                id,
                record: BookingRecord { host_id, summary, request, meeting },
                created_at,
            }))
        })
        .await
        .map_err(map_join_error)?
    }
}
