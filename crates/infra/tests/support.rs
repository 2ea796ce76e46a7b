//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use goca_domain::{EventType, ProviderCredential};
use goca_infra::{DbManager, SqliteHostRepository};
use tempfile::TempDir;

/// Temporary database that keeps the underlying file alive for the duration
/// of a test.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Fresh database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::new(temp_dir.path().join("goca-test.db"), 4)
            .expect("db manager should be created");
        manager.run_migrations().expect("schema should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn hosts(&self) -> SqliteHostRepository {
        SqliteHostRepository::new(Arc::clone(&self.manager))
    }
}

/// Host `alice` with an "Intro Call" event type and the given credentials.
pub async fn seed_alice(
    db: &TestDatabase,
    credentials: Vec<ProviderCredential>,
) -> (i64, EventType) {
    let hosts = db.hosts();
    let host_id = hosts
        .create_host("alice", Some("Alice"), Some("alice@host.example"))
        .await
        .expect("host inserted");
    for credential in credentials {
        hosts.save_credential(host_id, credential).await.expect("credential saved");
    }
    let event_type =
        hosts.add_event_type(host_id, "Intro Call", 30, "UTC").await.expect("event type added");
    (host_id, event_type)
}
