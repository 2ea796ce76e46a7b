//! Application context - dependency injection container

use std::sync::Arc;

use goca_core::{BookingService, GoogleCalendarStrategy, MicrosoftCalendarStrategy};
use goca_domain::{Config, Result};
use goca_infra::{
    DbManager, HttpClient, JsonTokenCodec, ReqwestCalendarClientFactory, SqliteBookingRepository,
    SqliteHostRepository,
};
use tracing::info;

/// Application context shared by every request handler
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub hosts: Arc<SqliteHostRepository>,
    pub bookings: Arc<BookingService>,
}

impl AppContext {
    /// Open the database, apply the schema and wire the booking service with
    /// both calendar strategies.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated, or the
    /// HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let hosts = Arc::new(SqliteHostRepository::new(Arc::clone(&db)));
        let booking_store = Arc::new(SqliteBookingRepository::new(Arc::clone(&db)));

        let factory = Arc::new(ReqwestCalendarClientFactory::new(HttpClient::new()?));
        let codec = Arc::new(JsonTokenCodec);

        let bookings = BookingService::new(hosts.clone(), hosts.clone(), booking_store)
            .with_strategy(Arc::new(GoogleCalendarStrategy::new(
                codec.clone(),
                factory.clone(),
                config.providers.google.clone(),
            )))
            .with_strategy(Arc::new(MicrosoftCalendarStrategy::new(
                codec,
                factory,
                config.providers.microsoft.clone(),
            )));

        info!(
            db_path = %db.path().display(),
            providers = ?bookings.providers(),
            "application context initialized"
        );

        Ok(Self { config, db, hosts, bookings: Arc::new(bookings) })
    }
}
