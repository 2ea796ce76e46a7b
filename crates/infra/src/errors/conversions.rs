//! Conversions from external infrastructure errors into domain errors.

use goca_domain::GocaError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InfraError(pub GocaError);

impl From<InfraError> for GocaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GocaError> for InfraError {
    fn from(value: GocaError) -> Self {
        InfraError(value)
    }
}

trait IntoGocaError {
    fn into_goca(self) -> GocaError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → GocaError */
/* -------------------------------------------------------------------------- */

impl IntoGocaError for SqlError {
    fn into_goca(self) -> GocaError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => GocaError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        GocaError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        GocaError::Database(format!("unique constraint violation: {message}"))
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        GocaError::Database(format!("foreign key constraint violation: {message}"))
                    }
                    _ => GocaError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => GocaError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                GocaError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                GocaError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => {
                GocaError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            other => GocaError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_goca())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → GocaError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(GocaError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → GocaError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(GocaError::Internal(format!("json encoding error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GocaError */
/* -------------------------------------------------------------------------- */

impl IntoGocaError for HttpError {
    fn into_goca(self) -> GocaError {
        if self.is_timeout() {
            return GocaError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return GocaError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return GocaError::ProviderApi(format!("unexpected response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 => GocaError::Credential(message),
                _ => GocaError::ProviderApi(message),
            };
        }

        GocaError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_goca())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: GocaError = InfraError::from(err).into();
        match mapped {
            GocaError::Database(msg) => assert!(msg.contains("busy")),
            other => panic!("expected database error, got {other:?}"),
        }
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped: GocaError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(mapped, GocaError::NotFound(_)));
    }

    #[test]
    fn json_errors_are_internal() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: GocaError = InfraError::from(err).into();
        assert!(matches!(mapped, GocaError::Internal(msg) if msg.starts_with("json")));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: GocaError = InfraError::from(error).into();
        match mapped {
            GocaError::Credential(msg) => assert!(msg.contains("401")),
            other => panic!("expected credential error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_status_500_maps_to_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: GocaError = InfraError::from(error).into();
        assert!(matches!(mapped, GocaError::ProviderApi(msg) if msg.contains("500")));
    }
}
