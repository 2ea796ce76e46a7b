//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, when `GOCA_DB_PATH` is set
//! 2. Otherwise the first config file found by [`probe_config_paths`]
//! 3. Otherwise built-in defaults
//!
//! ## Environment Variables
//! - `GOCA_DB_PATH`: SQLite database file (required for env loading)
//! - `GOCA_DB_POOL_SIZE`: connection pool size
//! - `GOCA_BIND_ADDR`: HTTP listen address
//! - `GOCA_GOOGLE_CLIENT_ID`, `GOCA_GOOGLE_CLIENT_SECRET`
//! - `GOCA_MICROSOFT_CLIENT_ID`, `GOCA_MICROSOFT_CLIENT_SECRET`
//! - `GOCA_MICROSOFT_ONLINE_MEETINGS`: attach Teams join URLs (true/false)
//!
//! ## File Locations
//! `goca.toml`, `goca.json`, `config.toml`, `config.json`, looked up in the
//! current working directory and then next to the executable.

use std::path::{Path, PathBuf};

use goca_domain::{
    Config, DatabaseConfig, GocaError, ProviderSettings, ProvidersConfig, Result, ServerConfig,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["goca.toml", "goca.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `GocaError::Config` when an environment value or a found config
/// file is invalid. A missing file is not an error.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) if std::env::var_os("GOCA_DB_PATH").is_some() => Err(e),
        Err(e) => {
            tracing::debug!(error = %e, "environment incomplete, trying config file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("no config file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// `GOCA_DB_PATH` is required; every other variable falls back to its
/// default.
///
/// # Errors
/// Returns `GocaError::Config` if `GOCA_DB_PATH` is missing or a value is
/// invalid.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("GOCA_DB_PATH")?;
    let pool_size = match optional_env("GOCA_DB_POOL_SIZE") {
        Some(raw) => parse_pool_size(&raw)?,
        None => DatabaseConfig::default().pool_size,
    };
    let bind_addr =
        optional_env("GOCA_BIND_ADDR").unwrap_or_else(|| ServerConfig::default().bind_addr);

    let mut google = ProviderSettings::google();
    google.client_id = optional_env("GOCA_GOOGLE_CLIENT_ID").unwrap_or_default();
    google.client_secret = optional_env("GOCA_GOOGLE_CLIENT_SECRET");

    let mut microsoft = ProviderSettings::microsoft();
    microsoft.client_id = optional_env("GOCA_MICROSOFT_CLIENT_ID").unwrap_or_default();
    microsoft.client_secret = optional_env("GOCA_MICROSOFT_CLIENT_SECRET");
    microsoft.online_meetings = env_bool("GOCA_MICROSOFT_ONLINE_MEETINGS", false);

    Ok(Config {
        server: ServerConfig { bind_addr },
        database: DatabaseConfig { path: db_path, pool_size },
        providers: ProvidersConfig { google, microsoft },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. JSON and TOML are
/// supported, selected by file extension.
///
/// # Errors
/// Returns `GocaError::Config` if the file is missing, unreadable or invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GocaError::Config(format!("config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            GocaError::Config("no config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GocaError::Config(format!("failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    if config.database.pool_size == 0 {
        return Err(GocaError::Config("database.pool_size must be at least 1".into()));
    }
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GocaError::Config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GocaError::Config(format!("invalid JSON format: {e}"))),
        _ => Err(GocaError::Config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// Returns the first existing candidate, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn parse_pool_size(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(GocaError::Config("GOCA_DB_POOL_SIZE must be at least 1".into())),
        Ok(size) => Ok(size),
        Err(e) => Err(GocaError::Config(format!("invalid GOCA_DB_POOL_SIZE: {e}"))),
    }
}

fn env_var(key: &str) -> Result<String> {
    optional_env(key)
        .ok_or_else(|| GocaError::Config(format!("missing required environment variable: {key}")))
}

/// Non-empty value of an environment variable.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 8] = [
        "GOCA_DB_PATH",
        "GOCA_DB_POOL_SIZE",
        "GOCA_BIND_ADDR",
        "GOCA_GOOGLE_CLIENT_ID",
        "GOCA_GOOGLE_CLIENT_SECRET",
        "GOCA_MICROSOFT_CLIENT_ID",
        "GOCA_MICROSOFT_CLIENT_SECRET",
        "GOCA_MICROSOFT_ONLINE_MEETINGS",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for value in ["1", "true", "yes", "on", "TRUE"] {
            std::env::set_var("GOCA_TEST_BOOL", value);
            assert!(env_bool("GOCA_TEST_BOOL", false), "{value}");
        }
        for value in ["0", "false", "no", "off"] {
            std::env::set_var("GOCA_TEST_BOOL", value);
            assert!(!env_bool("GOCA_TEST_BOOL", true), "{value}");
        }

        std::env::remove_var("GOCA_TEST_BOOL");
        assert!(env_bool("GOCA_TEST_BOOL", true));
        assert!(!env_bool("GOCA_TEST_BOOL", false));
    }

    #[test]
    fn load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("GOCA_DB_PATH", "/tmp/goca-test.db");
        std::env::set_var("GOCA_DB_POOL_SIZE", "8");
        std::env::set_var("GOCA_BIND_ADDR", "0.0.0.0:9000");
        std::env::set_var("GOCA_GOOGLE_CLIENT_ID", "google-id");
        std::env::set_var("GOCA_GOOGLE_CLIENT_SECRET", "google-secret");
        std::env::set_var("GOCA_MICROSOFT_CLIENT_ID", "ms-id");
        std::env::set_var("GOCA_MICROSOFT_ONLINE_MEETINGS", "yes");

        let config = load_from_env().expect("config from env");
        clear_env();

        assert_eq!(config.database.path, "/tmp/goca-test.db");
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.providers.google.client_id, "google-id");
        assert_eq!(config.providers.google.client_secret.as_deref(), Some("google-secret"));
        assert_eq!(config.providers.microsoft.client_id, "ms-id");
        assert!(config.providers.microsoft.client_secret.is_none());
        assert!(config.providers.microsoft.online_meetings);
        assert!(!config.providers.google.online_meetings);
    }

    #[test]
    fn load_from_env_requires_db_path() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, GocaError::Config(msg) if msg.contains("GOCA_DB_PATH")));
    }

    #[test]
    fn load_from_env_rejects_invalid_pool_size() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("GOCA_DB_PATH", "/tmp/goca-test.db");
        for raw in ["not-a-number", "0"] {
            std::env::set_var("GOCA_DB_POOL_SIZE", raw);
            assert!(matches!(load_from_env(), Err(GocaError::Config(_))), "{raw}");
        }
        clear_env();
    }

    #[test]
    fn load_surfaces_env_errors_instead_of_falling_back() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("GOCA_DB_PATH", "/tmp/goca-test.db");
        std::env::set_var("GOCA_DB_POOL_SIZE", "lots");
        let result = load();
        clear_env();

        assert!(matches!(result, Err(GocaError::Config(_))));
    }

    #[test]
    fn parse_config_toml_with_partial_sections() {
        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:8088"

[providers.microsoft]
api_base_url = "https://graph.microsoft.com"
client_id = "ms-id"
online_meetings = true
"#;

        let config = parse_config(toml_content, Path::new("goca.toml")).expect("valid TOML");
        assert_eq!(config.server.bind_addr, "0.0.0.0:8088");
        assert_eq!(config.database, DatabaseConfig::default());
        assert!(config.providers.microsoft.online_meetings);
        assert_eq!(config.providers.google, ProviderSettings::google());
    }

    #[test]
    fn parse_config_json() {
        let json_content = r#"{ "database": { "path": "bookings.db", "pool_size": 2 } }"#;

        let config = parse_config(json_content, Path::new("goca.json")).expect("valid JSON");
        assert_eq!(config.database.path, "bookings.db");
        assert_eq!(config.database.pool_size, 2);
    }

    #[test]
    fn parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("goca.yaml"));
        assert!(matches!(result, Err(GocaError::Config(msg)) if msg.contains("yaml")));
    }

    #[test]
    fn load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/goca.toml")));
        assert!(matches!(result, Err(GocaError::Config(_))));
    }
}
