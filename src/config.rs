//! Process configuration
//!
//! Read once from the environment at startup:
//!
//! | variable              | default   |
//! |-----------------------|-----------|
//! | `INGEST_DATABASE_URL` | required  |
//! | `INGEST_UPLOAD_DIR`   | `uploads` |
//! | `INGEST_BACKUP_DIR`   | `backups` |
//! | `INGEST_SCHEMA_FILE`  | built-in tables |
//! | `INGEST_HOST`         | `0.0.0.0` |
//! | `INGEST_PORT`         | `8000`    |
//! | `INGEST_CORS_ORIGINS` | permissive |

use std::path::PathBuf;

use thiserror::Error;

pub const ENV_DATABASE_URL: &str = "INGEST_DATABASE_URL";
pub const ENV_UPLOAD_DIR: &str = "INGEST_UPLOAD_DIR";
pub const ENV_BACKUP_DIR: &str = "INGEST_BACKUP_DIR";
pub const ENV_SCHEMA_FILE: &str = "INGEST_SCHEMA_FILE";
pub const ENV_HOST: &str = "INGEST_HOST";
pub const ENV_PORT: &str = "INGEST_PORT";
pub const ENV_CORS_ORIGINS: &str = "INGEST_CORS_ORIGINS";

/// Bind host when `INGEST_HOST` is unset
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Bind port when `INGEST_PORT` is unset
pub const DEFAULT_PORT: u16 = 8000;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the service needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Store connection string
    pub database_url: String,
    /// Root of the upload blob store
    pub upload_dir: PathBuf,
    /// Root of the backup blob store
    pub backup_dir: PathBuf,
    /// Optional registry file replacing the built-in tables
    pub schema_file: Option<PathBuf>,
    pub http: HttpConfig,
}

/// Listener and CORS settings for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Allowed origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
        }
    }
}

impl HttpConfig {
    /// `host:port` string handed to the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl IngestConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get(ENV_DATABASE_URL).ok_or(ConfigError::Missing(ENV_DATABASE_URL))?;

        let mut http = HttpConfig::default();
        if let Some(host) = get(ENV_HOST) {
            http.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            http.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(origins) = get(ENV_CORS_ORIGINS) {
            http.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(Self {
            database_url,
            upload_dir: get(ENV_UPLOAD_DIR).unwrap_or_else(|| "uploads".into()).into(),
            backup_dir: get(ENV_BACKUP_DIR).unwrap_or_else(|| "backups".into()).into(),
            schema_file: get(ENV_SCHEMA_FILE).map(PathBuf::from),
            http,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = IngestConfig::from_lookup(lookup(&[(ENV_DATABASE_URL, ":memory:")])).unwrap();
        assert_eq!(config.database_url, ":memory:");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.backup_dir, PathBuf::from("backups"));
        assert_eq!(config.schema_file, None);
        assert_eq!(config.http.port, 8000);
        assert!(config.http.cors_origins.is_empty());
    }

    #[test]
    fn test_database_url_required() {
        let err = IngestConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_DATABASE_URL));

        let err = IngestConfig::from_lookup(lookup(&[(ENV_DATABASE_URL, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_DATABASE_URL));
    }

    #[test]
    fn test_overrides() {
        let config = IngestConfig::from_lookup(lookup(&[
            (ENV_DATABASE_URL, "duckdb:///var/lib/ingest.db"),
            (ENV_UPLOAD_DIR, "/srv/uploads"),
            (ENV_BACKUP_DIR, "/srv/backups"),
            (ENV_SCHEMA_FILE, "/etc/ingest/tables.json"),
            (ENV_HOST, "127.0.0.1"),
            (ENV_PORT, "9090"),
            (ENV_CORS_ORIGINS, "http://a.test, http://b.test"),
        ]))
        .unwrap();

        assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.backup_dir, PathBuf::from("/srv/backups"));
        assert_eq!(
            config.schema_file,
            Some(PathBuf::from("/etc/ingest/tables.json"))
        );
        assert_eq!(config.http.socket_addr(), "127.0.0.1:9090");
        assert_eq!(config.http.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_http_defaults() {
        let http = HttpConfig::default();
        assert_eq!(http.socket_addr(), "0.0.0.0:8000");
        assert!(http.cors_origins.is_empty());
    }

    #[test]
    fn test_invalid_port() {
        let err = IngestConfig::from_lookup(lookup(&[
            (ENV_DATABASE_URL, ":memory:"),
            (ENV_PORT, "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: ENV_PORT, .. }));
    }
}
