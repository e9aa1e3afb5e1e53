//! Runtime configuration read from the process environment.

use std::fmt;
use std::path::PathBuf;

/// Which store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Sqlite,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen_addr: String,
    pub store_kind: StoreKind,
    pub users_file: PathBuf,
    /// `None` disables the backup fallback.
    pub users_backup_file: Option<PathBuf>,
    pub users_db: PathBuf,
    /// Hex SHA-256 digests of accepted bearer tokens.
    pub token_digests: Vec<String>,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value {:?} for {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let store_kind = match var("STORE_KIND", "file").to_ascii_lowercase().as_str() {
            "file" => StoreKind::File,
            "sqlite" => StoreKind::Sqlite,
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORE_KIND",
                    value: other.to_string(),
                })
            }
        };

        let log_format = match var("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        let backup = var("USERS_BACKUP_FILE", "./users-backup.json");
        let users_backup_file = (!backup.trim().is_empty()).then(|| PathBuf::from(backup));

        let mut token_digests = Vec::new();
        for digest in var("API_TOKEN_SHA256", "").split(',') {
            let digest = digest.trim().to_ascii_lowercase();
            if digest.is_empty() {
                continue;
            }
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid {
                    key: "API_TOKEN_SHA256",
                    value: digest,
                });
            }
            token_digests.push(digest);
        }

        Ok(Self {
            listen_addr: var("LISTEN_ADDR", "0.0.0.0:8080"),
            store_kind,
            users_file: PathBuf::from(var("USERS_FILE", "./users-db.json")),
            users_backup_file,
            users_db: PathBuf::from(var("USERS_DB", "./users.sqlite")),
            token_digests,
            log_format,
        })
    }
}
