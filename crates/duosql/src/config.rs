//! Pool and manager configuration.
//!
//! Unset fields are zero values and are filled with the documented defaults
//! during normalization, so a config deserialized from a partial JSON
//! document behaves the same as one built in code with `..Default::default()`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DbError, DbResult};

/// Default directory for `init.log` / `action.log`.
pub const DEFAULT_LOG_PATH: &str = "./logs/duosql";

/// Connection settings for one pool role.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub charset: String,
    pub max_connections: u32,
}

impl PoolConfig {
    /// Replace zero values with defaults: `localhost`, `3306`, `root`,
    /// empty password, `utf8mb4`, 4 connections.
    pub(crate) fn normalized(mut self) -> Self {
        if self.host.is_empty() {
            self.host = "localhost".to_string();
        }
        if self.port == 0 {
            self.port = 3306;
        }
        if self.user.is_empty() {
            self.user = "root".to_string();
        }
        // An empty password is a valid default and stays as-is.
        if self.charset.is_empty() {
            self.charset = "utf8mb4".to_string();
        }
        if self.max_connections == 0 {
            self.max_connections = 4;
        }
        self
    }
}

/// Settings for a [`crate::PoolManager`]: a read pool, an optional write
/// pool (defaults to the read settings), and the log directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub read: PoolConfig,
    pub write: Option<PoolConfig>,
    pub log_path: Option<PathBuf>,
}

impl ManagerConfig {
    /// Load a config from a JSON document on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> DbResult<ManagerConfig> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| DbError::Config(e.to_string()))
    }

    pub(crate) fn log_dir(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_fills_zero_values() {
        let cfg = PoolConfig::default().normalized();
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 3306);
        assert_eq!(cfg.user, "root");
        assert_eq!(cfg.password, "");
        assert_eq!(cfg.charset, "utf8mb4");
        assert_eq!(cfg.max_connections, 4);
    }

    #[test]
    fn normalization_keeps_explicit_values() {
        let cfg = PoolConfig {
            host: "db.internal".to_string(),
            port: 3307,
            user: "app".to_string(),
            password: "secret".to_string(),
            charset: "utf8".to_string(),
            max_connections: 16,
        }
        .normalized();
        assert_eq!(cfg.host, "db.internal");
        assert_eq!(cfg.port, 3307);
        assert_eq!(cfg.user, "app");
        assert_eq!(cfg.password, "secret");
        assert_eq!(cfg.charset, "utf8");
        assert_eq!(cfg.max_connections, 16);
    }

    #[test]
    fn manager_config_from_partial_json() {
        let cfg: ManagerConfig =
            serde_json::from_str(r#"{"read": {"host": "primary", "port": 3307}}"#).unwrap();
        assert_eq!(cfg.read.host, "primary");
        assert_eq!(cfg.read.port, 3307);
        assert!(cfg.write.is_none());
        assert!(cfg.log_path.is_none());
        assert_eq!(cfg.log_dir(), PathBuf::from(DEFAULT_LOG_PATH));
    }

    #[test]
    fn manager_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{"read": {"host": "r"}, "write": {"host": "w"}, "log_path": "/tmp/duosql-logs"}"#,
        )
        .unwrap();

        let cfg = ManagerConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.read.host, "r");
        assert_eq!(cfg.write.as_ref().unwrap().host, "w");
        assert_eq!(cfg.log_dir(), PathBuf::from("/tmp/duosql-logs"));
    }

    #[test]
    fn from_json_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ManagerConfig::from_json_file(&path),
            Err(DbError::Config(_))
        ));
    }
}
