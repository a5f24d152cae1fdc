//! Configuration file
//!
//! ```json
//! {
//!   "schema_dir": "./schemas",
//!   "http": { "host": "127.0.0.1", "port": 8480, "cors_origins": [] },
//!   "expose_all_issues": true,
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `schema_dir` is required. A relative `schema_dir` is resolved
//! against the directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory of `*.json` schema files (required)
    pub schema_dir: String,

    #[serde(default)]
    pub http: HttpServerConfig,

    /// Attach the full issue list to rejections (default: true)
    #[serde(default = "default_expose_all_issues")]
    pub expose_all_issues: bool,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_expose_all_issues() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: "./schemas".to_string(),
            http: HttpServerConfig::default(),
            expose_all_issues: default_expose_all_issues(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::config_error("schema_dir must not be empty"));
        }

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Schema directory, resolved against the config file's directory
    pub fn schema_path(&self, config_path: &Path) -> PathBuf {
        let dir = Path::new(&self.schema_dir);
        if dir.is_absolute() {
            return dir.to_path_buf();
        }
        match config_path.parent() {
            Some(parent) => parent.join(dir),
            None => dir.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("intake.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"schema_dir": "schemas"}"#);

        let config = Config::load(&path).unwrap();
        assert!(config.expose_all_issues);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.http, HttpServerConfig::default());
    }

    #[test]
    fn test_missing_schema_dir_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"expose_all_issues": false}"#);

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "INTAKE_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"schema_dir": "s", "log_level": "chatty"}"#);

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_relative_schema_dir_resolves_against_config() {
        let config = Config::default();
        let resolved = config.schema_path(Path::new("/etc/intake/intake.json"));
        assert_eq!(resolved, PathBuf::from("/etc/intake/./schemas"));
    }

    #[test]
    fn test_absolute_schema_dir_kept() {
        let config = Config {
            schema_dir: "/srv/schemas".to_string(),
            ..Default::default()
        };
        let resolved = config.schema_path(Path::new("/etc/intake/intake.json"));
        assert_eq!(resolved, PathBuf::from("/srv/schemas"));
    }
}
