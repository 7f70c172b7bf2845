use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidAddress {
        field: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listen address, `host:port`
    pub run_address: String,
    /// PostgreSQL URL; empty runs on the in-memory ledger
    pub database_uri: String,
    /// Base URL of the accrual system
    pub accrual_system_address: String,
    pub accrual_timeout_ms: u64,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            run_address: "localhost:8080".to_string(),
            database_uri: String::new(),
            accrual_system_address: "http://localhost:8081".to_string(),
            accrual_timeout_ms: 5000,
            jwt_secret: "gophermart-dev-secret".to_string(),
            token_ttl_hours: 24,
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "gophermart.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
        }
    }
}

/// Command-line flags; each one also reads its environment variable
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "gophermart", about = "Loyalty points ledger service", version)]
pub struct Cli {
    /// YAML config file; built-in defaults when omitted.
    #[arg(short = 'c', long = "config", env = "GOPHERMART_CONFIG", value_name = "path")]
    pub config: Option<PathBuf>,
    /// HTTP listen address as `host:port`.
    #[arg(short = 'a', long = "run-address", env = "RUN_ADDRESS", value_name = "host:port")]
    pub run_address: Option<String>,
    /// PostgreSQL connection URL.
    #[arg(short = 'd', long = "database-uri", env = "DATABASE_URI", value_name = "url")]
    pub database_uri: Option<String>,
    /// Accrual system base URL.
    #[arg(
        short = 'r',
        long = "accrual-system-address",
        env = "ACCRUAL_SYSTEM_ADDRESS",
        value_name = "url"
    )]
    pub accrual_system_address: Option<String>,
    /// HS256 signing secret for access tokens.
    #[arg(long = "jwt-secret", env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Defaults, then the YAML file, then flags / environment
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(v) = &cli.run_address {
            self.run_address = v.clone();
        }
        if let Some(v) = &cli.database_uri {
            self.database_uri = v.clone();
        }
        if let Some(v) = &cli.accrual_system_address {
            self.accrual_system_address = v.clone();
        }
        if let Some(v) = &cli.jwt_secret {
            self.jwt_secret = v.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_host_port("run_address", &self.run_address, true)?;

        let authority = self
            .accrual_system_address
            .split_once("://")
            .map_or(self.accrual_system_address.as_str(), |(_, rest)| rest)
            .trim_end_matches('/');
        check_host_port("accrual_system_address", authority, false).map_err(|e| match e {
            ConfigError::InvalidAddress { field, reason, .. } => ConfigError::InvalidAddress {
                field,
                value: self.accrual_system_address.clone(),
                reason,
            },
            other => other,
        })
    }

    /// Socket address to bind; `:8080` listens on every interface
    pub fn bind_address(&self) -> String {
        match self.run_address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port),
            None => self.run_address.clone(),
        }
    }

    pub fn accrual_timeout(&self) -> Duration {
        Duration::from_millis(self.accrual_timeout_ms)
    }

    /// Empty `database_uri` selects the in-memory ledger
    pub fn uses_database(&self) -> bool {
        !self.database_uri.trim().is_empty()
    }
}

fn check_host_port(
    field: &'static str,
    value: &str,
    allow_empty_host: bool,
) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidAddress {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (host, port) = value
        .rsplit_once(':')
        .ok_or_else(|| invalid("missing port"))?;
    if host.is_empty() && !allow_empty_host {
        return Err(invalid("missing host"));
    }
    port.parse::<u16>().map_err(|_| invalid("port is not a number"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.uses_database());
        assert_eq!(config.run_address, "localhost:8080");
        assert_eq!(config.accrual_system_address, "http://localhost:8081");
        assert_eq!(config.accrual_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = r#"
run_address: "0.0.0.0:9090"
database_uri: "postgres://gopher@db/loyalty"
use_json: true
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.run_address, "0.0.0.0:9090");
        assert!(config.uses_database());
        assert!(config.use_json);
        // Unset keys keep their defaults
        assert_eq!(config.accrual_system_address, "http://localhost:8081");
        assert_eq!(config.token_ttl_hours, 24);
    }

    #[test]
    fn test_flags_override_yaml() {
        let mut config = AppConfig::from_yaml("run_address: \"0.0.0.0:9090\"\n").unwrap();
        let cli = Cli::try_parse_from([
            "gophermart",
            "-a",
            "127.0.0.1:7000",
            "-r",
            "http://accrual:8081",
        ])
        .unwrap();

        config.apply_overrides(&cli);
        assert_eq!(config.run_address, "127.0.0.1:7000");
        assert_eq!(config.accrual_system_address, "http://accrual:8081");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = AppConfig::load(Path::new("/nonexistent/gophermart.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_addresses_rejected() {
        for run_address in ["localhost", "localhost:http", "localhost:70000", ":"] {
            let config = AppConfig {
                run_address: run_address.to_string(),
                ..AppConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidAddress {
                        field: "run_address",
                        ..
                    })
                ),
                "run_address={}",
                run_address
            );
        }

        let config = AppConfig {
            accrual_system_address: "http://accrual".to_string(),
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://accrual"));

        let config = AppConfig {
            accrual_system_address: "http://:8081".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err(), "accrual address needs a host");
    }

    #[test]
    fn test_port_only_run_address_binds_all_interfaces() {
        let config = AppConfig {
            run_address: ":8080".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");

        assert_eq!(AppConfig::default().bind_address(), "localhost:8080");
    }
}
