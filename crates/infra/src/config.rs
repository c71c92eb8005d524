//! Configuration loading and representation.
//!
//! Everything comes from environment variables. Parsing goes through a lookup
//! function so tests never touch the process environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use pricelens_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is required when {reason}")]
    Missing { var: &'static str, reason: &'static str },

    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where catalog rows live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    Postgres { database_url: String },
}

/// What to load into the store at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    Builtin,
    Disabled,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub seed: SeedSource,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let persistent = match lookup("USE_PERSISTENT_STORES") {
            None => false,
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                value: raw.clone(),
                reason: "expected 'true' or 'false'".to_string(),
            })?,
        };

        let storage = if persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .ok_or(ConfigError::Missing {
                    var: "DATABASE_URL",
                    reason: "USE_PERSISTENT_STORES=true",
                })?;
            StorageBackend::Postgres { database_url }
        } else {
            StorageBackend::InMemory
        };

        let seed = match lookup("CATALOG_SEED") {
            None => SeedSource::Builtin,
            Some(raw) => match raw.trim() {
                "" => {
                    return Err(ConfigError::Invalid {
                        var: "CATALOG_SEED",
                        value: raw.clone(),
                        reason: "expected 'builtin', 'none' or a file path".to_string(),
                    });
                }
                "builtin" => SeedSource::Builtin,
                "none" => SeedSource::Disabled,
                path => SeedSource::File(PathBuf::from(path)),
            },
        };

        let log_format = match lookup("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => raw.parse().map_err(|e: pricelens_observability::ParseLogFormatError| {
                ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
        };

        Ok(Self {
            bind_addr,
            storage,
            seed,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_in_memory_with_builtin_seed() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.storage, StorageBackend::InMemory);
        assert_eq!(config.seed, SeedSource::Builtin);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn persistent_stores_require_database_url() {
        let err = load(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                var: "DATABASE_URL",
                reason: "USE_PERSISTENT_STORES=true",
            }
        );

        let config = load(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/pricelens"),
        ])
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/pricelens".into()
            }
        );
    }

    #[test]
    fn seed_source_variants() {
        assert_eq!(load(&[("CATALOG_SEED", "none")]).unwrap().seed, SeedSource::Disabled);
        assert_eq!(
            load(&[("CATALOG_SEED", "/etc/pricelens/seed.json")]).unwrap().seed,
            SeedSource::File(PathBuf::from("/etc/pricelens/seed.json"))
        );
        assert!(load(&[("CATALOG_SEED", "  ")]).is_err());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            load(&[("BIND_ADDR", "localhost")]).unwrap_err(),
            ConfigError::Invalid { var: "BIND_ADDR", .. }
        ));
        assert!(matches!(
            load(&[("USE_PERSISTENT_STORES", "yes")]).unwrap_err(),
            ConfigError::Invalid { var: "USE_PERSISTENT_STORES", .. }
        ));
        assert!(matches!(
            load(&[("LOG_FORMAT", "xml")]).unwrap_err(),
            ConfigError::Invalid { var: "LOG_FORMAT", .. }
        ));
    }

    #[test]
    fn pretty_logs_can_be_selected() {
        let config = load(&[("LOG_FORMAT", "pretty"), ("BIND_ADDR", "127.0.0.1:9000")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bind_addr.port(), 9000);
    }
}
