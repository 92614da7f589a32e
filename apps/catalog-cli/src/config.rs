//! Application configuration.
//!
//! Built once at startup from three layers, later layers winning:
//!
//! ```text
//! defaults (serde)  ◄──  catalog.toml (optional)  ◄──  CATALOG_* environment
//! ```
//!
//! Environment keys use `__` between sections:
//! `CATALOG_DATABASE__DATABASE_PATH=/data/catalog.db`,
//! `CATALOG_SEARCH__DEFAULT_PER_PAGE=50`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use catalog_core::SearchSettings;
use catalog_db::DbConfig;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "catalog";

/// Everything the process needs, loaded once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub search: SearchSettings,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: "info,catalog=debug,sqlx=warn".to_string(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl AppConfig {
    /// Loads configuration from `path` (required when given) or the
    /// optional default file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: AppConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("CATALOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.search.default_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.default_per_page".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.search.fetch_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.fetch_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::FieldMerge;
    use config::FileFormat;
    use std::time::Duration;

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_without_any_source() {
        let config = from_toml("");
        assert_eq!(config.search.default_per_page, 100);
        assert_eq!(config.search.fetch_limit, 10_000);
        assert_eq!(config.search.fallback_uom_code, "EA");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.log.filter, "info,catalog=debug,sqlx=warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides() {
        let config = from_toml(
            r#"
            [database]
            database_path = "/data/catalog.db"
            connect_timeout = 3

            [search]
            default_per_page = 25
            query_timeout_ms = 2500

            [search.merge_policy]
            price = "prefer_latest"
            "#,
        );
        assert_eq!(config.database.database_path, Path::new("/data/catalog.db"));
        assert_eq!(config.database.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.search.default_per_page, 25);
        assert_eq!(config.search.query_timeout_ms, 2500);
        assert_eq!(config.search.merge_policy.price, FieldMerge::PreferLatest);
        assert_eq!(config.search.merge_policy.unit, FieldMerge::FillIfEmpty);
    }

    #[test]
    fn test_validation_rejects_zero_page_size() {
        let config = from_toml("[search]\ndefault_per_page = 0\n");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "search.default_per_page"
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here/catalog.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
