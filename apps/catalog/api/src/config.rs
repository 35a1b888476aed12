//! Configuration for Catalog API

use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig,
};
use database::MAX_PAGE_SIZE;
use database::postgres::PostgresConfig;
use domain_exports::DEFAULT_CHUNK_SIZE;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// Reported by `/health`; taken from `HOSTNAME`
    pub hostname: String,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub export: ExportConfig,
    pub external_api: ExternalApiConfig,
    /// Insert the demo catalog when the database has no categories
    pub seed_data: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let export = ExportConfig::from_env()?;
        let external_api = ExternalApiConfig::from_env()?;
        let seed_data = env_parse("SEED_DATA", "true")?;

        Ok(Self {
            app: app_info!(),
            hostname: env_or_default("HOSTNAME", "localhost"),
            database,
            server,
            environment,
            export,
            external_api,
            seed_data,
        })
    }
}

/// Export pipeline settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    /// Products per read/write chunk, within `1..=MAX_PAGE_SIZE`
    pub chunk_size: u64,
}

impl FromEnv for ExportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let chunk_size: u64 = env_parse("EXPORT_CHUNK_SIZE", &DEFAULT_CHUNK_SIZE.to_string())?;

        if !(1..=MAX_PAGE_SIZE).contains(&chunk_size) {
            return Err(ConfigError::ParseError {
                key: "EXPORT_CHUNK_SIZE".to_string(),
                details: format!("must be between 1 and {}, got {}", MAX_PAGE_SIZE, chunk_size),
            });
        }

        Ok(Self { chunk_size })
    }
}

/// Outbound catalog API settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalApiConfig {
    pub base_url: String,
}

impl FromEnv for ExternalApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_or_default(
                "EXTERNAL_API_BASE_URL",
                domain_products::external::DEFAULT_BASE_URL,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_defaults_to_page_limit() {
        temp_env::with_var_unset("EXPORT_CHUNK_SIZE", || {
            assert_eq!(ExportConfig::from_env().unwrap().chunk_size, 100);
        });
    }

    #[test]
    fn test_chunk_size_override() {
        temp_env::with_var("EXPORT_CHUNK_SIZE", Some("25"), || {
            assert_eq!(ExportConfig::from_env().unwrap().chunk_size, 25);
        });
    }

    #[test]
    fn test_chunk_size_out_of_range_is_parse_error() {
        for raw in ["0", "101", "-3", "many"] {
            temp_env::with_var("EXPORT_CHUNK_SIZE", Some(raw), || {
                let err = ExportConfig::from_env().unwrap_err();
                assert!(
                    matches!(err, ConfigError::ParseError { ref key, .. } if key == "EXPORT_CHUNK_SIZE"),
                    "{} should be rejected",
                    raw
                );
            });
        }
    }

    #[test]
    fn test_external_api_base_url() {
        temp_env::with_var_unset("EXTERNAL_API_BASE_URL", || {
            assert_eq!(
                ExternalApiConfig::from_env().unwrap().base_url,
                "https://api.example.com"
            );
        });
        temp_env::with_var("EXTERNAL_API_BASE_URL", Some("http://catalog.internal"), || {
            assert_eq!(
                ExternalApiConfig::from_env().unwrap().base_url,
                "http://catalog.internal"
            );
        });
    }

    #[test]
    fn test_config_reads_hostname_and_seed_flag() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/catalog")),
                ("HOSTNAME", Some("catalog-7f9c")),
                ("SEED_DATA", Some("false")),
                ("EXPORT_CHUNK_SIZE", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.hostname, "catalog-7f9c");
                assert!(!config.seed_data);
                assert_eq!(config.app.name, "catalog_api");
                assert_eq!(config.server.port, 8080);
            },
        );
    }

    #[test]
    fn test_config_requires_database_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            assert!(Config::from_env().is_err());
        });
    }
}
