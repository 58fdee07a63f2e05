//! Application configuration, loaded from YAML.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use export_csv::{ExportSettings, Quoting, WriterOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Environment variable naming the YAML config file
pub const CONFIG_ENV_VAR: &str = "EXPORT_DEMO_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Seed the database with sample data when it has no customers
    pub populate_sample_data: bool,
    /// Accounts above this balance are listed by the account export
    pub rich_account_threshold: f64,
    pub exports: ExportsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:bank_demo.db".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            populate_sample_data: true,
            rich_account_threshold: 600_000.0,
            exports: ExportsConfig::default(),
        }
    }
}

/// Export settings for each CSV endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportsConfig {
    pub customer: ExportSettings,
    pub account: ExportSettings,
    pub transaction: ExportSettings,
}

impl Default for ExportsConfig {
    fn default() -> Self {
        Self {
            customer: ExportSettings::default(),
            account: ExportSettings {
                filename: Some("rich_account_list.csv".to_string()),
                field_names: vec!["account_no".to_string(), "owner".to_string()],
                ..ExportSettings::default()
            },
            transaction: ExportSettings {
                filename: Some("transactions_csv_filename.csv".to_string()),
                field_names: vec![
                    "account".to_string(),
                    "transaction_id".to_string(),
                    "transaction_date".to_string(),
                ],
                writer: WriterOptions::excel()
                    .quoting(Quoting::All)
                    .delimiter(" ")
                    .quotechar("|"),
                ..ExportSettings::default()
            },
        }
    }
}

impl AppConfig {
    /// Load from the file named by `EXPORT_DEMO_CONFIG`, or use the defaults.
    pub fn load() -> Result<Self> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) => {
                info!("Loading configuration from {}", path);
                Self::from_file(&path)
            }
            Err(_) => {
                info!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address {}", self.bind_address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_demo_views() {
        let config = AppConfig::default();
        assert_eq!(config.exports.account.filename.as_deref(), Some("rich_account_list.csv"));
        assert_eq!(config.exports.transaction.writer.quoting, Quoting::All);
        assert_eq!(config.exports.transaction.writer.quotechar, "|");
        assert!(config.exports.customer.filename.is_none());
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "database_url: \"sqlite::memory:\"\npopulate_sample_data: false\nexports:\n  customer:\n    add_col_names: true\n"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(!config.populate_sample_data);
        assert!(config.exports.customer.add_col_names);
        // sections left out keep their defaults
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.exports.account, ExportsConfig::default().account);
    }

    #[test]
    fn test_bundled_demo_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/demo.yaml");
        let config = AppConfig::from_file(path).unwrap();

        assert!(config.exports.customer.add_col_names);
        assert_eq!(config.exports.account, ExportsConfig::default().account);
        assert_eq!(config.exports.transaction, ExportsConfig::default().transaction);
    }

    #[test]
    fn test_from_missing_file() {
        assert!(AppConfig::from_file("/definitely/not/here.yaml").is_err());
    }

    #[test]
    fn test_invalid_bind_address() {
        let config = AppConfig {
            bind_address: "localhost".to_string(),
            ..AppConfig::default()
        };
        assert!(config.bind_addr().is_err());
    }
}
