//! Configuration for the expense report CLI

use anyhow::{Context, Result, bail};
use expense_dashboard::{CurrencyFormat, ExpenseCategory, Targets};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::constants;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Category key -> target percent of sales, overriding the endpoint's targets
    #[serde(default)]
    pub targets: BTreeMap<String, f64>,
}

/// Where snapshots come from
#[derive(Debug, Default, Deserialize)]
pub struct SourceConfig {
    /// Dashboard endpoint URL (queried with year/month/category parameters)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Report display settings
#[derive(Debug, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    /// Categories charted on the percent-of-sales view (endpoint keys)
    #[serde(default)]
    pub categories: Vec<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| {
            "Failed to parse config.toml. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Targets that are not numbers\n\n\
             See config.toml.example for the expected format."
        })
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Main configuration struct with parsed values
#[derive(Debug)]
pub struct Config {
    /// Dashboard endpoint (None when only reading snapshot files)
    pub endpoint: Option<String>,
    pub timeout: Duration,
    pub currency: CurrencyFormat,
    /// Charted categories; empty means the dashboard defaults
    pub categories: Vec<ExpenseCategory>,
    pub target_overrides: Targets,
}

impl Config {
    /// Create config from file config and an optional endpoint override
    pub fn from_file(file_config: &FileConfig, endpoint: Option<String>) -> Result<Self> {
        let endpoint = endpoint.or_else(|| file_config.source.endpoint.clone());
        if let Some(url) = &endpoint {
            reqwest::Url::parse(url).with_context(|| format!("Invalid endpoint URL: {}", url))?;
        }

        for (category, percent) in &file_config.targets {
            if !(0.0..=100.0).contains(percent) {
                bail!(
                    "Target for '{}' must be between 0 and 100, got {}",
                    category,
                    percent
                );
            }
        }

        let defaults = CurrencyFormat::default();
        let display = &file_config.display;

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(
                file_config
                    .source
                    .timeout_secs
                    .unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            currency: CurrencyFormat::new(
                display.currency_symbol.clone().unwrap_or(defaults.symbol),
                display.currency_code.clone().unwrap_or(defaults.code),
            ),
            categories: display
                .categories
                .iter()
                .map(|key| ExpenseCategory::from_key(key))
                .collect(),
            target_overrides: file_config
                .targets
                .iter()
                .map(|(key, percent)| (ExpenseCategory::from_key(key), *percent))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let file_config = FileConfig::parse("").unwrap();
        let config = Config::from_file(&file_config, None).unwrap();
        assert_eq!(config.endpoint, None);
        assert_eq!(config.timeout, Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.currency, CurrencyFormat::default());
        assert!(config.categories.is_empty());
        assert!(config.target_overrides.is_empty());
    }

    #[test]
    fn test_full_config() {
        let file_config = FileConfig::parse(
            r#"
            [source]
            endpoint = "https://example.com/exec"
            timeout_secs = 10

            [display]
            currency_symbol = "$"
            currency_code = "USD"
            categories = ["cogs", "laborexpense", "Rent"]

            [targets]
            laborexpense = 30
            cogs = 32.5
            "#,
        )
        .unwrap();
        let config = Config::from_file(&file_config, None).unwrap();

        assert_eq!(config.endpoint.as_deref(), Some("https://example.com/exec"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.currency.amount(5.0), "$5.00");
        assert_eq!(
            config.categories,
            vec![
                ExpenseCategory::Cogs,
                ExpenseCategory::LaborExpense,
                ExpenseCategory::Other("rent".to_string())
            ]
        );
        assert_eq!(config.target_overrides.get(&ExpenseCategory::Cogs), Some(32.5));
    }

    #[test]
    fn test_endpoint_override_wins() {
        let file_config = FileConfig::parse(
            r#"
            [source]
            endpoint = "https://example.com/exec"
            "#,
        )
        .unwrap();
        let config =
            Config::from_file(&file_config, Some("http://localhost:8080/data".to_string())).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:8080/data"));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let file_config = FileConfig::parse(
            r#"
            [source]
            endpoint = "not a url"
            "#,
        )
        .unwrap();
        assert!(Config::from_file(&file_config, None).is_err());
    }

    #[test]
    fn test_out_of_range_target_rejected() {
        let file_config = FileConfig::parse(
            r#"
            [targets]
            misc = 150
            "#,
        )
        .unwrap();
        assert!(Config::from_file(&file_config, None).is_err());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(FileConfig::parse("[targets\nmisc = ").is_err());
    }
}
