//! # Configuration
//!
//! Runtime settings for Orca, loaded once at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`orca.toml` in the platform config directory)
//! 3. Environment variables (`ORCA_*`)
//!
//! ## Example `orca.toml`
//! ```toml
//! database_path = "/var/lib/orca/orca.db"
//! track_print_count = true
//! guard_concurrent_submit = true
//!
//! [currency]
//! symbol = "R$"
//! decimal_separator = ","
//! thousands_separator = "."
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use orca_core::Money;

const CONFIG_FILE: &str = "orca.toml";
const DATABASE_FILE: &str = "orca.db";

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How money is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub thousands_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "R$".to_string(),
            decimal_separator: ',',
            thousands_separator: '.',
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrcaConfig {
    /// SQLite database file.
    /// Default: `orca.db` in the platform data directory
    pub database_path: PathBuf,

    /// Whether printing a quote increments its stored print counter.
    /// Default: false
    pub track_print_count: bool,

    /// Whether a second submit is rejected while one is in flight.
    /// Default: true
    pub guard_concurrent_submit: bool,

    pub currency: CurrencyFormat,
}

impl Default for OrcaConfig {
    fn default() -> Self {
        OrcaConfig {
            database_path: Self::default_database_path(),
            track_print_count: false,
            guard_concurrent_submit: true,
            currency: CurrencyFormat::default(),
        }
    }
}

impl OrcaConfig {
    /// Loads configuration from defaults, file and environment.
    ///
    /// `config_path` overrides the platform config file location. A missing
    /// file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document; absent keys keep their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks the currency separators can be told apart.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency.decimal_separator == self.currency.thousands_separator {
            return Err(ConfigError::Invalid(
                "decimal and thousands separators must differ".into(),
            ));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database_path is empty".into()));
        }

        Ok(())
    }

    /// Applies `ORCA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("ORCA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = PathBuf::from(path);
        }

        if let Some(value) = lookup("ORCA_TRACK_PRINTS") {
            match parse_flag(&value) {
                Some(flag) => self.track_print_count = flag,
                None => warn!(value = %value, "Ignoring invalid ORCA_TRACK_PRINTS"),
            }
        }

        if let Some(value) = lookup("ORCA_GUARD_SUBMIT") {
            match parse_flag(&value) {
                Some(flag) => self.guard_concurrent_submit = flag,
                None => warn!(value = %value, "Ignoring invalid ORCA_GUARD_SUBMIT"),
            }
        }
    }

    /// Renders an amount with the configured currency format.
    ///
    /// ```rust
    /// use orca_core::Money;
    /// use orca_db::config::OrcaConfig;
    ///
    /// let config = OrcaConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(123456)), "R$ 1.234,56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format_with(
            &self.currency.symbol,
            self.currency.decimal_separator,
            self.currency.thousands_separator,
        )
    }

    /// Platform config file location.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("br", "orca", "orca")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Platform data directory database, or `./orca.db` when unknown.
    fn default_database_path() -> PathBuf {
        directories::ProjectDirs::from("br", "orca", "orca")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
